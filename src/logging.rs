//! Log level selection and subscriber setup.
//!
//! Operators pick one of five levels (`debug`, `info`, `warning`, `error`,
//! `critical`). They map onto tracing levels, with `critical` sharing
//! tracing's ERROR level. `RUST_LOG` directives, when set, are applied on
//! top of the chosen level.

use crate::error::ConfigError;
use std::fs::OpenOptions;
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber, filter::LevelFilter};

/// Operator-facing log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    /// Case-insensitive, so `--log-level DEBUG` works too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        LogLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == lower)
            .ok_or_else(|| ConfigError::InvalidLogLevel(s.to_string()))
    }
}

/// Convert a log level to the tracing level used as the subscriber maximum.
pub fn log_level_to_tracing(level: LogLevel) -> Level {
    match level {
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info => Level::INFO,
        LogLevel::Warning => Level::WARN,
        LogLevel::Error | LogLevel::Critical => Level::ERROR,
    }
}

/// Filter with `level` as the default and `directives` (RUST_LOG syntax)
/// layered on top. Malformed directives are skipped.
pub fn build_filter(level: LogLevel, directives: Option<&str>) -> EnvFilter {
    let default = LevelFilter::from_level(log_level_to_tracing(level));
    EnvFilter::builder()
        .with_default_directive(default.into())
        .parse_lossy(directives.unwrap_or_default())
}

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    Off,
    Stdout,
    Stderr,
    /// Append to a file.
    File(String),
}

impl LogDestination {
    /// Parse `0`/`off`, `1`/`stdout`, `2`/`stderr`, or a file name.
    pub fn parse(value: &str) -> Self {
        match value {
            "0" | "off" => LogDestination::Off,
            "1" | "stdout" => LogDestination::Stdout,
            "2" | "stderr" => LogDestination::Stderr,
            filename => LogDestination::File(filename.to_string()),
        }
    }
}

/// Install the global subscriber. Lines carry the level and message only.
pub fn init(level: LogLevel, destination: &LogDestination) -> anyhow::Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let builder = FmtSubscriber::builder()
        .with_env_filter(build_filter(level, directives.as_deref()))
        .with_target(false)
        .without_time();

    match destination {
        LogDestination::Off => {}
        LogDestination::Stdout => {
            let subscriber = builder.with_writer(std::io::stdout).finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogDestination::Stderr => {
            let subscriber = builder.with_writer(std::io::stderr).finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogDestination::File(filename) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = builder.with_writer(file).with_ansi(false).finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}
