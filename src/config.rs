//! Configuration loading and management.
//!
//! Connection settings are layered, lowest to highest priority:
//! 1. Built-in defaults (a local Planka docker setup)
//! 2. YAML config file
//! 3. Environment variables (`PLANKA_DB_*`)
//! 4. Command-line flags
//!
//! ## Config file discovery
//! - `--config <FILE>`
//! - `PLANKA_IMPORT_CONFIG`
//! - `./planka-import.yaml`
//! - `~/.planka-import/config.yaml`

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "PLANKA_IMPORT_CONFIG";

/// Config file looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "planka-import.yaml";

/// Importer configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// PostgreSQL connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Database name.
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default = "default_password")]
    pub password: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            name: default_name(),
            user: default_user(),
            password: default_password(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_name() -> String {
    "planka".to_string()
}

fn default_user() -> String {
    "postgres".to_string()
}

fn default_password() -> String {
    "postgres".to_string()
}

impl DatabaseConfig {
    /// Build the `postgres` client configuration.
    pub fn to_pg_config(&self) -> postgres::Config {
        let mut config = postgres::Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .dbname(&self.name)
            .user(&self.user)
            .password(&self.password);
        config
    }

    /// Override fields from `PLANKA_DB_*` variables read through `lookup`.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("PLANKA_DB_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PLANKA_DB_PORT") {
            self.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "PLANKA_DB_PORT",
                value: port.clone(),
            })?;
        }
        if let Some(name) = lookup("PLANKA_DB_NAME") {
            self.name = name;
        }
        if let Some(user) = lookup("PLANKA_DB_USER") {
            self.user = user;
        }
        if let Some(password) = lookup("PLANKA_DB_PASSWORD") {
            self.password = password;
        }
        Ok(())
    }

    /// Override fields from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|var| std::env::var(var).ok())
    }
}

impl Config {
    /// Load configuration from file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the explicit or discovered config file, or defaults when none
    /// exists, then apply environment overrides.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from))
        {
            Some(path) => Self::load(path)?,
            None => match discover_config_file() {
                Some(path) => {
                    debug!(path = %path.display(), "Using discovered config file");
                    Self::load(path)?
                }
                None => Self::default(),
            },
        };
        config.database.apply_env()?;
        Ok(config)
    }
}

/// First existing config file among the default locations.
fn discover_config_file() -> Option<PathBuf> {
    let project = PathBuf::from(PROJECT_CONFIG_FILE);
    if project.is_file() {
        return Some(project);
    }
    dirs::home_dir()
        .map(|home| home.join(".planka-import").join("config.yaml"))
        .filter(|path| path.is_file())
}
