//! Typed errors for store access and import runs.

use std::path::PathBuf;
use thiserror::Error;

/// A failure reported by the backing database.
///
/// "No matching row" is never an error: lookups return `Ok(None)` for that.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("postgres error: {0}")]
    Postgres(#[from] postgres::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Errors that abort an import run.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Merge mode requires the project to exist already.
    #[error("project {0} does not exist")]
    ProjectNotFound(String),

    /// New projects are shared with a fixed user account.
    #[error("user account {0} does not exist")]
    UserNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid import document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("import document must be a JSON object")]
    NotAnObject,
}

/// Errors raised while assembling configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("\"{0}\" is not a valid logging level. Possible values are debug, info, warning, error, and critical.")]
    InvalidLogLevel(String),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type for import operations.
pub type ImportResult<T> = std::result::Result<T, ImportError>;
