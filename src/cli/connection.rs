//! Database connection flags.
//!
//! Every flag is optional so that unset flags fall through to the config
//! file, environment variables and built-in defaults.

use crate::config::DatabaseConfig;
use clap::Args;

/// PostgreSQL connection arguments
#[derive(Args, Debug, Default, Clone)]
pub struct ConnectionArgs {
    /// The host IP for the postgres server [default: 127.0.0.1]
    #[arg(long, alias = "DB-host", value_name = "HOST")]
    pub db_host: Option<String>,

    /// Port of the postgres server [default: 5432]
    #[arg(long, alias = "DB-port", value_name = "PORT")]
    pub db_port: Option<u16>,

    /// Postgres database name [default: planka]
    #[arg(long, alias = "DB-name", value_name = "NAME")]
    pub db_name: Option<String>,

    /// Username for the postgres server [default: postgres]
    #[arg(long, alias = "DB-user", value_name = "USER")]
    pub db_user: Option<String>,

    /// Password for the postgres server [default: postgres]
    #[arg(long, alias = "DB-pwd", value_name = "PASSWORD")]
    pub db_password: Option<String>,
}

impl ConnectionArgs {
    /// Override `config` with every flag that was given.
    pub fn apply(&self, config: &mut DatabaseConfig) {
        if let Some(host) = &self.db_host {
            config.host = host.clone();
        }
        if let Some(port) = self.db_port {
            config.port = port;
        }
        if let Some(name) = &self.db_name {
            config.name = name.clone();
        }
        if let Some(user) = &self.db_user {
            config.user = user.clone();
        }
        if let Some(password) = &self.db_password {
            config.password = password.clone();
        }
    }
}
