//! Startup configuration
//!
//! The service takes positional arguments:
//! `<port> <dburl> [<env>] [keenProjectID] [keenWriteAPIKey]`.
//! Tuning knobs that do not belong on the command line come from the
//! environment (optionally via `.env`).

use std::env;
use std::path::PathBuf;
use thiserror::Error;

use crate::metrics::keen::DEFAULT_KEEN_API_URL;

pub const USAGE: &str = "usage: iban_rust_ws <port> <dburl> [<env>] [keenProjectID] [keenWriteAPIKey]";

/// Environment label used whenever no remote collector is configured.
pub const DEFAULT_ENVIRONMENT: &str = "Test";

const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required arguments")]
    Usage,

    #[error("Invalid port '{0}'")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeenCredentials {
    pub project_id: String,
    pub write_key: String,
    pub api_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub port: u16,
    pub database_url: String,
    pub environment: String,
    pub keen: Option<KeenCredentials>,
    pub static_dir: PathBuf,
    pub db_max_connections: u32,
}

impl ServiceConfig {
    /// Parse the positional arguments, program name excluded.
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        if args.len() < 2 {
            return Err(ConfigError::Usage);
        }

        let port = args[0]
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(args[0].clone()))?;

        // The environment label only counts together with collector credentials
        let (environment, keen) = match args.get(2..5) {
            Some([environment, project_id, write_key]) => (
                environment.clone(),
                Some(KeenCredentials {
                    project_id: project_id.clone(),
                    write_key: write_key.clone(),
                    api_url: env::var("KEEN_API_URL").unwrap_or_else(|_| DEFAULT_KEEN_API_URL.to_string()),
                }),
            ),
            _ => (DEFAULT_ENVIRONMENT.to_string(), None),
        };

        Ok(Self {
            port,
            database_url: args[1].clone(),
            environment,
            keen,
            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATIC_DIR)),
            db_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|val| val.parse().ok())
                .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
        })
    }

    /// Static pages are only hosted for the `Live` and `Test` environments.
    pub fn serves_static_files(&self) -> bool {
        matches!(self.environment.as_str(), "Live" | "Test")
    }
}
