//! Runtime configuration
//!
//! Everything comes from the environment. The data directory is
//! required and its absence fails startup before any route is served;
//! the rest has defaults.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `FITLOG_DATA_DIR` | document store location | required |
//! | `PORT` | listen port | 3000 |
//! | `HOST` | bind address | 0.0.0.0 |
//! | `FITLOG_PUBLIC_DIR` | static assets directory | `public` |
//! | `FITLOG_CORS_ORIGINS` | comma-separated origins, empty = permissive | empty |

use std::env;
use std::path::PathBuf;

use thiserror::Error;

pub const DATA_DIR_ENV: &str = "FITLOG_DATA_DIR";
pub const PORT_ENV: &str = "PORT";
pub const HOST_ENV: &str = "HOST";
pub const PUBLIC_DIR_ENV: &str = "FITLOG_PUBLIC_DIR";
pub const CORS_ORIGINS_ENV: &str = "FITLOG_CORS_ORIGINS";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PUBLIC_DIR: &str = "public";

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Document store location
    pub data_dir: PathBuf,
    /// Bind address
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Static assets directory
    pub public_dir: PathBuf,
    /// CORS allowed origins; empty means permissive
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Reads configuration from the environment. Fails fast when the
    /// data directory variable is absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .map_err(|_| ConfigError::MissingVar(DATA_DIR_ENV))?;
        Self::with_data_dir(data_dir)
    }

    /// Environment configuration with an explicit data directory (the
    /// CLI override path).
    pub fn with_data_dir(data_dir: PathBuf) -> Result<Self, ConfigError> {
        Ok(Self {
            data_dir,
            host: env::var(HOST_ENV).unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: parse_port(env::var(PORT_ENV).ok().as_deref())?,
            public_dir: env::var(PUBLIC_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_PUBLIC_DIR)),
            cors_origins: parse_origins(env::var(CORS_ORIGINS_ENV).ok().as_deref()),
        })
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_port(raw: Option<&str>) -> Result<u16, ConfigError> {
    match raw {
        None => Ok(DEFAULT_PORT),
        Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
            name: PORT_ENV,
            value: raw.to_string(),
        }),
    }
}

fn parse_origins(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
