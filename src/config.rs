//! Client configuration
//!
//! Settings come from an optional TOML file, then a `.env` file, then the
//! environment:
//!
//! - `ORIENTDB_HOST` - Server host
//! - `ORIENTDB_PORT` - Server port
//! - `ORIENTDB_DATABASE` - Database to open (empty = server session)
//! - `ORIENTDB_USER` - User name
//! - `ORIENTDB_PASSWORD` - Password
//!
//! A DSN of the form `user@password:host[:port]/database` is accepted too.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{OrientError, OrientResult};
use crate::protocol::{DatabaseType, DEFAULT_PORT};

pub const ENV_HOST: &str = "ORIENTDB_HOST";
pub const ENV_PORT: &str = "ORIENTDB_PORT";
pub const ENV_DATABASE: &str = "ORIENTDB_DATABASE";
pub const ENV_USER: &str = "ORIENTDB_USER";
pub const ENV_PASSWORD: &str = "ORIENTDB_PASSWORD";

static DSN_RX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^@]+)@([^:]+):([^/]+)/(.+)$").expect("valid DSN regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub db_type: DatabaseType,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            database: String::new(),
            username: "admin".to_string(),
            password: String::new(),
            db_type: DatabaseType::Document,
        }
    }
}

impl ClientConfig {
    /// Load configuration from an optional TOML file, the `.env` file in
    /// the working directory, and environment overrides.
    pub fn load(path: Option<&Path>) -> OrientResult<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    OrientError::Config(format!("Cannot read {}: {}", path.display(), e))
                })?;
                toml::from_str(&content).map_err(|e| {
                    OrientError::Config(format!("Invalid config {}: {}", path.display(), e))
                })?
            }
            None => Self::default(),
        };

        // Missing .env is fine
        let _ = dotenvy::dotenv();

        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse `user@password:host[:port]/database`.
    pub fn from_dsn(dsn: &str) -> OrientResult<Self> {
        let caps = DSN_RX.captures(dsn).ok_or_else(|| {
            OrientError::Config(format!(
                "Unable to parse connection string: {}. Must be of the format: {}",
                dsn, "user@password:host[:port]/database"
            ))
        })?;

        let (host, port) = match caps[3].split_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse()
                    .map_err(|_| OrientError::Config(format!("Invalid port in DSN: {}", port)))?;
                (host.to_string(), port)
            }
            None => (caps[3].to_string(), DEFAULT_PORT),
        };

        Ok(Self {
            host,
            port,
            database: caps[4].to_string(),
            username: caps[1].to_string(),
            password: caps[2].to_string(),
            db_type: DatabaseType::Document,
        })
    }

    /// Apply environment variable overrides to the configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var(ENV_HOST) {
            if !host.is_empty() {
                self.host = host;
            }
        }

        if let Ok(port_str) = std::env::var(ENV_PORT) {
            match port_str.parse::<u16>() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!("Ignoring invalid {}: {}", ENV_PORT, port_str),
            }
        }

        if let Ok(database) = std::env::var(ENV_DATABASE) {
            self.database = database;
        }

        if let Ok(user) = std::env::var(ENV_USER) {
            if !user.is_empty() {
                self.username = user;
            }
        }

        if let Ok(password) = std::env::var(ENV_PASSWORD) {
            self.password = password;
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
