use std::time::Duration;

use tokio::net::TcpStream;

use super::OrientClient;
use crate::config::ClientConfig;
use crate::error::{OrientError, OrientResult};
use crate::protocol::DatabaseType;

/// Builder for creating an OrientClient with a session already open
pub struct ClientBuilder {
    addr: String,
    auth: Option<AuthMethod>,
    timeout_ms: Option<u64>,
}

pub enum AuthMethod {
    Server {
        username: String,
        password: String,
    },
    Database {
        database: String,
        db_type: DatabaseType,
        username: String,
        password: String,
    },
}

impl ClientBuilder {
    pub fn new(addr: &str) -> Self {
        Self {
            addr: addr.to_string(),
            auth: None,
            timeout_ms: None,
        }
    }

    /// Builder preloaded from a configuration. A database session is
    /// requested when the configuration names a database.
    pub fn from_config(config: &ClientConfig) -> Self {
        let builder = Self::new(&config.address());
        if config.database.is_empty() {
            builder.server(&config.username, &config.password)
        } else {
            builder.database(
                &config.database,
                config.db_type,
                &config.username,
                &config.password,
            )
        }
    }

    /// Open a server-level session after connecting.
    pub fn server(mut self, username: &str, password: &str) -> Self {
        self.auth = Some(AuthMethod::Server {
            username: username.to_string(),
            password: password.to_string(),
        });
        self
    }

    /// Open a database session after connecting.
    pub fn database(
        mut self,
        database: &str,
        db_type: DatabaseType,
        username: &str,
        password: &str,
    ) -> Self {
        self.auth = Some(AuthMethod::Database {
            database: database.to_string(),
            db_type,
            username: username.to_string(),
            password: password.to_string(),
        });
        self
    }

    /// Connection timeout in milliseconds.
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = Some(ms);
        self
    }

    pub async fn build(self) -> OrientResult<OrientClient<TcpStream>> {
        let mut client = match self.timeout_ms {
            Some(ms) => tokio::time::timeout(
                Duration::from_millis(ms),
                OrientClient::connect(&self.addr),
            )
            .await
            .map_err(|_| {
                OrientError::Connection(format!(
                    "Timed out after {}ms connecting to {}",
                    ms, self.addr
                ))
            })??,
            None => OrientClient::connect(&self.addr).await?,
        };

        match self.auth {
            Some(AuthMethod::Server { username, password }) => {
                client.connect_server(&username, &password).await?;
            }
            Some(AuthMethod::Database {
                database,
                db_type,
                username,
                password,
            }) => {
                client
                    .open_database(&database, db_type, &username, &password)
                    .await?;
            }
            None => {}
        }

        Ok(client)
    }
}
