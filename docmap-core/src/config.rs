//! Connection configuration.

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{DocumentMapperError, DocumentMapperResult};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: &str = "27017";

/// Environment variables read by [`ClientConfig::from_env`].
pub const HOST_ENV: &str = "DOCMAP_HOST";
pub const PORT_ENV: &str = "DOCMAP_PORT";
pub const DATABASE_ENV: &str = "DOCMAP_DATABASE";

/// Where to connect and which database to use.
///
/// Host and port default to a local server; the database name has no default and must be set
/// before connecting.
///
/// # Example
///
/// ```ignore
/// let config = ClientConfig::new("test").with_host("db.internal");
/// assert_eq!(config.url(), "mongodb://db.internal:27017");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub host: String,
    pub port: String,
    pub database: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT.to_string(),
            database: String::new(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration for `database` on the default host and port.
    pub fn new(database: &str) -> Self {
        Self {
            database: database.to_string(),
            ..Self::default()
        }
    }

    /// Reads the configuration from the environment, keeping defaults for unset variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var(HOST_ENV).unwrap_or(defaults.host),
            port: env::var(PORT_ENV).unwrap_or(defaults.port),
            database: env::var(DATABASE_ENV).unwrap_or(defaults.database),
        }
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn with_port(mut self, port: &str) -> Self {
        self.port = port.to_string();
        self
    }

    pub fn with_database(mut self, database: &str) -> Self {
        self.database = database.to_string();
        self
    }

    /// Renders the connection URI.
    pub fn url(&self) -> String {
        format!("mongodb://{}:{}", self.host, self.port)
    }

    /// Checks that the configuration can be used to connect.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentMapperError::InvalidArgument`] if the database name is empty.
    pub fn validate(&self) -> DocumentMapperResult<()> {
        if self.database.is_empty() {
            return Err(DocumentMapperError::InvalidArgument(
                "database name must not be empty".into(),
            ));
        }

        Ok(())
    }
}
