//! Connection settings for the process-wide MongoDB access.

use sha2::{Digest, Sha256};
use std::env;

pub const DEFAULT_URL: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "db";
pub const DEFAULT_PREFIX: &str = "dev_";

/// Where to connect and how to name databases.
///
/// The physical database name is `prefix` followed by the requested database, or by
/// `database` when none is requested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MongoConfig {
    pub url: String,
    pub database: String,
    pub prefix: String,
}

impl MongoConfig {
    pub fn new(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            prefix: String::new(),
        }
    }

    /// Reads `MONGO_URL`, `MONGO_DB` and `MONGO_PREFIX_NAME`, loading a `.env` file first
    /// when one exists.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            url: env::var("MONGO_URL").unwrap_or_else(|_| DEFAULT_URL.to_string()),
            database: env::var("MONGO_DB").unwrap_or_else(|_| DEFAULT_DATABASE.to_string()),
            prefix: env::var("MONGO_PREFIX_NAME").unwrap_or_else(|_| DEFAULT_PREFIX.to_string()),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// The physical database name for a requested database (the configured one if `None`).
    pub fn database_name(&self, requested: Option<&str>) -> String {
        let database = requested
            .filter(|name| !name.is_empty())
            .unwrap_or(self.database.as_str());

        format!("{}{}", self.prefix, database)
    }

    /// Cache key of the connection serving `database_name`. The URL is hashed so that
    /// credentials never end up in keys or logs.
    pub fn connection_key(&self, database_name: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.url.as_bytes());

        format!("{:x}_{}", hasher.finalize(), database_name)
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}
