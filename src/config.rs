//! Application configuration loaded from environment variables.

use std::time::Duration;

use serde::Deserialize;
use strum::{Display, EnumString};

/// Which [`EmployeeStore`](crate::employee::EmployeeStore) implementation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// MongoDB via the official driver.
    #[strum(to_string = "mongo", serialize = "mongodb")]
    #[serde(alias = "mongodb")]
    Mongo,
    /// Process-local map, nothing persisted.
    #[strum(serialize = "memory")]
    Memory,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Store ===
    /// Connection string for the document store.
    #[serde(default = "default_mongodb_uri")]
    pub mongodb_uri: String,

    /// Database holding the employee collection.
    #[serde(default = "default_database")]
    pub mongodb_database: String,

    /// Collection name for employee documents.
    #[serde(default = "default_collection")]
    pub employees_collection: String,

    /// Store implementation to use.
    #[serde(default = "default_backend")]
    pub store_backend: StoreBackend,

    /// Upper bound on establishing the first store connection.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    // === Server ===
    /// HTTP listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Install the Prometheus recorder and serve `/metrics`.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_mongodb_uri() -> String {
    "mongodb://127.0.0.1:27017/fiber-hrms".to_string()
}

fn default_database() -> String {
    "fiber-hrms".to_string()
}

fn default_collection() -> String {
    "employees".to_string()
}

fn default_backend() -> StoreBackend {
    StoreBackend::Mongo
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_port() -> u16 {
    3000
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mongodb_uri: default_mongodb_uri(),
            mongodb_database: default_database(),
            employees_collection: default_collection(),
            store_backend: default_backend(),
            connect_timeout_seconds: default_connect_timeout(),
            port: default_port(),
            metrics_enabled: true,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.store_backend == StoreBackend::Mongo {
            if self.mongodb_uri.is_empty() {
                return Err("MONGODB_URI is required".to_string());
            }

            if !self.mongodb_uri.starts_with("mongodb://")
                && !self.mongodb_uri.starts_with("mongodb+srv://")
            {
                return Err(
                    "MONGODB_URI must start with mongodb:// or mongodb+srv://".to_string(),
                );
            }
        }

        if self.mongodb_database.trim().is_empty() {
            return Err("MONGODB_DATABASE must not be empty".to_string());
        }

        if self.employees_collection.trim().is_empty() {
            return Err("EMPLOYEES_COLLECTION must not be empty".to_string());
        }

        if self.connect_timeout_seconds == 0 {
            return Err("CONNECT_TIMEOUT_SECONDS must be at least 1".to_string());
        }

        if self.port == 0 {
            return Err("PORT must be non-zero".to_string());
        }

        Ok(())
    }

    /// Initial connection timeout as a [`Duration`].
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}
