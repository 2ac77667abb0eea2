//! Database connection configuration.

use serde::{Deserialize, Serialize};

/// Configuration handed to the connection pool.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Driver name. Default: "sqlite".
    pub driver: Option<String>,
    /// Data source: a database file path or ":memory:".
    pub data_source: Option<String>,
    /// Number of read connections. Default: 4.
    pub read_pool_size: Option<usize>,
    /// Busy timeout in milliseconds. Default: 5000.
    pub busy_timeout_ms: Option<u64>,
}

impl DatabaseConfig {
    /// Returns the effective driver name, defaulting to "sqlite".
    pub fn effective_driver(&self) -> &str {
        self.driver.as_deref().unwrap_or("sqlite")
    }

    /// Returns the effective data source, defaulting to an in-memory database.
    pub fn effective_data_source(&self) -> &str {
        self.data_source.as_deref().unwrap_or(":memory:")
    }

    /// Returns the effective read pool size, defaulting to 4.
    pub fn effective_read_pool_size(&self) -> usize {
        self.read_pool_size.unwrap_or(4)
    }

    /// Returns the effective busy timeout, defaulting to 5000ms.
    pub fn effective_busy_timeout_ms(&self) -> u64 {
        self.busy_timeout_ms.unwrap_or(5000)
    }
}
