//! Logging configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log every rendered statement at debug level. Default: true.
    pub log_sql: Option<bool>,
}

impl LoggingConfig {
    pub fn effective_log_sql(&self) -> bool {
        self.log_sql.unwrap_or(true)
    }
}
