//! Configuration system for sqlmap.
//! TOML-based, layered resolution: overrides > env > project file > defaults.

pub mod database_config;
pub mod logging_config;
pub mod sqlmap_config;
pub mod statement_config;
pub mod template_config;

pub use database_config::DatabaseConfig;
pub use logging_config::LoggingConfig;
pub use sqlmap_config::{ConfigOverrides, SqlMapConfig};
pub use statement_config::StatementConfig;
pub use template_config::TemplateConfig;
