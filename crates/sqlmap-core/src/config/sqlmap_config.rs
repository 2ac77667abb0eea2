//! Top-level sqlmap configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{DatabaseConfig, LoggingConfig, StatementConfig, TemplateConfig};
use crate::constants::CONFIG_FILE_NAME;
use crate::errors::ConfigError;

/// Largest read pool the connection layer accepts.
const MAX_READ_POOL_SIZE: usize = 8;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`SQLMAP_*`)
/// 3. Project config (`sqlmap.toml` in the project root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SqlMapConfig {
    pub database: DatabaseConfig,
    pub statements: StatementConfig,
    pub template: TemplateConfig,
    pub logging: LoggingConfig,
}

/// Programmatic overrides, the highest-priority layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub driver: Option<String>,
    pub data_source: Option<String>,
    pub statement_dir: Option<String>,
    pub read_pool_size: Option<usize>,
    pub template_backend: Option<String>,
}

impl SqlMapConfig {
    /// Build a config for the three values `Engine::init` takes.
    pub fn for_source(driver: &str, data_source: &str, statement_dir: &str) -> Self {
        let mut config = Self::default();
        config.database.driver = Some(driver.to_string());
        config.database.data_source = Some(data_source.to_string());
        config.statements.dir = Some(statement_dir.to_string());
        config
    }

    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(CONFIG_FILE_NAME);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &SqlMapConfig) -> Result<(), ConfigError> {
        if config.database.effective_driver().trim().is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "database.driver".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if let Some(size) = config.database.read_pool_size {
            if !(1..=MAX_READ_POOL_SIZE).contains(&size) {
                return Err(ConfigError::ValidationFailed {
                    field: "database.read_pool_size".to_string(),
                    message: format!("must be between 1 and {MAX_READ_POOL_SIZE}"),
                });
            }
        }
        if config.database.busy_timeout_ms == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "database.busy_timeout_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.statements.extensions.iter().any(|ext| ext.trim().is_empty()) {
            return Err(ConfigError::ValidationFailed {
                field: "statements.extensions".to_string(),
                message: "extensions must not be empty strings".to_string(),
            });
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut SqlMapConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: SqlMapConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a value.
    fn merge(base: &mut SqlMapConfig, other: &SqlMapConfig) {
        // Database
        if other.database.driver.is_some() {
            base.database.driver = other.database.driver.clone();
        }
        if other.database.data_source.is_some() {
            base.database.data_source = other.database.data_source.clone();
        }
        if other.database.read_pool_size.is_some() {
            base.database.read_pool_size = other.database.read_pool_size;
        }
        if other.database.busy_timeout_ms.is_some() {
            base.database.busy_timeout_ms = other.database.busy_timeout_ms;
        }

        // Statements
        if other.statements.dir.is_some() {
            base.statements.dir = other.statements.dir.clone();
        }
        if !other.statements.extensions.is_empty() {
            base.statements.extensions = other.statements.extensions.clone();
        }
        if other.statements.default_namespace.is_some() {
            base.statements.default_namespace = other.statements.default_namespace.clone();
        }

        // Template
        if other.template.backend.is_some() {
            base.template.backend = other.template.backend.clone();
        }

        // Logging
        if other.logging.log_sql.is_some() {
            base.logging.log_sql = other.logging.log_sql;
        }
    }

    /// Apply `SQLMAP_*` environment variables. Unparseable values are skipped.
    fn apply_env_overrides(config: &mut SqlMapConfig) {
        if let Ok(val) = std::env::var("SQLMAP_DRIVER") {
            config.database.driver = Some(val);
        }
        if let Ok(val) = std::env::var("SQLMAP_DATA_SOURCE") {
            config.database.data_source = Some(val);
        }
        if let Ok(val) = std::env::var("SQLMAP_STATEMENT_DIR") {
            config.statements.dir = Some(val);
        }
        if let Ok(val) = std::env::var("SQLMAP_READ_POOL_SIZE") {
            match val.parse::<usize>() {
                Ok(v) => config.database.read_pool_size = Some(v),
                Err(_) => tracing::warn!(value = %val, "ignoring invalid SQLMAP_READ_POOL_SIZE"),
            }
        }
        if let Ok(val) = std::env::var("SQLMAP_LOG_SQL") {
            match val.parse::<bool>() {
                Ok(v) => config.logging.log_sql = Some(v),
                Err(_) => tracing::warn!(value = %val, "ignoring invalid SQLMAP_LOG_SQL"),
            }
        }
    }

    /// Apply programmatic overrides (highest priority).
    fn apply_overrides(config: &mut SqlMapConfig, overrides: &ConfigOverrides) {
        if let Some(ref v) = overrides.driver {
            config.database.driver = Some(v.clone());
        }
        if let Some(ref v) = overrides.data_source {
            config.database.data_source = Some(v.clone());
        }
        if let Some(ref v) = overrides.statement_dir {
            config.statements.dir = Some(v.clone());
        }
        if let Some(v) = overrides.read_pool_size {
            config.database.read_pool_size = Some(v);
        }
        if let Some(ref v) = overrides.template_backend {
            config.template.backend = Some(v.clone());
        }
    }
}
