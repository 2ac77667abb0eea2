//! Top-level error returned from the engine call surface.

use super::error_code::{self, SqlMapErrorCode};
use super::{
    BindError, ConfigError, DatabaseError, LoadError, RegistryError, SessionError,
    TemplateError,
};

/// Errors returned by `Engine` and `Session`.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum SqlMapError {
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Bind error: {0}")]
    Bind(#[from] BindError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("engine is not initialized")]
    EngineNotInitialized,
}

impl SqlMapErrorCode for SqlMapError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Registry(e) => e.error_code(),
            Self::Template(e) => e.error_code(),
            Self::Bind(e) => e.error_code(),
            Self::Session(e) => e.error_code(),
            Self::Database(e) => e.error_code(),
            Self::Load(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::EngineNotInitialized => error_code::ENGINE_NOT_INITIALIZED,
        }
    }
}

/// Result alias used across the engine call surface.
pub type SqlMapResult<T> = Result<T, SqlMapError>;
