//! Statement registry errors.

use super::error_code::{self, SqlMapErrorCode};

/// Errors raised by statement registration and lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("no statement registered under key `{key}`")]
    UnknownStatement { key: String },

    #[error("statement key `{key}` is already registered")]
    DuplicateKey { key: String },
}

impl SqlMapErrorCode for RegistryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownStatement { .. } => error_code::UNKNOWN_STATEMENT,
            Self::DuplicateKey { .. } => error_code::DUPLICATE_KEY,
        }
    }
}
