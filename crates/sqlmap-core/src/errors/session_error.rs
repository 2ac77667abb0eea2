//! Session errors.

use super::error_code::{self, SqlMapErrorCode};

/// Errors raised by session lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("session was not created by an engine")]
    NotInitialized,
}

impl SqlMapErrorCode for SessionError {
    fn error_code(&self) -> &'static str {
        error_code::SESSION_NOT_INITIALIZED
    }
}
