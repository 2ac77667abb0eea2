//! Database driver errors.

use super::error_code::{self, SqlMapErrorCode};

/// Errors surfaced from the database driver and connection pool.
/// Transient failures are reported as-is; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatabaseError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("database is busy")]
    DbBusy,

    #[error("unsupported driver `{name}`")]
    UnsupportedDriver { name: String },

    #[error("{what} lock poisoned")]
    LockPoisoned { what: &'static str },
}

impl SqlMapErrorCode for DatabaseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DbBusy => error_code::DB_BUSY,
            Self::UnsupportedDriver { .. } => error_code::UNSUPPORTED_DRIVER,
            _ => error_code::DATABASE_ERROR,
        }
    }
}
