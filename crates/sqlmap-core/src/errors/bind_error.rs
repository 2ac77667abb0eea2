//! Result binding errors.

use super::error_code::{self, SqlMapErrorCode};

/// Errors raised while binding a result set into records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("invalid destination type `{type_name}`: {message}")]
    InvalidDestinationType { type_name: String, message: String },

    #[error("cannot scan column `{column}` into field `{field}`: {message}")]
    Scan {
        column: String,
        field: String,
        message: String,
    },

    #[error("no record found")]
    NoRecordFound,

    #[error("more than one record found")]
    MultipleRecordsFound,
}

impl SqlMapErrorCode for BindError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDestinationType { .. } => error_code::INVALID_DESTINATION,
            Self::Scan { .. } => error_code::SCAN_ERROR,
            Self::NoRecordFound => error_code::NO_RECORD,
            Self::MultipleRecordsFound => error_code::MULTIPLE_RECORDS,
        }
    }
}
