//! Statement source loading errors.

use std::path::PathBuf;

use super::error_code::{self, SqlMapErrorCode};

/// Errors raised while discovering and parsing statement documents.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    #[error("malformed XML in {path}: {message}")]
    Xml { path: PathBuf, message: String },

    #[error("{path} has no <sqlmap> root element")]
    MissingRoot { path: PathBuf },

    #[error("a statement in namespace `{namespace}` of {path} has no id")]
    MissingId { namespace: String, path: PathBuf },

    #[error("unexpected element <{element}> inside statement `{key}` in {path}")]
    UnexpectedElement {
        element: String,
        key: String,
        path: PathBuf,
    },

    #[error("statement key `{key}` in {path} is defined more than once")]
    DuplicateKey { key: String, path: PathBuf },
}

impl SqlMapErrorCode for LoadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateKey { .. } => error_code::DUPLICATE_KEY,
            _ => error_code::LOAD_ERROR,
        }
    }
}
