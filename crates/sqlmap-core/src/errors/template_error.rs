//! Template compile and render errors.

use super::error_code::{self, SqlMapErrorCode};

/// Errors raised while compiling or rendering a statement template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("template syntax error in `{key}` at line {line}: {message}")]
    Syntax {
        key: String,
        line: usize,
        message: String,
    },

    #[error("failed to render `{key}`: {message}")]
    Render { key: String, message: String },

    #[error("unsupported template backend `{name}`")]
    UnsupportedBackend { name: String },
}

impl TemplateError {
    /// Statement key the error refers to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Syntax { key, .. } | Self::Render { key, .. } => Some(key),
            Self::UnsupportedBackend { .. } => None,
        }
    }
}

impl SqlMapErrorCode for TemplateError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Syntax { .. } => error_code::TEMPLATE_SYNTAX,
            Self::Render { .. } => error_code::RENDER_ERROR,
            Self::UnsupportedBackend { .. } => error_code::UNSUPPORTED_BACKEND,
        }
    }
}
