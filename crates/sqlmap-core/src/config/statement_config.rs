//! Statement source configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_NAMESPACE;

/// Where statement documents live and how they are discovered.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StatementConfig {
    /// Directory walked recursively for statement documents.
    pub dir: Option<String>,
    /// File extensions treated as statement documents. Default: ["xml"].
    pub extensions: Vec<String>,
    /// Namespace for documents without one. Default: "default_namespace".
    pub default_namespace: Option<String>,
}

impl StatementConfig {
    /// Returns the effective extension list, defaulting to `["xml"]`.
    pub fn effective_extensions(&self) -> Vec<String> {
        if self.extensions.is_empty() {
            vec!["xml".to_string()]
        } else {
            self.extensions.clone()
        }
    }

    /// Returns the effective default namespace.
    pub fn effective_default_namespace(&self) -> &str {
        self.default_namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }
}
