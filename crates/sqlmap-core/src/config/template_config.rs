//! Template backend configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TEMPLATE_BACKEND;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TemplateConfig {
    /// Template backend name. Default: "default".
    pub backend: Option<String>,
}

impl TemplateConfig {
    pub fn effective_backend(&self) -> &str {
        self.backend.as_deref().unwrap_or(DEFAULT_TEMPLATE_BACKEND)
    }
}
