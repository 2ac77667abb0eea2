//! Compile-once, render-many template cache keyed by statement key.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use sqlmap_core::errors::TemplateError;

use crate::backend::{CompiledTemplate, DefaultBackend, TemplateBackend};
use crate::normalize::normalize_whitespace;

/// Owns the compiled form of every statement rendered so far.
///
/// Entries are never invalidated: statement text is fixed once loaded.
/// A failed compile is not cached, so the next call reports it again.
pub struct TemplateCache {
    backend: Arc<dyn TemplateBackend>,
    compiled: Mutex<HashMap<String, Arc<dyn CompiledTemplate>>>,
}

impl TemplateCache {
    pub fn new(backend: Arc<dyn TemplateBackend>) -> Self {
        Self {
            backend,
            compiled: Mutex::new(HashMap::new()),
        }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Render the statement `key`, compiling `raw_text` on first use, and
    /// normalize the whitespace of the result.
    pub fn render(&self, key: &str, raw_text: &str, params: &Value) -> Result<String, TemplateError> {
        let template = self.compiled_for(key, raw_text)?;
        let sql = template.render(params)?;
        Ok(normalize_whitespace(&sql))
    }

    /// Look up or compile. The lock is held across check, compile and
    /// insert; rendering happens outside it.
    fn compiled_for(
        &self,
        key: &str,
        raw_text: &str,
    ) -> Result<Arc<dyn CompiledTemplate>, TemplateError> {
        // Entries are immutable once inserted, so a poisoned map is still valid.
        let mut compiled = self.compiled.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(template) = compiled.get(key) {
            return Ok(Arc::clone(template));
        }
        let template = self.backend.compile(key, raw_text)?;
        tracing::debug!(key, backend = self.backend.name(), "compiled statement template");
        compiled.insert(key.to_string(), Arc::clone(&template));
        Ok(template)
    }

    /// Whether `key` has been compiled.
    pub fn contains(&self, key: &str) -> bool {
        self.compiled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.compiled.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TemplateCache {
    fn default() -> Self {
        Self::new(Arc::new(DefaultBackend))
    }
}

impl std::fmt::Debug for TemplateCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateCache")
            .field("backend", &self.backend.name())
            .field("compiled", &self.len())
            .finish()
    }
}
