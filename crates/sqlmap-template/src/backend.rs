//! Template backend capability: compile statement text once, render it
//! many times. Alternate template engines plug in by implementing these
//! two traits.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use sqlmap_core::constants::DEFAULT_TEMPLATE_BACKEND;
use sqlmap_core::errors::TemplateError;

use crate::lang::Template;

/// A compiled statement template.
pub trait CompiledTemplate: Send + Sync + fmt::Debug {
    /// Render against `params`. Whitespace normalization is applied by
    /// the cache, not here.
    fn render(&self, params: &Value) -> Result<String, TemplateError>;
}

/// Compiles raw statement text into a `CompiledTemplate`.
pub trait TemplateBackend: Send + Sync {
    fn name(&self) -> &str;

    /// `name` is the statement key and must appear in any error raised.
    fn compile(&self, name: &str, text: &str) -> Result<Arc<dyn CompiledTemplate>, TemplateError>;
}

/// The built-in Go-template flavoured language.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultBackend;

impl TemplateBackend for DefaultBackend {
    fn name(&self) -> &str {
        DEFAULT_TEMPLATE_BACKEND
    }

    fn compile(&self, name: &str, text: &str) -> Result<Arc<dyn CompiledTemplate>, TemplateError> {
        Ok(Arc::new(Template::parse(name, text)?))
    }
}

impl CompiledTemplate for Template {
    fn render(&self, params: &Value) -> Result<String, TemplateError> {
        self.execute(params)
    }
}

/// Create a backend by configured name.
pub fn backend_by_name(name: &str) -> Result<Arc<dyn TemplateBackend>, TemplateError> {
    match name {
        DEFAULT_TEMPLATE_BACKEND => Ok(Arc::new(DefaultBackend)),
        _ => Err(TemplateError::UnsupportedBackend {
            name: name.to_string(),
        }),
    }
}
