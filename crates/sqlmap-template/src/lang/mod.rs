//! The built-in template language.
//!
//! Go-template flavoured: `{{ .field }}` substitution, pipelines with
//! `|`, `if`/`else if`/`else`, `range` (with `$i, $e :=` declarations),
//! `with`, and a small fixed set of functions resolved at parse time.
//! Parameters are JSON values; anything `Serialize` converts into one.

mod ast;
mod eval;
mod funcs;
mod lexer;
mod parser;
mod value;

use serde_json::Value;
use sqlmap_core::errors::TemplateError;

/// A parsed template, immutable and shareable across threads.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    nodes: Vec<ast::Node>,
}

impl Template {
    /// Parse `text`; `name` is carried into every error.
    pub fn parse(name: &str, text: &str) -> Result<Self, TemplateError> {
        let syntax = |e: lexer::SyntaxError| TemplateError::Syntax {
            key: name.to_string(),
            line: e.line,
            message: e.message,
        };
        let items = lexer::lex(text).map_err(syntax)?;
        let nodes = parser::parse(items).map_err(syntax)?;
        Ok(Self {
            name: name.to_string(),
            nodes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render against `params`. The output is not whitespace-normalized.
    pub fn execute(&self, params: &Value) -> Result<String, TemplateError> {
        eval::execute(&self.nodes, params).map_err(|message| TemplateError::Render {
            key: self.name.clone(),
            message,
        })
    }
}
