//! sqlmap-template: turns statement text into SQL.
//!
//! - `backend`: the `TemplateBackend` / `CompiledTemplate` capability pair
//! - `lang`: the built-in Go-template flavoured language
//! - `cache`: compile-once, render-many cache keyed by statement key
//! - `normalize`: whitespace normalization applied to every render

pub mod backend;
pub mod cache;
pub mod lang;
pub mod normalize;

pub use backend::{backend_by_name, CompiledTemplate, DefaultBackend, TemplateBackend};
pub use cache::TemplateCache;
pub use lang::Template;
pub use normalize::normalize_whitespace;
