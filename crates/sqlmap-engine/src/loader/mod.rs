//! Statement loading: walk a directory, parse every statement document,
//! register each statement.

pub mod document;
pub mod walker;

use std::path::Path;

use sqlmap_core::config::StatementConfig;
use sqlmap_core::errors::{LoadError, SqlMapErrorCode};

pub use document::{parse_document, StatementDef};
pub use walker::discover;

use crate::registry::StatementRegistry;

/// Counts from one load pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub files: usize,
    pub statements: usize,
}

/// Load every statement document under `dir` into `registry`.
///
/// A key defined twice, within one document or across documents, fails the
/// whole load and names the file holding the second definition.
pub fn load_dir(
    registry: &StatementRegistry,
    dir: &Path,
    config: &StatementConfig,
) -> Result<LoadSummary, LoadError> {
    let files = discover(dir, &config.effective_extensions())?;
    let mut summary = LoadSummary::default();

    for path in &files {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let defs = parse_document(path, &content, config.effective_default_namespace())?;
        for def in &defs {
            let key = def.key();
            if let Err(e) = registry.register(&key, &def.text) {
                tracing::warn!(code = e.error_code(), key = %key, path = %path.display(), "statement rejected");
                return Err(LoadError::DuplicateKey {
                    key,
                    path: path.clone(),
                });
            }
        }
        tracing::debug!(path = %path.display(), statements = defs.len(), "statement document loaded");
        summary.files += 1;
        summary.statements += defs.len();
    }

    tracing::info!(
        dir = %dir.display(),
        files = summary.files,
        statements = summary.statements,
        "statements loaded"
    );
    Ok(summary)
}
