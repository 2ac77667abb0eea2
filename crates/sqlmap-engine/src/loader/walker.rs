//! Recursive discovery of statement documents.

use std::path::{Path, PathBuf};

use sqlmap_core::errors::LoadError;
use walkdir::WalkDir;

/// Every file under `dir` whose extension is in `extensions`
/// (case-insensitive), in a stable order. Unreadable entries fail the walk.
pub fn discover(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, LoadError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| LoadError::Walk {
            path: e.path().unwrap_or(dir).to_path_buf(),
            message: e.to_string(),
        })?;
        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}
