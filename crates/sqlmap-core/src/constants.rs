//! Well-known names shared across the workspace.

/// Namespace used when a statement document does not declare one.
pub const DEFAULT_NAMESPACE: &str = "default_namespace";

/// Separator between namespace and statement id in a statement key.
pub const KEY_SEPARATOR: char = '.';

/// Name of the built-in template backend.
pub const DEFAULT_TEMPLATE_BACKEND: &str = "default";

/// Root element of a statement document.
pub const DOCUMENT_ROOT: &str = "sqlmap";

/// Statement element inside a document.
pub const STATEMENT_ELEMENT: &str = "sql";

/// Project config file looked up by `SqlMapConfig::load`.
pub const CONFIG_FILE_NAME: &str = "sqlmap.toml";

/// Build the fully-qualified key for a statement.
pub fn statement_key(namespace: &str, id: &str) -> String {
    format!("{namespace}{KEY_SEPARATOR}{id}")
}
