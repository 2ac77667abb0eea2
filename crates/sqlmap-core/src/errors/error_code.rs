//! SqlMapErrorCode trait: stable machine-readable codes for every error.

/// Every error enum implements this to expose a structured code string,
/// logged alongside failures and usable by callers for matching.
pub trait SqlMapErrorCode {
    /// Returns the error code string (e.g., "UNKNOWN_STATEMENT").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const UNKNOWN_STATEMENT: &str = "UNKNOWN_STATEMENT";
pub const DUPLICATE_KEY: &str = "DUPLICATE_KEY";
pub const TEMPLATE_SYNTAX: &str = "TEMPLATE_SYNTAX";
pub const RENDER_ERROR: &str = "RENDER_ERROR";
pub const UNSUPPORTED_BACKEND: &str = "UNSUPPORTED_BACKEND";
pub const INVALID_DESTINATION: &str = "INVALID_DESTINATION";
pub const SCAN_ERROR: &str = "SCAN_ERROR";
pub const NO_RECORD: &str = "NO_RECORD";
pub const MULTIPLE_RECORDS: &str = "MULTIPLE_RECORDS";
pub const SESSION_NOT_INITIALIZED: &str = "SESSION_NOT_INITIALIZED";
pub const ENGINE_NOT_INITIALIZED: &str = "ENGINE_NOT_INITIALIZED";
pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
pub const DB_BUSY: &str = "DB_BUSY";
pub const UNSUPPORTED_DRIVER: &str = "UNSUPPORTED_DRIVER";
pub const LOAD_ERROR: &str = "LOAD_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
