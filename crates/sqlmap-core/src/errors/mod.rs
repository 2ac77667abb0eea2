//! Error handling for sqlmap.
//! One error enum per subsystem, `thiserror` only.

pub mod bind_error;
pub mod config_error;
pub mod database_error;
pub mod error_code;
pub mod load_error;
pub mod registry_error;
pub mod session_error;
pub mod sqlmap_error;
pub mod template_error;

pub use bind_error::BindError;
pub use config_error::ConfigError;
pub use database_error::DatabaseError;
pub use error_code::SqlMapErrorCode;
pub use load_error::LoadError;
pub use registry_error::RegistryError;
pub use session_error::SessionError;
pub use sqlmap_error::{SqlMapError, SqlMapResult};
pub use template_error::TemplateError;
