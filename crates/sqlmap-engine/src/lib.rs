//! sqlmap-engine: the sqlmap call surface.
//!
//! SQL lives in XML statement documents as named templates:
//!
//! ```xml
//! <sqlmap namespace="users">
//!   <sql id="by_id">SELECT id, name FROM users WHERE id = {{ .id }}</sql>
//! </sqlmap>
//! ```
//!
//! An [`Engine`] loads them once at `init`, renders `users.by_id` with the
//! parameters of each call, runs the result, and binds rows into
//! dictionaries or [`Record`] types. [`Session`] adds nested transactions.

pub mod engine;
pub mod loader;
pub mod registry;
pub mod session;

pub use engine::Engine;
pub use loader::{load_dir, LoadSummary, StatementDef};
pub use registry::StatementRegistry;
pub use session::Session;

pub use sqlmap_core::errors::{
    BindError, DatabaseError, LoadError, RegistryError, SessionError, SqlMapErrorCode,
    TemplateError,
};
pub use sqlmap_core::{SqlMapConfig, SqlMapError, SqlMapResult};
pub use sqlmap_storage::{
    record, ConnectionPool, ExecResult, FromColumn, Record, RecordList, RecordSlot, ResultSet,
};
pub use sqlmap_template::{CompiledTemplate, TemplateBackend};
