//! Observability for sqlmap.
//! `tracing` crate with `EnvFilter`, per-target log levels.

pub mod setup;

pub use setup::{env_filter, init_tracing, DEFAULT_DIRECTIVES};

/// Target used for rendered-SQL events.
pub const SQL_TARGET: &str = "sqlmap::sql";
