//! sqlmap-core: shared building blocks for the sqlmap data-access layer.
//!
//! - `errors`: one error enum per subsystem plus the aggregating `SqlMapError`
//! - `config`: TOML configuration with layered resolution
//! - `tracing`: subscriber setup driven by `SQLMAP_LOG`
//! - `constants`: well-known names shared across crates

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;

pub use config::SqlMapConfig;
pub use errors::{SqlMapError, SqlMapResult};
