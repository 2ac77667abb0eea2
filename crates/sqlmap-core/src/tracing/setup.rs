//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::SQL_TARGET;

static INIT: Once = Once::new();

/// Filter used when `SQLMAP_LOG` is unset or invalid: every sqlmap crate at
/// info, rendered SQL (`sqlmap::sql`, debug level) hidden.
pub const DEFAULT_DIRECTIVES: &str =
    "sqlmap_core=info,sqlmap_template=info,sqlmap_storage=info,sqlmap_engine=info,sqlmap::sql=warn";

/// Build the filter for a `SQLMAP_LOG` value.
pub fn env_filter(value: Option<&str>) -> EnvFilter {
    value
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| EnvFilter::try_new(v).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Initialize the sqlmap tracing/logging system.
///
/// Reads the `SQLMAP_LOG` environment variable for per-target log levels,
/// e.g. `SQLMAP_LOG=sqlmap::sql=debug,sqlmap_storage=warn` to see every
/// rendered statement. Calling it more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let value = std::env::var("SQLMAP_LOG").ok();
        let filter = env_filter(value.as_deref());

        // A host application may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .with(filter)
            .try_init();
        tracing::debug!(sql_target = SQL_TARGET, "tracing initialized");
    });
}
