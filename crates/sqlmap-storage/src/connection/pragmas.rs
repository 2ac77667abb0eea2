//! PRAGMA configuration applied to every SQLite connection.
//!
//! Writers: WAL, NORMAL sync, foreign keys, busy timeout.
//! Readers: query_only plus the same busy timeout.

use rusqlite::Connection;
use sqlmap_core::errors::DatabaseError;

/// Apply write-side pragmas.
pub fn apply_pragmas(conn: &Connection, busy_timeout_ms: u64) -> Result<(), DatabaseError> {
    conn.execute_batch(&format!(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = {busy_timeout_ms};
        PRAGMA temp_store = MEMORY;
        "
    ))
    .map_err(|e| DatabaseError::SqliteError {
        message: format!("failed to apply pragmas: {e}"),
    })
}

/// Apply read-side pragmas. Readers never write.
pub fn apply_read_pragmas(conn: &Connection, busy_timeout_ms: u64) -> Result<(), DatabaseError> {
    conn.execute_batch(&format!(
        "
        PRAGMA query_only = ON;
        PRAGMA busy_timeout = {busy_timeout_ms};
        PRAGMA temp_store = MEMORY;
        "
    ))
    .map_err(|e| DatabaseError::SqliteError {
        message: format!("failed to apply read pragmas: {e}"),
    })
}

/// Whether the connection is in WAL mode.
pub fn verify_wal_mode(conn: &Connection) -> Result<bool, DatabaseError> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| DatabaseError::SqliteError {
            message: e.to_string(),
        })?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
