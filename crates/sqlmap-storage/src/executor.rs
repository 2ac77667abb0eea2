//! Statement execution over a rusqlite connection.
//!
//! Rendered SQL carries its values inline, so statements are executed
//! without bound parameters.

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use sqlmap_core::errors::DatabaseError;

use crate::result_set::{Cell, ResultSet};
use crate::to_db_err;

/// Outcome of a non-query statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    /// Rowid of the most recent successful INSERT on the connection.
    pub last_insert_id: i64,
}

/// Run a statement that returns no rows.
pub fn execute(conn: &Connection, sql: &str) -> Result<ExecResult, DatabaseError> {
    let mut stmt = conn.prepare_cached(sql).map_err(to_db_err)?;
    let rows_affected = stmt.execute([]).map_err(to_db_err)?;
    Ok(ExecResult {
        rows_affected: rows_affected as u64,
        last_insert_id: conn.last_insert_rowid(),
    })
}

/// Run a query and collect every row as raw bytes.
pub fn query(conn: &Connection, sql: &str) -> Result<ResultSet, DatabaseError> {
    let mut stmt = conn.prepare_cached(sql).map_err(to_db_err)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();

    let mut rows = stmt.query([]).map_err(to_db_err)?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(to_db_err)? {
        let mut cells = Vec::with_capacity(width);
        for idx in 0..width {
            cells.push(raw_cell(row.get_ref(idx).map_err(to_db_err)?));
        }
        out.push(cells);
    }
    Ok(ResultSet::new(columns, out))
}

/// Numbers become their decimal text, text and blobs their bytes.
fn raw_cell(value: ValueRef<'_>) -> Cell {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string().into_bytes()),
        ValueRef::Real(f) => Some(f.to_string().into_bytes()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => Some(bytes.to_vec()),
    }
}
