//! sqlmap-storage: the database side of sqlmap.
//!
//! - `connection`: serialized writer + round-robin read pool over SQLite
//! - `executor`: run rendered SQL, producing `ExecResult` or a `ResultSet`
//! - `result_set`: column names + rows of nullable raw bytes
//! - `binding`: result sets into dictionaries or typed records

pub mod binding;
pub mod connection;
pub mod executor;
pub mod result_set;

pub use binding::{
    bind_list, bind_one, FromColumn, Record, RecordDescriptor, RecordList, RecordSlot,
};
pub use connection::{ConnectionPool, DataSource, Driver};
pub use executor::ExecResult;
pub use result_set::ResultSet;

use sqlmap_core::errors::DatabaseError;

/// Map a rusqlite error onto `DatabaseError`, keeping busy distinguishable.
/// A locked database is another connection's lock outlasting the busy
/// timeout, so it reports as busy too.
pub(crate) fn to_db_err(e: rusqlite::Error) -> DatabaseError {
    match e.sqlite_error_code() {
        Some(rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked) => {
            DatabaseError::DbBusy
        }
        _ => DatabaseError::SqliteError {
            message: e.to_string(),
        },
    }
}
