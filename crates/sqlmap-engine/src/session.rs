//! Sessions: one logical unit of work with a reference-counted transaction.
//!
//! `begin_transaction` while a transaction is open only deepens the nesting;
//! the physical commit happens when the outermost `commit` runs. `rollback`
//! is honoured only while the session is still rollback-eligible, so a stray
//! rollback after the final commit cannot undo finished work.

use std::collections::HashMap;

use rusqlite::Connection;
use serde::Serialize;
use sqlmap_core::errors::{DatabaseError, SessionError};
use sqlmap_core::SqlMapResult;
use sqlmap_storage::{ExecResult, Record, RecordList, ResultSet};

use crate::engine::EngineCore;

/// A unit of work handed out by `Engine::new_session`.
///
/// While a transaction is active every statement runs on the session's
/// dedicated connection; otherwise statements go to the engine's pool.
/// A `Session::default()` was not produced by an engine and fails every
/// operation with `SessionNotInitialized`.
#[derive(Default)]
pub struct Session<'e> {
    core: Option<&'e EngineCore>,
    /// Dedicated connection holding the open transaction.
    tx: Option<Connection>,
    depth: usize,
    rollback_eligible: bool,
}

impl<'e> Session<'e> {
    pub(crate) fn new(core: &'e EngineCore) -> Self {
        Self {
            core: Some(core),
            tx: None,
            depth: 0,
            rollback_eligible: false,
        }
    }

    fn core(&self) -> Result<&'e EngineCore, SessionError> {
        self.core.ok_or(SessionError::NotInitialized)
    }

    /// Begin, or join, the session's transaction.
    pub fn begin_transaction(&mut self) -> SqlMapResult<()> {
        let core = self.core()?;
        if self.tx.is_some() {
            self.depth += 1;
            tracing::trace!(depth = self.depth, "nested begin");
            return Ok(());
        }

        let conn = core.pool().open_dedicated()?;
        conn.execute_batch("BEGIN IMMEDIATE")
            .map_err(|e| DatabaseError::SqliteError {
                message: format!("failed to begin transaction: {e}"),
            })?;
        self.tx = Some(conn);
        self.depth = 1;
        self.rollback_eligible = true;
        tracing::debug!("transaction started");
        Ok(())
    }

    /// Leave one nesting level; the outermost commit is the physical one.
    /// A no-op when no transaction is active.
    pub fn commit(&mut self) -> SqlMapResult<()> {
        self.core()?;
        let Some(conn) = self.tx.as_ref() else {
            return Ok(());
        };
        if self.depth > 1 {
            self.depth -= 1;
            tracing::trace!(depth = self.depth, "nested commit");
            return Ok(());
        }

        conn.execute_batch("COMMIT")
            .map_err(|e| DatabaseError::SqliteError {
                message: format!("failed to commit: {e}"),
            })?;
        self.tx = None;
        self.depth = 0;
        self.rollback_eligible = false;
        tracing::debug!("transaction committed");
        Ok(())
    }

    /// Roll back the whole transaction, whatever the nesting depth, if the
    /// session is still rollback-eligible. Otherwise a no-op.
    pub fn rollback(&mut self) -> SqlMapResult<()> {
        self.core()?;
        if !self.rollback_eligible {
            return Ok(());
        }
        let Some(conn) = self.tx.take() else {
            return Ok(());
        };
        self.depth = 0;
        self.rollback_eligible = false;
        conn.execute_batch("ROLLBACK")
            .map_err(|e| DatabaseError::SqliteError {
                message: format!("failed to roll back: {e}"),
            })?;
        tracing::debug!("transaction rolled back");
        Ok(())
    }

    pub fn in_transaction(&self) -> bool {
        self.tx.is_some()
    }

    /// Outstanding `begin_transaction` calls; 0 when idle.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn execute<P: Serialize + ?Sized>(&mut self, key: &str, params: &P) -> SqlMapResult<ExecResult> {
        self.core()?.execute_on(self.tx.as_ref(), key, params)
    }

    pub fn query<P: Serialize + ?Sized>(
        &mut self,
        key: &str,
        params: &P,
    ) -> SqlMapResult<Vec<HashMap<String, String>>> {
        Ok(self.query_raw(key, params)?.to_dictionaries())
    }

    pub fn query_raw<P: Serialize + ?Sized>(&mut self, key: &str, params: &P) -> SqlMapResult<ResultSet> {
        self.core()?.query_on(self.tx.as_ref(), key, params)
    }

    pub fn select<L, P>(&mut self, dest: &mut L, key: &str, params: &P) -> SqlMapResult<()>
    where
        L: RecordList,
        P: Serialize + ?Sized,
    {
        self.core()?.select_on(self.tx.as_ref(), dest, key, params)
    }

    pub fn select_one<T, P>(&mut self, dest: &mut T, key: &str, params: &P) -> SqlMapResult<()>
    where
        T: Record,
        P: Serialize + ?Sized,
    {
        self.core()?.select_one_on(self.tx.as_ref(), dest, key, params)
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        if let Some(conn) = self.tx.take() {
            tracing::warn!(depth = self.depth, "session dropped with an open transaction; rolling back");
            if let Err(e) = conn.execute_batch("ROLLBACK") {
                tracing::warn!(error = %e, "rollback on drop failed");
            }
        }
    }
}

impl std::fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("initialized", &self.core.is_some())
            .field("in_transaction", &self.tx.is_some())
            .field("depth", &self.depth)
            .field("rollback_eligible", &self.rollback_eligible)
            .finish()
    }
}
