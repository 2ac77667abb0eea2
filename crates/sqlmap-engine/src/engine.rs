//! Engine: owns the database handle, the statement registry and the
//! template cache, and exposes the call surface.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use rusqlite::Connection;
use serde::Serialize;
use serde_json::Value;
use sqlmap_core::errors::{SqlMapErrorCode, TemplateError};
use sqlmap_core::tracing::SQL_TARGET;
use sqlmap_core::{SqlMapConfig, SqlMapError, SqlMapResult};
use sqlmap_storage::executor;
use sqlmap_storage::{bind_list, bind_one, ConnectionPool, ExecResult, Record, RecordList, ResultSet};
use sqlmap_template::{backend_by_name, TemplateBackend, TemplateCache};

use crate::loader::{self, LoadSummary};
use crate::registry::StatementRegistry;
use crate::session::Session;

/// State that exists only once `init` has succeeded.
pub(crate) struct EngineCore {
    config: SqlMapConfig,
    pool: ConnectionPool,
    registry: StatementRegistry,
    templates: TemplateCache,
}

impl EngineCore {
    pub(crate) fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Look up, render and normalize the statement `key`.
    pub(crate) fn render<P: Serialize + ?Sized>(&self, key: &str, params: &P) -> SqlMapResult<String> {
        let sql = self.render_text(key, params).map_err(|e| logged(key, e))?;
        if self.config.logging.effective_log_sql() {
            tracing::debug!(target: SQL_TARGET, key, sql = %sql, "rendered statement");
        }
        Ok(sql)
    }

    fn render_text<P: Serialize + ?Sized>(&self, key: &str, params: &P) -> SqlMapResult<String> {
        let text = self.registry.lookup(key)?;
        let params = to_params(key, params)?;
        Ok(self.templates.render(key, &text, &params)?)
    }

    /// Run on `conn` when given, otherwise on the shared writer.
    pub(crate) fn execute_on<P: Serialize + ?Sized>(
        &self,
        conn: Option<&Connection>,
        key: &str,
        params: &P,
    ) -> SqlMapResult<ExecResult> {
        let sql = self.render(key, params)?;
        let result = match conn {
            Some(conn) => executor::execute(conn, &sql),
            None => self.pool.with_writer(|conn| executor::execute(conn, &sql)),
        };
        result.map_err(|e| logged(key, e.into()))
    }

    /// Run on `conn` when given, otherwise on a pooled reader.
    pub(crate) fn query_on<P: Serialize + ?Sized>(
        &self,
        conn: Option<&Connection>,
        key: &str,
        params: &P,
    ) -> SqlMapResult<ResultSet> {
        let sql = self.render(key, params)?;
        let result = match conn {
            Some(conn) => executor::query(conn, &sql),
            None => self.pool.with_reader(|conn| executor::query(conn, &sql)),
        };
        result.map_err(|e| logged(key, e.into()))
    }

    pub(crate) fn select_on<L, P>(
        &self,
        conn: Option<&Connection>,
        dest: &mut L,
        key: &str,
        params: &P,
    ) -> SqlMapResult<()>
    where
        L: RecordList,
        P: Serialize + ?Sized,
    {
        let rows = self.query_on(conn, key, params)?;
        bind_list(dest, &rows)?;
        Ok(())
    }

    pub(crate) fn select_one_on<T, P>(
        &self,
        conn: Option<&Connection>,
        dest: &mut T,
        key: &str,
        params: &P,
    ) -> SqlMapResult<()>
    where
        T: Record,
        P: Serialize + ?Sized,
    {
        let rows = self.query_on(conn, key, params)?;
        bind_one(dest, &rows)?;
        Ok(())
    }
}

fn to_params<P: Serialize + ?Sized>(key: &str, params: &P) -> Result<Value, TemplateError> {
    serde_json::to_value(params).map_err(|e| TemplateError::Render {
        key: key.to_string(),
        message: format!("parameters cannot be converted: {e}"),
    })
}

fn logged(key: &str, err: SqlMapError) -> SqlMapError {
    tracing::warn!(key, code = err.error_code(), error = %err, "statement failed");
    err
}

/// The sqlmap entry point.
///
/// Created uninitialized; every call other than `init`/`init_with_config`
/// fails with `EngineNotInitialized` until one of them succeeds. Once
/// initialized the engine is `Send + Sync` and may be shared across threads.
#[derive(Default)]
pub struct Engine {
    core: Option<EngineCore>,
    backend: Option<Arc<dyn TemplateBackend>>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `backend` instead of the one named in configuration.
    pub fn with_template_backend(mut self, backend: Arc<dyn TemplateBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Create and initialize in one step.
    pub fn open(driver: &str, data_source: &str, statement_dir: impl AsRef<Path>) -> SqlMapResult<Self> {
        let mut engine = Self::new();
        engine.init(driver, data_source, statement_dir)?;
        Ok(engine)
    }

    /// Open the database and load every statement document under
    /// `statement_dir` into a fresh registry.
    pub fn init(
        &mut self,
        driver: &str,
        data_source: &str,
        statement_dir: impl AsRef<Path>,
    ) -> SqlMapResult<()> {
        let dir = statement_dir.as_ref().to_string_lossy();
        self.init_with_config(SqlMapConfig::for_source(driver, data_source, &dir))
    }

    /// Initialize from a full configuration. Without `statements.dir` the
    /// registry starts empty. A failed init leaves the engine as it was.
    pub fn init_with_config(&mut self, config: SqlMapConfig) -> SqlMapResult<()> {
        match self.build_core(config) {
            Ok((core, summary)) => {
                tracing::info!(
                    driver = core.pool.driver().name(),
                    backend = core.templates.backend_name(),
                    statements = summary.statements,
                    "engine initialized"
                );
                self.core = Some(core);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(code = err.error_code(), error = %err, "engine init failed");
                Err(err)
            }
        }
    }

    fn build_core(&self, config: SqlMapConfig) -> SqlMapResult<(EngineCore, LoadSummary)> {
        SqlMapConfig::validate(&config)?;

        let backend = match &self.backend {
            Some(backend) => Arc::clone(backend),
            None => backend_by_name(config.template.effective_backend())?,
        };
        let pool = ConnectionPool::open(&config.database)?;
        let registry = StatementRegistry::new();
        let summary = match config.statements.dir.as_deref() {
            Some(dir) => loader::load_dir(&registry, Path::new(dir), &config.statements)?,
            None => LoadSummary::default(),
        };

        Ok((
            EngineCore {
                config,
                pool,
                registry,
                templates: TemplateCache::new(backend),
            },
            summary,
        ))
    }

    pub fn is_initialized(&self) -> bool {
        self.core.is_some()
    }

    fn core(&self) -> SqlMapResult<&EngineCore> {
        self.core.as_ref().ok_or(SqlMapError::EngineNotInitialized)
    }

    /// Render and run a statement that returns no rows.
    pub fn execute<P: Serialize + ?Sized>(&self, key: &str, params: &P) -> SqlMapResult<ExecResult> {
        self.core()?.execute_on(None, key, params)
    }

    /// Render and run a query; one column→string map per row, NULL as `""`.
    pub fn query<P: Serialize + ?Sized>(
        &self,
        key: &str,
        params: &P,
    ) -> SqlMapResult<Vec<HashMap<String, String>>> {
        Ok(self.core()?.query_on(None, key, params)?.to_dictionaries())
    }

    /// Render and run a query, returning the raw result set.
    pub fn query_raw<P: Serialize + ?Sized>(&self, key: &str, params: &P) -> SqlMapResult<ResultSet> {
        self.core()?.query_on(None, key, params)
    }

    /// Append one record per row to `dest`.
    pub fn select<L, P>(&self, dest: &mut L, key: &str, params: &P) -> SqlMapResult<()>
    where
        L: RecordList,
        P: Serialize + ?Sized,
    {
        self.core()?.select_on(None, dest, key, params)
    }

    /// Bind exactly one row into `dest`.
    pub fn select_one<T, P>(&self, dest: &mut T, key: &str, params: &P) -> SqlMapResult<()>
    where
        T: Record,
        P: Serialize + ?Sized,
    {
        self.core()?.select_one_on(None, dest, key, params)
    }

    /// The normalized SQL `key` renders to, without running it.
    pub fn render<P: Serialize + ?Sized>(&self, key: &str, params: &P) -> SqlMapResult<String> {
        self.core()?.render(key, params)
    }

    /// Register a statement after init. Existing keys are never replaced.
    pub fn register_statement(&self, key: &str, text: &str) -> SqlMapResult<()> {
        Ok(self.core()?.registry.register(key, text)?)
    }

    /// A fresh session for one unit of work.
    pub fn new_session(&self) -> SqlMapResult<Session<'_>> {
        Ok(Session::new(self.core()?))
    }

    pub fn pool(&self) -> SqlMapResult<&ConnectionPool> {
        Ok(&self.core()?.pool)
    }

    pub fn registry(&self) -> SqlMapResult<&StatementRegistry> {
        Ok(&self.core()?.registry)
    }

    pub fn config(&self) -> SqlMapResult<&SqlMapConfig> {
        Ok(&self.core()?.config)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("Engine");
        out.field("initialized", &self.is_initialized());
        if let Some(core) = &self.core {
            out.field("pool", &core.pool)
                .field("statements", &core.registry.len())
                .field("templates", &core.templates);
        }
        out.finish()
    }
}
