//! Connection management: write-serialized + read-pooled.

pub mod pool;
pub mod pragmas;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags};
use sqlmap_core::config::DatabaseConfig;
use sqlmap_core::errors::DatabaseError;

use self::pool::{ReadPool, DEFAULT_POOL_SIZE};
use self::pragmas::apply_pragmas;
use crate::to_db_err;

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Gives every in-memory database in the process its own shared-cache name.
static MEMORY_DB_SEQ: AtomicUsize = AtomicUsize::new(0);

/// Supported database drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    Sqlite,
}

impl Driver {
    /// Resolve a driver name; `sqlite` and `sqlite3` are accepted.
    pub fn from_name(name: &str) -> Result<Self, DatabaseError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            _ => Err(DatabaseError::UnsupportedDriver {
                name: name.to_string(),
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
        }
    }
}

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    /// An in-memory database on the `memdb` VFS. Every connection opened on
    /// the same URI sees the same data while at least one stays open, and
    /// locking is database-level, so the busy timeout applies.
    Memory { uri: String },
}

impl DataSource {
    /// `":memory:"` or an empty string yields a fresh in-memory database,
    /// anything else is a file path.
    pub fn parse(data_source: &str) -> Self {
        let trimmed = data_source.trim();
        if trimmed.is_empty() || trimmed == ":memory:" {
            Self::memory()
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }

    /// A new, uniquely named in-memory database.
    pub fn memory() -> Self {
        let seq = MEMORY_DB_SEQ.fetch_add(1, Ordering::Relaxed);
        Self::Memory {
            uri: format!(
                "file:/sqlmap-mem-{}-{seq}?vfs=memdb",
                std::process::id()
            ),
        }
    }

    /// Open a read-write connection.
    fn open_read_write(&self) -> Result<Connection, DatabaseError> {
        match self {
            Self::File(path) => Connection::open(path),
            Self::Memory { uri } => Connection::open_with_flags(
                uri,
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            ),
        }
        .map_err(to_db_err)
    }
}

/// The single write connection plus the read connection pool.
pub struct ConnectionPool {
    driver: Driver,
    source: DataSource,
    writer: Mutex<Connection>,
    readers: ReadPool,
    busy_timeout_ms: u64,
}

impl ConnectionPool {
    /// Open the database described by `config`.
    pub fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let driver = Driver::from_name(config.effective_driver())?;
        let source = DataSource::parse(config.effective_data_source());
        Self::open_source(
            driver,
            source,
            config.effective_read_pool_size(),
            config.effective_busy_timeout_ms(),
        )
    }

    /// Open a database file with default pool settings.
    pub fn open_path(path: &Path) -> Result<Self, DatabaseError> {
        Self::open_source(
            Driver::Sqlite,
            DataSource::File(path.to_path_buf()),
            DEFAULT_POOL_SIZE,
            DEFAULT_BUSY_TIMEOUT_MS,
        )
    }

    /// Open a fresh in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Self::open_source(
            Driver::Sqlite,
            DataSource::memory(),
            DEFAULT_POOL_SIZE,
            DEFAULT_BUSY_TIMEOUT_MS,
        )
    }

    fn open_source(
        driver: Driver,
        source: DataSource,
        read_pool_size: usize,
        busy_timeout_ms: u64,
    ) -> Result<Self, DatabaseError> {
        // The writer goes first: it creates the database the readers attach to.
        let writer = source.open_read_write()?;
        apply_pragmas(&writer, busy_timeout_ms)?;
        let readers = ReadPool::open(&source, read_pool_size, busy_timeout_ms)?;

        tracing::info!(
            driver = driver.name(),
            source = ?source,
            readers = readers.size(),
            "database opened"
        );

        Ok(Self {
            driver,
            source,
            writer: Mutex::new(writer),
            readers,
            busy_timeout_ms,
        })
    }

    /// Execute a write operation with the serialized writer connection.
    pub fn with_writer<F, T>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&Connection) -> Result<T, DatabaseError>,
    {
        let guard = self
            .writer
            .lock()
            .map_err(|_| DatabaseError::LockPoisoned { what: "writer" })?;
        f(&guard)
    }

    /// Execute a read operation with a pooled read connection.
    pub fn with_reader<F, T>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&Connection) -> Result<T, DatabaseError>,
    {
        self.readers.with_conn(f)
    }

    /// Open a dedicated read-write connection to the same database, with
    /// pragmas applied. Sessions run their transactions on one of these.
    pub fn open_dedicated(&self) -> Result<Connection, DatabaseError> {
        let conn = self.source.open_read_write()?;
        apply_pragmas(&conn, self.busy_timeout_ms)?;
        Ok(conn)
    }

    pub fn driver(&self) -> Driver {
        self.driver
    }

    pub fn data_source(&self) -> &DataSource {
        &self.source
    }

    /// The database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            DataSource::File(path) => Some(path),
            DataSource::Memory { .. } => None,
        }
    }

    /// Number of read connections.
    pub fn reader_count(&self) -> usize {
        self.readers.size()
    }
}

impl std::fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("driver", &self.driver)
            .field("source", &self.source)
            .field("readers", &self.readers.size())
            .finish()
    }
}
