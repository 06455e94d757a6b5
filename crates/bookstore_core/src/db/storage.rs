//! Process-wide storage handle.
//!
//! # Responsibility
//! - Open the database once at startup and keep it for the process lifetime.
//! - Lend migrated connections to repositories for one unit of work.
//! - Provide the readiness probe used by health checks.
//!
//! # Invariants
//! - A lent connection is used by exactly one caller at a time.
//! - File databases pool idle connections; in-memory databases share one
//!   connection because a private in-memory database cannot be reopened.

use super::open::{open_db, open_db_in_memory};
use super::{DbError, DbResult};
use log::{debug, warn};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

const MAX_IDLE_CONNECTIONS: usize = 8;

/// Where a [`Storage`] keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageMode {
    File(PathBuf),
    Memory,
}

enum Backend {
    File {
        path: PathBuf,
        idle: Mutex<Vec<Connection>>,
    },
    Memory(Mutex<Connection>),
}

/// Shared, thread-safe handle over the catalog database.
///
/// Construct once and pass by reference (or `Arc`) into repositories.
/// Dropping the handle closes every pooled connection.
pub struct Storage {
    backend: Backend,
}

impl Storage {
    /// Opens (creating if needed) a file database and applies migrations.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref().to_path_buf();
        let first = open_db(&path)?;
        Ok(Self {
            backend: Backend::File {
                path,
                idle: Mutex::new(vec![first]),
            },
        })
    }

    /// Opens a private in-memory database, mostly for tests and demos.
    pub fn in_memory() -> DbResult<Self> {
        let conn = open_db_in_memory()?;
        Ok(Self {
            backend: Backend::Memory(Mutex::new(conn)),
        })
    }

    /// Reports whether this handle is file-backed or in-memory.
    pub fn mode(&self) -> StorageMode {
        match &self.backend {
            Backend::File { path, .. } => StorageMode::File(path.clone()),
            Backend::Memory(_) => StorageMode::Memory,
        }
    }

    /// Runs `f` with exclusive use of one migrated connection.
    ///
    /// The error type only needs to absorb [`DbError`], so repositories can
    /// run their own error type through the closure.
    pub fn with_conn<T, E>(&self, f: impl FnOnce(&mut Connection) -> Result<T, E>) -> Result<T, E>
    where
        E: From<DbError>,
    {
        match &self.backend {
            Backend::Memory(conn) => {
                let mut guard = lock(conn);
                f(&mut guard)
            }
            Backend::File { path, idle } => {
                let pooled = lock(idle).pop();
                let mut conn = match pooled {
                    Some(conn) => conn,
                    None => {
                        debug!("event=storage_connect module=db status=start");
                        open_db(path)?
                    }
                };
                let result = f(&mut conn);
                let mut idle = lock(idle);
                if idle.len() < MAX_IDLE_CONNECTIONS {
                    idle.push(conn);
                }
                result
            }
        }
    }

    /// Readiness probe: succeeds when the database answers a trivial query.
    pub fn ping(&self) -> DbResult<()> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1;", [], |row| row.get::<_, i64>(0))
                .map(|_| ())
                .map_err(|err| {
                    warn!("event=storage_ping module=db status=error error={err}");
                    DbError::from(err)
                })
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic inside a unit of work leaves the connection usable; SQLite rolls
    // back any transaction the dropped `Transaction` guard left open.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
