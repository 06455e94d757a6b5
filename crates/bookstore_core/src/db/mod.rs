//! SQLite storage bootstrap, schema migrations and the shared storage handle.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the bookstore core.
//! - Apply schema migrations in deterministic order.
//! - Own the process-wide [`Storage`] handle passed into catalog services.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write catalog data before migrations succeed.
//! - Every connection handed out has `foreign_keys=ON`, so membership cascades
//!   are enforced by the engine.

use thiserror::Error;

pub mod migrations;
mod open;
mod storage;

pub use open::{open_db, open_db_in_memory};
pub use storage::{Storage, StorageMode};

pub type DbResult<T> = Result<T, DbError>;

/// Transport-level storage failure.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}
