//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for books and stores.
//! - Isolate SQL details from catalog orchestration.
//!
//! # Invariants
//! - Multi-statement writes run inside one `IMMEDIATE` transaction, so the
//!   read-then-write steps they contain are serialized against other writers.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::store::StoreId;
use rusqlite::ffi;
use thiserror::Error;

pub mod book_repo;
pub mod store_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for catalog persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("store not found: {0}")]
    StoreNotFound(StoreId),
    /// A uniqueness constraint rejected the write.
    #[error("conflicting write: {0}")]
    Conflict(String),
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match &value {
            rusqlite::Error::SqliteFailure(err, message)
                if err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                    || err.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
            {
                Self::Conflict(message.clone().unwrap_or_else(|| err.to_string()))
            }
            _ => Self::Db(DbError::Sqlite(value)),
        }
    }
}
