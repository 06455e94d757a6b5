//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the book/store catalog operations.
//! - Validate caller input and emit diagnostic events; never print.
//! - Keep request-facing layers decoupled from storage details.

use crate::model::store::StoreId;
use crate::model::validation::ValidationError;
use crate::repo::RepoError;
use thiserror::Error;

pub mod book_catalog;
pub mod store_catalog;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Service error for catalog use-cases.
///
/// Everything except [`CatalogError::Storage`] describes bad input or a
/// missing target and leaves stored state unchanged.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("store not found: {0}")]
    StoreNotFound(StoreId),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("storage unavailable: {0}")]
    Storage(#[source] RepoError),
}

impl CatalogError {
    /// Whether the failure comes from the storage engine rather than input.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::StoreNotFound(id) => Self::StoreNotFound(id),
            RepoError::Conflict(message) => Self::Conflict(message),
            other => Self::Storage(other),
        }
    }
}
