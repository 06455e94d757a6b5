//! Core domain logic for the bookstore catalog.
//! This crate is the single source of truth for catalog invariants: one book
//! record per case-insensitive title, at most one membership per store/book
//! pair, and storage as the only authority over catalog state.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{DbError, Storage, StorageMode};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::book::{identity_key, Book, BookId, NewBook};
pub use model::store::{Store, StoreField, StoreId};
pub use model::validation::ValidationError;
pub use repo::book_repo::{BookRepository, SqliteBookRepository};
pub use repo::store_repo::{BookLink, SqliteStoreRepository, StoreRepository};
pub use repo::{RepoError, RepoResult};
pub use service::book_catalog::BookCatalog;
pub use service::store_catalog::{AddOutcome, RemoveOutcome, SqliteStoreCatalog, StoreCatalog};
pub use service::{CatalogError, CatalogResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
