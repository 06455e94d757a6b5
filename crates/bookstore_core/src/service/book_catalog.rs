//! Book catalog service.
//!
//! # Responsibility
//! - Own the canonical set of books, independent of any store.
//! - Provide case-insensitive lookup, substring search and creation.
//!
//! # Invariants
//! - `create` does not deduplicate; callers that need create-if-absent go
//!   through `StoreCatalog::add`, which resolves and links atomically.
//! - Search results are ordered by title ascending.

use super::{CatalogError, CatalogResult};
use crate::db::Storage;
use crate::model::book::{Book, BookId, NewBook};
use crate::repo::book_repo::{BookRepository, SqliteBookRepository};
use log::{info, warn};

/// Book catalog facade over a repository implementation.
pub struct BookCatalog<R: BookRepository> {
    repo: R,
}

impl<'s> BookCatalog<SqliteBookRepository<'s>> {
    /// Creates a catalog backed by the shared SQLite storage handle.
    pub fn with_storage(storage: &'s Storage) -> Self {
        Self::new(SqliteBookRepository::new(storage))
    }
}

impl<R: BookRepository> BookCatalog<R> {
    /// Creates a catalog using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Case-insensitive substring match against title or author, sorted by
    /// title. An empty term matches every book; the request-facing
    /// `StoreCatalog::search` filters that case out.
    pub fn find_by_title_substring(&self, term: &str) -> CatalogResult<Vec<Book>> {
        Ok(self.repo.search_books(term)?)
    }

    /// Returns the book whose title equals `title` ignoring case.
    pub fn find_exact_title(&self, title: &str) -> CatalogResult<Option<Book>> {
        Ok(self.repo.find_by_title(title)?)
    }

    /// Loads one book by id; `None` when it does not exist.
    pub fn get(&self, id: BookId) -> CatalogResult<Option<Book>> {
        Ok(self.repo.get_book(id)?)
    }

    /// Creates and persists a new book.
    ///
    /// # Errors
    /// - `Validation` when the title is empty.
    /// - `Conflict` when the title or external id is already taken.
    pub fn create(&self, book: NewBook) -> CatalogResult<Book> {
        let book = book.validated().map_err(|err| {
            warn!("event=validation_rejected module=book_catalog op=create error={err}");
            CatalogError::from(err)
        })?;

        let created = self.repo.create_book(&book)?;
        info!(
            "event=book_create module=book_catalog status=ok book_id={}",
            created.id
        );
        Ok(created)
    }

    /// Deletes a book; every membership referencing it goes with it.
    ///
    /// Returns `false` (logged, not an error) when the book does not exist.
    pub fn remove(&self, id: BookId) -> CatalogResult<bool> {
        let removed = self.repo.delete_book(id)?;
        if removed {
            info!("event=book_delete module=book_catalog status=ok book_id={id}");
        } else {
            warn!("event=book_delete module=book_catalog status=not_found book_id={id}");
        }
        Ok(removed)
    }
}
