//! Store catalog service.
//!
//! # Responsibility
//! - Create stores and edit their name/address.
//! - Add, remove, list and replace the books a store holds.
//! - Route catalog-wide search to the book catalog.
//!
//! # Invariants
//! - A book appears at most once per store; repeated adds are no-ops.
//! - `add` resolves-or-creates the book and links it in one transaction, so
//!   concurrent adds of an unseen title create exactly one book.
//! - `remove` only considers books the store itself holds.
//! - A `Store` value is updated in memory only after storage accepted the
//!   change.

use super::book_catalog::BookCatalog;
use super::{CatalogError, CatalogResult};
use crate::db::Storage;
use crate::model::book::{Book, NewBook};
use crate::model::store::{Store, StoreField, StoreId};
use crate::model::validation::{require_text, ValidationError};
use crate::repo::book_repo::{BookRepository, SqliteBookRepository};
use crate::repo::store_repo::{SqliteStoreRepository, StoreRepository};
use log::{info, warn};

/// Result of [`StoreCatalog::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new membership was recorded.
    Added { book: Book, book_created: bool },
    /// The store already held this book; nothing changed.
    AlreadyPresent(Book),
}

impl AddOutcome {
    pub fn book(&self) -> &Book {
        match self {
            Self::Added { book, .. } | Self::AlreadyPresent(book) => book,
        }
    }
}

/// Result of [`StoreCatalog::remove`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(Book),
    /// The store holds no book with that title; nothing changed.
    NotInStore,
}

/// Store catalog over the SQLite repositories of one [`Storage`].
pub type SqliteStoreCatalog<'s> = StoreCatalog<SqliteStoreRepository<'s>, SqliteBookRepository<'s>>;

/// Store catalog facade over store and book repositories.
pub struct StoreCatalog<S: StoreRepository, B: BookRepository> {
    stores: S,
    books: BookCatalog<B>,
}

impl<'s> SqliteStoreCatalog<'s> {
    /// Creates a catalog backed by the shared SQLite storage handle.
    pub fn with_storage(storage: &'s Storage) -> Self {
        Self::new(
            SqliteStoreRepository::new(storage),
            BookCatalog::with_storage(storage),
        )
    }
}

impl<S: StoreRepository, B: BookRepository> StoreCatalog<S, B> {
    /// Creates a catalog over the provided repository implementations.
    pub fn new(stores: S, books: BookCatalog<B>) -> Self {
        Self { stores, books }
    }

    /// Book catalog sharing this catalog's storage.
    pub fn books(&self) -> &BookCatalog<B> {
        &self.books
    }

    /// Creates and persists a store.
    ///
    /// # Errors
    /// - `Validation` (logged) when `name` or `address` is empty; nothing is
    ///   written.
    pub fn create(&self, name: &str, address: &str) -> CatalogResult<Store> {
        StoreField::Name
            .validate(name)
            .and_then(|()| StoreField::Address.validate(address))
            .map_err(|err| rejected("create", err))?;

        let store = self.stores.create_store(name, address)?;
        info!(
            "event=store_create module=store_catalog status=ok store_id={}",
            store.id
        );
        Ok(store)
    }

    /// Loads one store by id; `None` when it does not exist.
    pub fn get(&self, id: StoreId) -> CatalogResult<Option<Store>> {
        Ok(self.stores.get_store(id)?)
    }

    /// Oldest store carrying exactly this name.
    pub fn find_by_name(&self, name: &str) -> CatalogResult<Option<Store>> {
        Ok(self.stores.find_store_by_name(name)?)
    }

    /// Renames the store in storage and then in `store`.
    ///
    /// On any error `store` keeps its previous name.
    pub fn rename(&self, store: &mut Store, name: &str) -> CatalogResult<()> {
        self.update_field(store.id, StoreField::Name, name)?;
        store.name = name.to_string();
        Ok(())
    }

    /// Changes the store address in storage and then in `store`.
    ///
    /// On any error `store` keeps its previous address.
    pub fn set_address(&self, store: &mut Store, address: &str) -> CatalogResult<()> {
        self.update_field(store.id, StoreField::Address, address)?;
        store.address = address.to_string();
        Ok(())
    }

    /// Deletes a store. Its memberships cascade; books are kept.
    pub fn delete(&self, id: StoreId) -> CatalogResult<bool> {
        let removed = self.stores.delete_store(id)?;
        if removed {
            info!("event=store_delete module=store_catalog status=ok store_id={id}");
        } else {
            warn!("event=store_delete module=store_catalog status=not_found store_id={id}");
        }
        Ok(removed)
    }

    /// Greeting for the store's landing page.
    pub fn welcome(&self, id: StoreId) -> CatalogResult<String> {
        self.get(id)?
            .map(|store| store.welcome())
            .ok_or(CatalogError::StoreNotFound(id))
    }

    /// Books currently held by the store, sorted by title.
    pub fn list_books(&self, id: StoreId) -> CatalogResult<Vec<Book>> {
        Ok(self.stores.list_store_books(id)?)
    }

    /// Adds a book to the store, creating the catalog entry on first use.
    ///
    /// Adding a title the store already holds (in any letter case) is a
    /// logged no-op reported as [`AddOutcome::AlreadyPresent`].
    pub fn add(&self, id: StoreId, book: NewBook) -> CatalogResult<AddOutcome> {
        let book = book.validated().map_err(|err| rejected("add", err))?;

        let link = self.stores.link_book(id, &book)?;
        if link.book_created {
            info!(
                "event=book_create module=store_catalog status=ok book_id={}",
                link.book.id
            );
        }

        if link.linked {
            info!(
                "event=book_add module=store_catalog status=ok store_id={id} book_id={}",
                link.book.id
            );
            Ok(AddOutcome::Added {
                book: link.book,
                book_created: link.book_created,
            })
        } else {
            warn!(
                "event=book_add module=store_catalog status=already_present store_id={id} book_id={}",
                link.book.id
            );
            Ok(AddOutcome::AlreadyPresent(link.book))
        }
    }

    /// Removes the store's book whose title matches ignoring case.
    ///
    /// Books held only by other stores are never touched; a miss is a logged
    /// no-op reported as [`RemoveOutcome::NotInStore`].
    pub fn remove(&self, id: StoreId, title: &str) -> CatalogResult<RemoveOutcome> {
        require_text("title", title).map_err(|err| rejected("remove", err))?;

        match self.stores.unlink_title(id, title)? {
            Some(book) => {
                info!(
                    "event=book_remove module=store_catalog status=ok store_id={id} book_id={}",
                    book.id
                );
                Ok(RemoveOutcome::Removed(book))
            }
            None => {
                warn!("event=book_remove module=store_catalog status=not_found store_id={id}");
                Ok(RemoveOutcome::NotInStore)
            }
        }
    }

    /// Replaces the store's whole book list with `books`, atomically.
    ///
    /// Titles repeated in the input collapse into one membership. Returns the
    /// resulting listing.
    pub fn replace_books(&self, id: StoreId, books: Vec<NewBook>) -> CatalogResult<Vec<Book>> {
        let books = books
            .into_iter()
            .map(NewBook::validated)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| rejected("replace_books", err))?;

        let links = self.stores.replace_books(id, &books)?;
        info!(
            "event=store_update module=store_catalog status=ok store_id={id} field=books count={}",
            links.iter().filter(|link| link.linked).count()
        );
        self.list_books(id)
    }

    /// Catalog-wide search by title or author substring.
    ///
    /// A missing or blank term yields no results rather than the whole
    /// catalog.
    pub fn search(&self, term: Option<&str>) -> CatalogResult<Vec<Book>> {
        match term.map(str::trim) {
            Some(term) if !term.is_empty() => self.books.find_by_title_substring(term),
            _ => Ok(Vec::new()),
        }
    }

    fn update_field(&self, id: StoreId, field: StoreField, value: &str) -> CatalogResult<()> {
        field
            .validate(value)
            .map_err(|err| rejected("update", err))?;

        self.stores.update_store_field(id, field, value)?;
        info!(
            "event=store_update module=store_catalog status=ok store_id={id} field={}",
            field.column()
        );
        Ok(())
    }
}

fn rejected(op: &str, err: ValidationError) -> CatalogError {
    warn!("event=validation_rejected module=store_catalog op={op} error={err}");
    CatalogError::Validation(err)
}
