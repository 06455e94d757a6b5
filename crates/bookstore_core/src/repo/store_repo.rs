//! Store/membership repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist store records and their editable text fields.
//! - Own the store-to-book membership table, including the atomic
//!   resolve-or-create-then-link write used by `add`.
//!
//! # Invariants
//! - A `(store_id, book_id)` pair is stored at most once.
//! - Link, unlink and replace run in one `IMMEDIATE` transaction each.
//! - Membership rows never outlive their store or book (`ON DELETE CASCADE`).

use super::book_repo::{parse_book_row, resolve_or_create_book, BOOK_SELECT_SQL};
use super::{RepoError, RepoResult};
use crate::db::Storage;
use crate::model::book::{identity_key, Book, NewBook};
use crate::model::store::{Store, StoreField, StoreId};
use rusqlite::{params, Connection, Row, TransactionBehavior};

const STORE_SELECT_SQL: &str = "SELECT id, name, address, created_at FROM stores";

/// Result of linking one title to a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookLink {
    pub book: Book,
    /// The book record was created by this write.
    pub book_created: bool,
    /// A new membership row was inserted; `false` means it already existed.
    pub linked: bool,
}

/// Repository interface for stores and their book memberships.
pub trait StoreRepository {
    fn create_store(&self, name: &str, address: &str) -> RepoResult<Store>;
    fn get_store(&self, id: StoreId) -> RepoResult<Option<Store>>;
    /// Oldest store with exactly this name.
    fn find_store_by_name(&self, name: &str) -> RepoResult<Option<Store>>;
    fn update_store_field(&self, id: StoreId, field: StoreField, value: &str) -> RepoResult<()>;
    /// Deletes a store and its memberships. Books are kept.
    fn delete_store(&self, id: StoreId) -> RepoResult<bool>;
    /// Books currently held by the store, ordered by title.
    fn list_store_books(&self, id: StoreId) -> RepoResult<Vec<Book>>;
    /// Resolves (or creates) the book and links it to the store atomically.
    fn link_book(&self, id: StoreId, book: &NewBook) -> RepoResult<BookLink>;
    /// Removes the membership for the store's own book with this title.
    /// Returns the unlinked book, or `None` when the store does not hold it.
    fn unlink_title(&self, id: StoreId, title: &str) -> RepoResult<Option<Book>>;
    /// Replaces the store's whole book set in one transaction.
    fn replace_books(&self, id: StoreId, books: &[NewBook]) -> RepoResult<Vec<BookLink>>;
}

/// SQLite-backed store repository.
pub struct SqliteStoreRepository<'s> {
    storage: &'s Storage,
}

impl<'s> SqliteStoreRepository<'s> {
    pub fn new(storage: &'s Storage) -> Self {
        Self { storage }
    }
}

impl StoreRepository for SqliteStoreRepository<'_> {
    fn create_store(&self, name: &str, address: &str) -> RepoResult<Store> {
        self.storage.with_conn(|conn| {
            conn.execute(
                "INSERT INTO stores (name, address) VALUES (?1, ?2);",
                params![name, address],
            )?;
            let id = conn.last_insert_rowid();
            select_store(conn, id)?.ok_or_else(|| {
                RepoError::InvalidData(format!("store {id} missing in read-back"))
            })
        })
    }

    fn get_store(&self, id: StoreId) -> RepoResult<Option<Store>> {
        self.storage.with_conn(|conn| select_store(conn, id))
    }

    fn find_store_by_name(&self, name: &str) -> RepoResult<Option<Store>> {
        self.storage.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("{STORE_SELECT_SQL} WHERE name = ?1 ORDER BY id LIMIT 1;"))?;
            let mut rows = stmt.query([name])?;
            if let Some(row) = rows.next()? {
                return Ok(Some(parse_store_row(row)?));
            }
            Ok(None)
        })
    }

    fn update_store_field(&self, id: StoreId, field: StoreField, value: &str) -> RepoResult<()> {
        self.storage.with_conn(|conn| {
            let changed = conn.execute(
                &format!("UPDATE stores SET {} = ?1 WHERE id = ?2;", field.column()),
                params![value, id],
            )?;
            if changed == 0 {
                return Err(RepoError::StoreNotFound(id));
            }
            Ok(())
        })
    }

    fn delete_store(&self, id: StoreId) -> RepoResult<bool> {
        self.storage.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM stores WHERE id = ?1;", [id])?;
            Ok(changed > 0)
        })
    }

    fn list_store_books(&self, id: StoreId) -> RepoResult<Vec<Book>> {
        self.storage.with_conn(|conn| {
            ensure_store_exists(conn, id)?;
            let mut stmt = conn.prepare(&format!(
                "{BOOK_SELECT_SQL}
                 INNER JOIN memberships m ON m.book_id = books.id
                 WHERE m.store_id = ?1
                 ORDER BY books.title_key ASC, books.id ASC;"
            ))?;
            let mut rows = stmt.query([id])?;
            let mut books = Vec::new();
            while let Some(row) = rows.next()? {
                books.push(parse_book_row(row)?);
            }
            Ok(books)
        })
    }

    fn link_book(&self, id: StoreId, book: &NewBook) -> RepoResult<BookLink> {
        self.storage.with_conn(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            ensure_store_exists(&tx, id)?;
            let link = link_in_tx(&tx, id, book)?;
            tx.commit()?;
            Ok(link)
        })
    }

    fn unlink_title(&self, id: StoreId, title: &str) -> RepoResult<Option<Book>> {
        let key = identity_key(title);
        self.storage.with_conn(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            ensure_store_exists(&tx, id)?;

            let held = select_store_book_by_key(&tx, id, &key)?;

            if let Some(book) = held.as_ref() {
                tx.execute(
                    "DELETE FROM memberships WHERE store_id = ?1 AND book_id = ?2;",
                    params![id, book.id],
                )?;
            }

            tx.commit()?;
            Ok(held)
        })
    }

    fn replace_books(&self, id: StoreId, books: &[NewBook]) -> RepoResult<Vec<BookLink>> {
        self.storage.with_conn(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            ensure_store_exists(&tx, id)?;
            tx.execute("DELETE FROM memberships WHERE store_id = ?1;", [id])?;

            let mut links = Vec::with_capacity(books.len());
            for book in books {
                links.push(link_in_tx(&tx, id, book)?);
            }

            tx.commit()?;
            Ok(links)
        })
    }
}

fn link_in_tx(conn: &Connection, store_id: StoreId, book: &NewBook) -> RepoResult<BookLink> {
    let (book, book_created) = resolve_or_create_book(conn, book)?;
    let inserted = conn.execute(
        "INSERT INTO memberships (store_id, book_id)
         VALUES (?1, ?2)
         ON CONFLICT(store_id, book_id) DO NOTHING;",
        params![store_id, book.id],
    )?;
    Ok(BookLink {
        book,
        book_created,
        linked: inserted == 1,
    })
}

fn select_store_book_by_key(
    conn: &Connection,
    store_id: StoreId,
    key: &str,
) -> RepoResult<Option<Book>> {
    let mut stmt = conn.prepare(&format!(
        "{BOOK_SELECT_SQL}
         INNER JOIN memberships m ON m.book_id = books.id
         WHERE m.store_id = ?1
           AND books.title_key = ?2
         LIMIT 1;"
    ))?;
    let mut rows = stmt.query(params![store_id, key])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_book_row(row)?));
    }
    Ok(None)
}

fn ensure_store_exists(conn: &Connection, id: StoreId) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM stores WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    if exists == 1 {
        Ok(())
    } else {
        Err(RepoError::StoreNotFound(id))
    }
}

fn select_store(conn: &Connection, id: StoreId) -> RepoResult<Option<Store>> {
    let mut stmt = conn.prepare(&format!("{STORE_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_store_row(row)?));
    }
    Ok(None)
}

fn parse_store_row(row: &Row<'_>) -> RepoResult<Store> {
    let id: StoreId = row.get("id")?;
    let name: String = row.get("name")?;
    let address: String = row.get("address")?;
    if name.is_empty() || address.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "store {id} has empty name or address"
        )));
    }

    Ok(Store {
        id,
        name,
        address,
        created_at: row.get("created_at")?,
    })
}
