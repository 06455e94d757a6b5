//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist canonical book records independent of any store.
//! - Provide case-insensitive title lookup and title/author substring search.
//! - Expose connection-level helpers so store writes can resolve books inside
//!   their own transaction.
//!
//! # Invariants
//! - `title_key` is always `identity_key(title)`.
//! - Search and list results are ordered by `title_key ASC, id ASC`.
//! - Search terms match literally; no character acts as a wildcard.

use super::{RepoError, RepoResult};
use crate::db::Storage;
use crate::model::book::{identity_key, Book, BookId, NewBook};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub(crate) const BOOK_SELECT_SQL: &str = "SELECT
    books.id AS id,
    books.title AS title,
    books.author AS author,
    books.external_id AS external_id,
    books.year AS year,
    books.created_at AS created_at
FROM books";

/// Repository interface for catalog-wide book operations.
pub trait BookRepository {
    /// Case-insensitive substring match on title or author. A blank term
    /// matches every book.
    fn search_books(&self, term: &str) -> RepoResult<Vec<Book>>;
    /// Case-insensitive exact title lookup.
    fn find_by_title(&self, title: &str) -> RepoResult<Option<Book>>;
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    /// Inserts a book. Duplicate titles or external ids surface as
    /// `RepoError::Conflict`.
    fn create_book(&self, book: &NewBook) -> RepoResult<Book>;
    /// Deletes a book and, through the foreign-key cascade, its memberships.
    /// Returns `false` when no such book existed.
    fn delete_book(&self, id: BookId) -> RepoResult<bool>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'s> {
    storage: &'s Storage,
}

impl<'s> SqliteBookRepository<'s> {
    pub fn new(storage: &'s Storage) -> Self {
        Self { storage }
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn search_books(&self, term: &str) -> RepoResult<Vec<Book>> {
        let needle = identity_key(term.trim());
        self.storage.with_conn(|conn| {
            // instr() has no pattern-length limit, unlike LIKE.
            let mut stmt = conn.prepare(&format!(
                "{BOOK_SELECT_SQL}
                 WHERE instr(title_key, ?1) > 0
                    OR instr(author_key, ?1) > 0
                 ORDER BY title_key ASC, id ASC;"
            ))?;
            let mut rows = stmt.query([needle.as_str()])?;
            let mut books = Vec::new();
            while let Some(row) = rows.next()? {
                books.push(parse_book_row(row)?);
            }
            Ok(books)
        })
    }

    fn find_by_title(&self, title: &str) -> RepoResult<Option<Book>> {
        let key = identity_key(title);
        self.storage
            .with_conn(|conn| select_book_by_key(conn, &key))
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        self.storage.with_conn(|conn| select_book_by_id(conn, id))
    }

    fn create_book(&self, book: &NewBook) -> RepoResult<Book> {
        self.storage.with_conn(|conn| {
            insert_book(conn, book, false)?.ok_or_else(|| {
                RepoError::InvalidData("inserted book missing in read-back".to_string())
            })
        })
    }

    fn delete_book(&self, id: BookId) -> RepoResult<bool> {
        self.storage.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM books WHERE id = ?1;", [id])?;
            Ok(changed > 0)
        })
    }
}

/// Finds the book for `book.title`, or creates it, on the given connection.
///
/// Resolution order: exact title key, then external id (a known external id
/// names the same book even under another title), then insert. The insert
/// tolerates a concurrent writer that claimed the title first and links
/// against that record instead. Returns the book and whether it was created.
pub(crate) fn resolve_or_create_book(
    conn: &Connection,
    book: &NewBook,
) -> RepoResult<(Book, bool)> {
    let key = identity_key(&book.title);
    if let Some(existing) = select_book_by_key(conn, &key)? {
        return Ok((existing, false));
    }

    if let Some(external_id) = book.external_id.as_deref() {
        if let Some(existing) = select_book_by_external_id(conn, external_id)? {
            return Ok((existing, false));
        }
    }

    if let Some(created) = insert_book(conn, book, true)? {
        return Ok((created, true));
    }

    select_book_by_key(conn, &key)?
        .map(|existing| (existing, false))
        .ok_or_else(|| RepoError::InvalidData(format!("book `{key}` vanished after insert")))
}

pub(crate) fn select_book_by_key(conn: &Connection, key: &str) -> RepoResult<Option<Book>> {
    select_one(conn, "WHERE title_key = ?1", key)
}

fn select_book_by_external_id(conn: &Connection, external_id: &str) -> RepoResult<Option<Book>> {
    select_one(conn, "WHERE external_id = ?1", external_id)
}

fn select_book_by_id(conn: &Connection, id: BookId) -> RepoResult<Option<Book>> {
    select_one(conn, "WHERE id = ?1", id)
}

fn select_one(
    conn: &Connection,
    filter: &str,
    value: impl rusqlite::ToSql,
) -> RepoResult<Option<Book>> {
    let mut stmt = conn.prepare(&format!("{BOOK_SELECT_SQL} {filter} LIMIT 1;"))?;
    let mut rows = stmt.query([value])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_book_row(row)?));
    }
    Ok(None)
}

/// Inserts one book row. With `ignore_title_conflict`, a row already holding
/// the same title key leaves the table unchanged and yields `None`.
fn insert_book(
    conn: &Connection,
    book: &NewBook,
    ignore_title_conflict: bool,
) -> RepoResult<Option<Book>> {
    let conflict_clause = if ignore_title_conflict {
        " ON CONFLICT(title_key) DO NOTHING"
    } else {
        ""
    };
    let id: Option<BookId> = conn
        .query_row(
            &format!(
                "INSERT INTO books (title, title_key, author, author_key, external_id, year)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6){conflict_clause}
                 RETURNING id;"
            ),
            params![
                book.title.as_str(),
                identity_key(&book.title),
                book.author.as_deref(),
                book.author.as_deref().map(identity_key),
                book.external_id.as_deref(),
                book.year,
            ],
            |row| row.get(0),
        )
        .optional()?;

    match id {
        Some(id) => select_book_by_id(conn, id),
        None => Ok(None),
    }
}

pub(crate) fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let id: BookId = row.get("id")?;
    let title: String = row.get("title")?;
    if title.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty title for book {id} in books.title"
        )));
    }

    Ok(Book {
        id,
        title,
        author: row.get("author")?,
        external_id: row.get("external_id")?,
        year: row.get("year")?,
        created_at: row.get("created_at")?,
    })
}
