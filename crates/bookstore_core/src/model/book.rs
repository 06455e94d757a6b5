//! Book records.
//!
//! # Invariants
//! - `title` is non-empty; two books never share the same `title_key`.
//! - `external_id` (ISBN or similar) is globally unique when present.
//! - A book outlives every membership that references it.

use super::validation::{optional_text, require_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Storage-assigned book identifier.
pub type BookId = i64;

/// Canonical catalog entry, independent of any store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: Option<String>,
    /// External identifier such as an ISBN.
    #[serde(rename = "isbn")]
    pub external_id: Option<String>,
    pub year: Option<i32>,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
}

/// Write model for creating a book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: Option<String>,
    pub external_id: Option<String>,
    pub year: Option<i32>,
}

impl NewBook {
    /// Creates a title-only book request.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the author; a blank value is dropped by [`NewBook::validated`].
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Sets the external identifier (ISBN or similar).
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    /// Sets the publication year.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Validates the request and returns it with optional fields normalized.
    ///
    /// The title itself is kept verbatim; only blank optional fields are
    /// dropped.
    pub fn validated(self) -> Result<Self, ValidationError> {
        require_text("title", &self.title)?;
        Ok(Self {
            title: self.title,
            author: optional_text(self.author),
            external_id: optional_text(self.external_id),
            year: self.year,
        })
    }
}

/// Case-insensitive identity key for titles and search terms.
///
/// Uses full Unicode lowercasing, so `L'ÉTRANGER` and `l'étranger` collide.
pub fn identity_key(text: &str) -> String {
    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{identity_key, NewBook};

    #[test]
    fn identity_key_folds_unicode_case() {
        assert_eq!(identity_key("L'ÉTRANGER"), identity_key("l'étranger"));
        assert_ne!(identity_key("Foo"), identity_key(" Foo"));
    }

    #[test]
    fn validated_rejects_empty_title_and_normalizes_optionals() {
        assert!(NewBook::titled("").validated().is_err());
        assert_eq!(NewBook::titled(" ").validated().unwrap().title, " ");

        let book = NewBook::titled("Le Petit Prince")
            .with_author(" ")
            .with_external_id(" 978-2070612758 ")
            .validated()
            .unwrap();
        assert_eq!(book.author, None);
        assert_eq!(book.external_id.as_deref(), Some("978-2070612758"));
    }
}
