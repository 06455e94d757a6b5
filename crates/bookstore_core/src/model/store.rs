//! Store records.

use super::validation::{require_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Storage-assigned store identifier.
pub type StoreId = i64;

/// A bookstore. `name` and `address` are always non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub address: String,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
}

/// Store text field that can be edited after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreField {
    Name,
    Address,
}

impl StoreField {
    /// Column holding this field in the `stores` table.
    pub fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Address => "address",
        }
    }

    /// Rejects values the field cannot hold.
    pub fn validate(self, value: &str) -> Result<(), ValidationError> {
        require_text(self.column(), value)
    }
}

impl Store {
    /// Greeting shown on the store's landing page.
    pub fn welcome(&self) -> String {
        format!("Bienvenu sur le site de la librairie {} !", self.name)
    }
}
