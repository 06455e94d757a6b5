//! Request-facing use-case API for the configured bookstore.
//!
//! # Responsibility
//! - Expose one method per endpoint (name, list, add, remove, search,
//!   health) over the catalog services.
//! - Map catalog outcomes and errors onto HTTP-equivalent status codes.
//!
//! # Invariants
//! - Methods never panic; every failure becomes a response envelope.
//! - Invalid input is a 4xx, storage failure a 503. A rejected add is never
//!   reported as success.

use bookstore_core::{
    Book, CatalogError, DbError, NewBook, RemoveOutcome, SqliteStoreCatalog, Storage, StoreId,
};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::config::ApiConfig;

pub const STATUS_OK: u16 = 200;
pub const STATUS_NO_CONTENT: u16 = 204;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_CONFLICT: u16 = 409;
pub const STATUS_SERVICE_UNAVAILABLE: u16 = 503;

/// Response envelope shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponse<T> {
    /// HTTP-equivalent status code.
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(body: T) -> Self {
        Self {
            status: STATUS_OK,
            body: Some(body),
            error: None,
        }
    }

    fn no_content() -> Self {
        Self {
            status: STATUS_NO_CONTENT,
            body: None,
            error: None,
        }
    }

    fn failure(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: None,
            error: Some(message.into()),
        }
    }

    fn from_catalog_error(op: &str, err: CatalogError) -> Self {
        let status = match &err {
            CatalogError::Validation(_) => STATUS_BAD_REQUEST,
            CatalogError::StoreNotFound(_) => STATUS_NOT_FOUND,
            CatalogError::Conflict(_) => STATUS_CONFLICT,
            CatalogError::Storage(_) => STATUS_SERVICE_UNAVAILABLE,
        };
        if err.is_storage_failure() {
            error!("event=api_request module=api status=error op={op} http_status={status} error={err}");
        } else {
            warn!("event=api_request module=api status=rejected op={op} http_status={status} error={err}");
        }
        Self::failure(status, format!("{op} failed: {err}"))
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Body of add/remove requests. `nomLivre` is accepted for older clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookPayload {
    #[serde(alias = "nomLivre")]
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl From<BookPayload> for NewBook {
    fn from(payload: BookPayload) -> Self {
        Self {
            title: payload.title,
            author: payload.author,
            external_id: payload.isbn,
            year: payload.year,
        }
    }
}

/// Readiness report returned by [`BookstoreApi::health`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Startup failure; the process cannot serve requests.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("storage open failed: {0}")]
    Storage(#[from] DbError),
    #[error("store bootstrap failed: {0}")]
    Catalog(#[from] CatalogError),
}

/// API bound to the single configured store.
pub struct BookstoreApi {
    storage: Arc<Storage>,
    store_id: StoreId,
}

impl BookstoreApi {
    /// Opens storage at the configured path and prepares the configured store.
    pub fn bootstrap(config: &ApiConfig) -> Result<Self, BootstrapError> {
        let storage = Arc::new(Storage::open(&config.db_path)?);
        Self::with_storage(storage, config)
    }

    /// Finds the configured store, or creates it stocked with the seed
    /// titles. An existing store keeps its books; seeds never come back after
    /// a removal.
    pub fn with_storage(storage: Arc<Storage>, config: &ApiConfig) -> Result<Self, BootstrapError> {
        let catalog = SqliteStoreCatalog::with_storage(&storage);
        let (store, seeded) = match catalog.find_by_name(&config.store_name)? {
            Some(mut store) => {
                if store.address != config.store_address {
                    catalog.set_address(&mut store, &config.store_address)?;
                }
                (store, 0)
            }
            None => {
                let store = catalog.create(&config.store_name, &config.store_address)?;
                for title in &config.seed_titles {
                    catalog.add(store.id, NewBook::titled(title.as_str()))?;
                }
                (store, config.seed_titles.len())
            }
        };

        info!(
            "event=api_bootstrap module=api status=ok store_id={} seeds={seeded}",
            store.id
        );
        let store_id = store.id;
        Ok(Self { storage, store_id })
    }

    /// Id of the store every endpoint operates on.
    pub fn store_id(&self) -> StoreId {
        self.store_id
    }

    /// `GET /nom`.
    pub fn store_name(&self) -> ApiResponse<String> {
        match self.catalog().get(self.store_id) {
            Ok(Some(store)) => ApiResponse::ok(store.name),
            Ok(None) => ApiResponse::from_catalog_error(
                "store_name",
                CatalogError::StoreNotFound(self.store_id),
            ),
            Err(err) => ApiResponse::from_catalog_error("store_name", err),
        }
    }

    /// `GET /`.
    pub fn welcome(&self) -> ApiResponse<String> {
        self.respond("welcome", |catalog| catalog.welcome(self.store_id))
    }

    /// `GET /livres`: titles only.
    pub fn list_books(&self) -> ApiResponse<Vec<String>> {
        self.respond("list_books", |catalog| {
            catalog
                .list_books(self.store_id)
                .map(|books| books.into_iter().map(|book| book.title).collect())
        })
    }

    /// `GET /livres/details`: full records.
    pub fn list_book_details(&self) -> ApiResponse<Vec<Book>> {
        self.respond("list_book_details", |catalog| {
            catalog.list_books(self.store_id)
        })
    }

    /// `POST /livres` with a JSON [`BookPayload`].
    pub fn add_book(&self, payload: &str) -> ApiResponse<()> {
        let payload = match parse_payload(payload) {
            Ok(payload) => payload,
            Err(response) => return response,
        };
        match self.catalog().add(self.store_id, payload.into()) {
            Ok(_) => ApiResponse::no_content(),
            Err(err) => ApiResponse::from_catalog_error("add_book", err),
        }
    }

    /// `DELETE /livres` with a JSON [`BookPayload`]. Removing a title the
    /// store does not hold still answers 204.
    pub fn remove_book(&self, payload: &str) -> ApiResponse<()> {
        let payload = match parse_payload(payload) {
            Ok(payload) => payload,
            Err(response) => return response,
        };
        match self.catalog().remove(self.store_id, &payload.title) {
            Ok(RemoveOutcome::Removed(_) | RemoveOutcome::NotInStore) => ApiResponse::no_content(),
            Err(err) => ApiResponse::from_catalog_error("remove_book", err),
        }
    }

    /// `GET /livres/search?q=`. A missing or blank query answers `[]`.
    pub fn search_books(&self, query: Option<&str>) -> ApiResponse<Vec<Book>> {
        self.respond("search_books", |catalog| catalog.search(query))
    }

    /// `GET /health`.
    pub fn health(&self) -> ApiResponse<HealthReport> {
        match self.storage.ping() {
            Ok(()) => ApiResponse::ok(HealthReport {
                status: "healthy".to_string(),
                database: Some("connected".to_string()),
                error: None,
            }),
            Err(err) => {
                error!("event=health_check module=api status=error error={err}");
                ApiResponse {
                    status: STATUS_SERVICE_UNAVAILABLE,
                    body: Some(HealthReport {
                        status: "unhealthy".to_string(),
                        database: None,
                        error: Some(err.to_string()),
                    }),
                    error: Some(err.to_string()),
                }
            }
        }
    }

    fn catalog(&self) -> SqliteStoreCatalog<'_> {
        SqliteStoreCatalog::with_storage(&self.storage)
    }

    fn respond<T>(
        &self,
        op: &str,
        f: impl FnOnce(&SqliteStoreCatalog<'_>) -> Result<T, CatalogError>,
    ) -> ApiResponse<T> {
        match f(&self.catalog()) {
            Ok(body) => ApiResponse::ok(body),
            Err(err) => ApiResponse::from_catalog_error(op, err),
        }
    }
}

fn parse_payload<T>(payload: &str) -> Result<BookPayload, ApiResponse<T>> {
    serde_json::from_str(payload).map_err(|err| {
        warn!("event=api_request module=api status=rejected error_code=invalid_payload error={err}");
        ApiResponse::failure(STATUS_BAD_REQUEST, format!("invalid payload: {err}"))
    })
}
