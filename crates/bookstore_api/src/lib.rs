//! Request-facing layer for one configured bookstore.
//!
//! Transport adapters (the CLI, an HTTP server) call [`BookstoreApi`] and
//! forward its [`ApiResponse`] envelopes unchanged.

pub mod api;
pub mod config;

pub use api::{ApiResponse, BookPayload, BookstoreApi, BootstrapError, HealthReport};
pub use config::ApiConfig;
