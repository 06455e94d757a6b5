//! Bookstore domain model.
//!
//! # Responsibility
//! - Define the book, store and membership records shared by repositories and
//!   services.
//! - Own input validation for every mutating entry point.
//!
//! # Invariants
//! - Identifiers are assigned by storage and never reused.
//! - A book's identity is its Unicode-lowercased title (`title_key`).

pub mod book;
pub mod store;
pub mod validation;
