//! Input validation shared by book and store writes.

use thiserror::Error;

/// Malformed caller input. Always recoverable: the rejected write never
/// reaches storage and prior state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("`{field}` must be non-empty text")]
    EmptyField { field: &'static str },
}

/// Checks that a required text field is non-empty. Whitespace counts as text.
pub fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(())
}

/// Normalizes an optional text field: blank values become `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
