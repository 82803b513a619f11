//! Request-body field validation.
//!
//! Violations are collected per field and rendered as one 400 response with
//! a `fields` map, rather than failing on the first bad field.

use std::collections::BTreeMap;

use super::handlers::ApiError;

/// Accumulates field name -> violation message pairs.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.insert(field.to_string(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Ok when nothing was collected, otherwise the 400 validation error.
    pub fn into_result(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(self.errors))
        }
    }
}

/// Number of alphabetic characters in a string.
pub fn letter_count(s: &str) -> usize {
    s.chars().filter(|c| c.is_alphabetic()).count()
}

/// Normalize an optional update field: an empty string counts the same as
/// an absent field.
pub fn provided(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}
