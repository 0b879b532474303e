//! Advisory per-field validation errors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A field whose submitted value was rejected and replaced.
///
/// These are collected and reported, never returned as `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub section: String,
    pub message: String,
}

impl ValidationError {
    pub fn invalid_value(section: &str, field: &str) -> Self {
        Self {
            field: field.to_string(),
            section: section.to_string(),
            message: format!("Invalid value for {} in section {}.", field, section),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.section, self.field, self.message)
    }
}
