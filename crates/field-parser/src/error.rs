//! Field Error Types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a listing field could not be used
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldError {
    /// Field absent or explicitly null
    #[error("Missing field: {field}")]
    Missing { field: String },

    /// Field present but not in a recognised format
    #[error("Invalid {field} value: {value:?}")]
    InvalidFormat { field: String, value: String },
}

impl FieldError {
    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            FieldError::Missing { field } | FieldError::InvalidFormat { field, .. } => field,
        }
    }

    pub(crate) fn missing(field: &str) -> Self {
        FieldError::Missing {
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid(field: &str, value: impl ToString) -> Self {
        FieldError::InvalidFormat {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}
