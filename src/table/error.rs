//! Field-level extraction errors.
//!
//! These never abort a build. Category builders catch them and either skip
//! the row or substitute the column's documented default.

use thiserror::Error;

/// Why a field could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("required column `{column}` is missing or empty")]
    MissingRequiredField { column: String },

    #[error("column `{column}` expected an integer, got `{value}`")]
    InvalidFieldKind { column: String, value: String },
}

impl FieldError {
    /// Column the error refers to.
    #[must_use]
    pub fn column(&self) -> &str {
        match self {
            FieldError::MissingRequiredField { column } | FieldError::InvalidFieldKind { column, .. } => column,
        }
    }
}
