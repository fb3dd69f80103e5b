//! Custom error types for Fatura
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for Fatura operations
#[derive(Error, Debug)]
pub enum FaturaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// A stored day/month/year cannot be projected onto the calendar
    #[error("Invalid date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl FaturaError {
    /// Create a "not found" error for cards
    pub fn card_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Card",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for purchases
    pub fn purchase_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Purchase",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for installments
    pub fn installment_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Installment",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for paid invoice records
    pub fn paid_invoice_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Paid invoice",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for FaturaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FaturaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Fatura operations
pub type FaturaResult<T> = Result<T, FaturaError>;
