//! # Error Types
//!
//! Domain-specific error types for pricepal-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pricepal-core errors (this file)                                      │
//! │  ├── CoreError        - Document/domain mapping failures               │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  pricepal-scanner     └── CaptureError - camera configuration          │
//! │  pricepal-db          └── DbError      - storage + accounts            │
//! │  apps/pricepal        └── ApiError     - what the host UI sees         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain errors raised while interpreting stored documents.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A document field does not hold the expected shape.
    ///
    /// ## When This Occurs
    /// - An item field is not an object with `itemName`/`itemPrice` strings
    /// - A profile is missing its `shopName`
    #[error("Field '{field}' is malformed: {reason}")]
    MalformedField { field: String, reason: String },

    /// Symbology tag is not one of the supported linear formats.
    #[error("Unsupported symbology: {0}")]
    UnsupportedSymbology(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a MalformedField error.
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::MalformedField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., malformed email, price with letters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
