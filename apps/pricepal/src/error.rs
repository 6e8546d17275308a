//! # API Error Type
//!
//! Unified error type for commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in PricePal                               │
//! │                                                                         │
//! │  Host UI                     Rust Backend                               │
//! │  ───────                     ────────────                               │
//! │                                                                         │
//! │  login(email, password)                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │  Validation Error? ─── ValidationError::TooShort ──┐            │  │
//! │  │         │                                          │            │  │
//! │  │  Database Error? ───── DbError::InvalidCredentials ┼─ ApiError ►│  │
//! │  │         │                                          │            │  │
//! │  │  Camera Error? ─────── CaptureError::Device… ──────┘            │  │
//! │  │         │                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  alert(e.message)   // "The email or password is incorrect"            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Scanner lookups never return `ApiError`: the scanner screen logs backend
//! failures and keeps what it was showing.

use pricepal_core::{CoreError, ValidationError};
use pricepal_db::DbError;
use pricepal_scanner::CaptureError;
use serde::Serialize;
use ts_rs::TS;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "EMAIL_IN_USE",
///   "message": "The email address a@b.co is already in use by another account"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Email/password pair rejected
    InvalidCredentials,

    /// Registration with an email that already has an account
    EmailInUse,

    /// Command needs a logged-in user
    NotLoggedIn,

    /// Stored data could not be read
    MalformedData,

    /// Database operation failed
    DatabaseError,

    /// Camera could not be configured
    CameraError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn not_logged_in() -> Self {
        ApiError::new(ErrorCode::NotLoggedIn, "You need to log in first")
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            e @ DbError::EmailInUse(_) => ApiError::new(ErrorCode::EmailInUse, e.to_string()),
            e @ DbError::InvalidCredentials => {
                ApiError::new(ErrorCode::InvalidCredentials, e.to_string())
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::DatabaseError, "Invalid reference")
            }
            e @ DbError::InvalidValue { .. } => {
                tracing::error!("{}", e);
                ApiError::new(ErrorCode::MalformedData, "Stored data could not be read")
            }
            DbError::Hashing(e) => {
                tracing::error!("Password hashing failed: {}", e);
                ApiError::internal("Could not process the password")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            e @ CoreError::MalformedField { .. } => {
                ApiError::new(ErrorCode::MalformedData, e.to_string())
            }
            e @ CoreError::UnsupportedSymbology(_) => ApiError::validation(e.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<CaptureError> for ApiError {
    fn from(err: CaptureError) -> Self {
        ApiError::new(ErrorCode::CameraError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for commands.
pub type ApiResult<T> = Result<T, ApiError>;
