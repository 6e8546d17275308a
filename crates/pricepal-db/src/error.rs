//! # Database Error Types
//!
//! Error types for backend operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)      Argon2 / JSON failures                │
//! │       │                                 │                               │
//! │       ▼                                 ▼                               │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ├──► Screens: logged, stale/sentinel values stay on display      │
//! │       │                                                                 │
//! │       └──► ApiError (app layer) ← Displayable message for auth forms   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - Deleting a field of a document that does not exist
    /// - Password reset for an unknown email
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// An account with this email is already registered.
    #[error("The email address {0} is already in use by another account")]
    EmailInUse(String),

    /// Email/password pair did not match an account.
    #[error("The email or password is incorrect")]
    InvalidCredentials,

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// The store could not be opened, or the pool was closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored field value is not valid JSON.
    #[error("Invalid value in {collection}/{key}.{field}: {reason}")]
    InvalidValue {
        collection: String,
        key: String,
        field: String,
        reason: String,
    },

    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }
}

/// Classifies sqlx errors.
///
/// ```text
/// Database(kind = UniqueViolation)      → UniqueViolation  (field from the message)
/// Database(kind = ForeignKeyViolation)  → ForeignKeyViolation
/// Database(other)                       → QueryFailed
/// ColumnDecode                          → Internal
/// PoolTimedOut                          → PoolExhausted
/// PoolClosed                            → ConnectionFailed
/// ```
///
/// Repositories use `fetch_optional`, so `RowNotFound` never carries an
/// entity worth naming and falls through to `Internal`.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => DbError::UniqueViolation {
                    // "UNIQUE constraint failed: accounts.email"
                    field: db_err
                        .message()
                        .rsplit(": ")
                        .next()
                        .unwrap_or("unknown")
                        .to_string(),
                    value: "unknown".to_string(),
                },
                ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation {
                    message: db_err.message().to_string(),
                },
                _ => DbError::QueryFailed(db_err.message().to_string()),
            },

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            DbError::not_found("Document", "shops/Corner").to_string(),
            "Document not found: shops/Corner"
        );
        assert_eq!(
            DbError::InvalidCredentials.to_string(),
            "The email or password is incorrect"
        );
        assert!(DbError::not_found("Account", "x").is_not_found());
        assert!(!DbError::PoolExhausted.is_not_found());
    }
}
