//! # Account Repository
//!
//! Email/password accounts and password reset tokens.
//!
//! ## Login Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  create(email, password)                                               │
//! │       │  Argon2id hash with a fresh salt                               │
//! │       ▼                                                                 │
//! │  accounts(uid, email UNIQUE NOCASE, password_hash)                     │
//! │       ▲                                                                 │
//! │       │  look up by email, verify against stored hash                  │
//! │  authenticate(email, password) ──► Account | InvalidCredentials        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unknown email and wrong password are both reported as
//! [`DbError::InvalidCredentials`].

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// A registered account, without its credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub uid: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    uid: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            uid: row.uid,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

/// Repository for account operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Creates a new AccountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    /// Registers a new account.
    ///
    /// The email is stored lowercased. Inputs are expected to be validated
    /// by the caller.
    ///
    /// ## Errors
    /// * `DbError::EmailInUse` - Another account has this email
    pub async fn create(&self, email: &str, password: &str) -> DbResult<Account> {
        let email = email.trim().to_lowercase();
        let password_hash = hash_password(password)?;
        let account = Account {
            uid: Uuid::new_v4().to_string(),
            email,
            created_at: Utc::now(),
        };

        debug!(uid = %account.uid, "Creating account");

        sqlx::query(
            r#"
            INSERT INTO accounts (uid, email, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&account.uid)
        .bind(&account.email)
        .bind(&password_hash)
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::EmailInUse(account.email.clone()),
            other => other,
        })?;

        info!(uid = %account.uid, "Account created");
        Ok(account)
    }

    /// Verifies an email/password pair.
    pub async fn authenticate(&self, email: &str, password: &str) -> DbResult<Account> {
        let row = self
            .find_row(email)
            .await?
            .ok_or(DbError::InvalidCredentials)?;

        if !verify_password(password, &row.password_hash) {
            debug!(uid = %row.uid, "Password mismatch");
            return Err(DbError::InvalidCredentials);
        }

        Ok(row.into())
    }

    /// Records a password reset token for the account with `email`.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No account has this email
    pub async fn create_reset_token(&self, email: &str) -> DbResult<String> {
        let row = self
            .find_row(email)
            .await?
            .ok_or_else(|| DbError::not_found("Account", email.trim().to_lowercase()))?;

        let token = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO password_resets (token, uid, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&token)
        .bind(&row.uid)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        info!(uid = %row.uid, "Password reset requested");
        Ok(token)
    }

    /// Number of outstanding reset tokens for an account.
    pub async fn pending_resets(&self, uid: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM password_resets WHERE uid = ?1")
            .bind(uid)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn find_row(&self, email: &str) -> DbResult<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT uid, email, password_hash, created_at
            FROM accounts
            WHERE email = ?1
            "#,
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Hash a password for storage.
fn hash_password(password: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Hashing(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a password against its stored hash.
fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn repo() -> AccountRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().accounts()
    }

    #[tokio::test]
    async fn test_create_and_authenticate() {
        let accounts = repo().await;
        let created = accounts.create("Owner@Example.com", "secret1").await.unwrap();
        assert_eq!(created.email, "owner@example.com");

        let logged_in = accounts
            .authenticate("OWNER@example.com", "secret1")
            .await
            .unwrap();
        assert_eq!(logged_in.uid, created.uid);
        assert_eq!(logged_in.email, "owner@example.com");
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email() {
        let accounts = repo().await;
        accounts.create("owner@example.com", "secret1").await.unwrap();

        assert!(matches!(
            accounts.authenticate("owner@example.com", "secret2").await,
            Err(DbError::InvalidCredentials)
        ));
        assert!(matches!(
            accounts.authenticate("nobody@example.com", "secret1").await,
            Err(DbError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let accounts = repo().await;
        accounts.create("owner@example.com", "secret1").await.unwrap();

        let err = accounts
            .create("OWNER@example.com", "another")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::EmailInUse(ref email) if email == "owner@example.com"));
    }

    #[tokio::test]
    async fn test_reset_token() {
        let accounts = repo().await;
        let account = accounts.create("owner@example.com", "secret1").await.unwrap();

        let token = accounts.create_reset_token("owner@example.com").await.unwrap();
        assert!(Uuid::parse_str(&token).is_ok());
        assert_eq!(accounts.pending_resets(&account.uid).await.unwrap(), 1);

        let err = accounts.create_reset_token("nobody@example.com").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_hash_roundtrip() {
        let hash = hash_password("secret1").unwrap();
        assert!(verify_password("secret1", &hash));
        assert!(!verify_password("secret2", &hash));
        assert!(!verify_password("secret1", "not-a-hash"));
    }
}
