//! # Database Pool Management
//!
//! Opening the SQLite store that backs the document collections and
//! accounts.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  scan station / seed binary              tests                          │
//! │       │                                    │                            │
//! │       ▼                                    ▼                            │
//! │  DbConfig::new(path)                   DbConfig::in_memory()            │
//! │  Location::File ─ WAL journal          Location::Memory ─ one pinned   │
//! │       │                                    │  connection, never idled   │
//! │       └──────────────┬─────────────────────┘                            │
//! │                      ▼                                                  │
//! │  Database::new(config).await ── pool + foreign keys + migrations       │
//! │       │                                                                 │
//! │       ├──► db.documents()  shops/*, users/*                            │
//! │       └──► db.accounts()   register, login, password reset             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::accounts::AccountRepository;
use crate::repository::documents::DocumentRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Where the store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// A database file, created on first open.
    File(PathBuf),

    /// A private in-memory database. Gone when the pool closes.
    Memory,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::File(path) => write!(f, "{}", path.display()),
            Location::Memory => write!(f, ":memory:"),
        }
    }
}

/// Database configuration.
///
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/pricepal/pricepal.db").max_connections(8);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: Location,

    /// Default: 5 for files. Memory stores always use one connection.
    pub max_connections: u32,

    pub min_connections: u32,

    /// How long `acquire` waits for a free connection.
    pub connect_timeout: Duration,

    /// Default: 10 minutes. Ignored for memory stores.
    pub idle_timeout: Duration,

    pub run_migrations: bool,
}

impl DbConfig {
    /// A file-backed store at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: Location::File(path.into()),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// A throwaway store for tests.
    pub fn in_memory() -> Self {
        DbConfig {
            location: Location::Memory,
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// The database file, if the store is file-backed.
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) => Some(path),
            Location::Memory => None,
        }
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        // Off by default in SQLite; document_fields cascades on it.
        let options = SqliteConnectOptions::new().foreign_keys(true);

        match &self.location {
            Location::File(path) => options
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal),
            Location::Memory => options.in_memory(true),
        }
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new().acquire_timeout(self.connect_timeout);

        match self.location {
            Location::File(_) => options
                .max_connections(self.max_connections)
                .min_connections(self.min_connections)
                .idle_timeout(Some(self.idle_timeout)),
            // Each connection would see its own empty database, and closing
            // the only one drops every document.
            Location::Memory => {
                if self.max_connections != 1 {
                    warn!(
                        requested = self.max_connections,
                        "Memory store is limited to a single connection"
                    );
                }
                options
                    .max_connections(1)
                    .min_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
            }
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the store. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and, unless disabled, applies pending migrations.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(location = %config.location, "Opening database");

        let pool = config
            .pool_options()
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(size = pool.size(), "Database pool created");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Collections of keyed documents (`shops`, `users`).
    pub fn documents(&self) -> DocumentRepository {
        DocumentRepository::new(self.pool.clone())
    }

    pub fn accounts(&self) -> AccountRepository {
        AccountRepository::new(self.pool.clone())
    }

    /// Closes the pool. Repository calls fail afterwards.
    pub async fn close(&self) {
        info!("Closing database");
        self.pool.close().await;
    }

    /// True if a trivial query succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricepal_core::SHOPS_COLLECTION;
    use serde_json::json;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);

        let status = migrations::migration_status(db.pool()).await.unwrap();
        assert!(status.is_current());
        assert_eq!(status.applied, 1);
    }

    #[tokio::test]
    async fn test_memory_stores_are_private() {
        let first = Database::new(DbConfig::in_memory()).await.unwrap();
        let second = Database::new(DbConfig::in_memory()).await.unwrap();

        first
            .documents()
            .upsert_field(SHOPS_COLLECTION, "Corner", "123", &json!({"itemName": "A", "itemPrice": "1"}))
            .await
            .unwrap();

        assert_eq!(first.documents().shop_names().await.unwrap(), vec!["Corner"]);
        assert!(second.documents().shop_names().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unmigrated_store_reports_zero() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        let status = migrations::migration_status(db.pool()).await.unwrap();
        assert_eq!(status.applied, 0);
        assert!(!status.is_current());

        db.run_migrations().await.unwrap();
        assert!(migrations::migration_status(db.pool()).await.unwrap().is_current());
    }

    #[tokio::test]
    async fn test_closed_database_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }

    #[test]
    fn test_config() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
        assert_eq!(config.path(), Some(Path::new("/tmp/test.db")));

        let memory = DbConfig::in_memory();
        assert_eq!(memory.path(), None);
        assert_eq!(memory.location.to_string(), ":memory:");
    }
}
