//! # pricepal-db: Backend Service for PricePal
//!
//! SQLite-backed document store and account service.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        pricepal-db Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                         Database                                 │   │
//! │  │  ┌───────────────────────────────────────────────────────────┐  │   │
//! │  │  │                    SqlitePool                              │  │   │
//! │  │  │  WAL mode • foreign keys • embedded migrations             │  │   │
//! │  │  └───────────────────────────────────────────────────────────┘  │   │
//! │  │                              │                                   │   │
//! │  │              ┌───────────────┴───────────────┐                  │   │
//! │  │              ▼                               ▼                  │   │
//! │  │  ┌───────────────────────┐     ┌───────────────────────┐       │   │
//! │  │  │ DocumentRepository    │     │ AccountRepository     │       │   │
//! │  │  │ shops/*, users/*      │     │ argon2 + reset tokens │       │   │
//! │  │  └───────────────────────┘     └───────────────────────┘       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use pricepal_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./pricepal.db")).await?;
//! let shops = db.documents().shop_names().await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, Location};
pub use repository::{Account, AccountRepository, Document, DocumentRepository};
