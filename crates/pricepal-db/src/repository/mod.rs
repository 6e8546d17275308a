//! # Repository Module
//!
//! Database repository implementations for PricePal.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Screen / command                                                      │
//! │       │                                                                 │
//! │       │  db.documents().fetch("shops", "Corner Store")                 │
//! │       ▼                                                                 │
//! │  DocumentRepository                  AccountRepository                 │
//! │  ├── list_keys / shop_names          ├── create                        │
//! │  ├── fetch / exists                  ├── authenticate                  │
//! │  ├── upsert_field / set_fields       ├── pending_resets                │
//! │  └── delete_field                    └── create_reset_token            │
//! │       │                                   │                             │
//! │       └────────────── SQLite ─────────────┘                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`DocumentRepository`] - Collections of key-value documents
//! - [`AccountRepository`] - Accounts and password reset tokens

pub mod accounts;
pub mod documents;

pub use accounts::{Account, AccountRepository};
pub use documents::{Document, DocumentRepository};
