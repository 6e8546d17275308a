//! # Commands Module
//!
//! Every operation the host UI can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── auth.rs       ◄─── register, login, logout, password reset
//! ├── inventory.rs  ◄─── shop name, item list, add/remove item
//! └── scanner.rs    ◄─── scanner view lifecycle and lookups
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Host UI                                                                │
//! │  ───────                                                                │
//! │  add_item(&db, &session, &inventory, "0123…", "Milk", "1.29")          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  1. Validate inputs (pricepal-core::validation)                        │
//! │  2. Resolve the user's shop (users/{uid}.shopName)                     │
//! │  3. Write through pricepal-db                                          │
//! │  4. Update screen state, return the new view                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Ok(Vec<InventoryItem>) | Err(ApiError { code, message })              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs the session
//! auth::logout(&session, &inventory).await;
//!
//! // Needs the database and the scanner screen
//! scanner::on_appear(&db, &mut screen, None).await;
//! ```

pub mod auth;
pub mod inventory;
pub mod scanner;
