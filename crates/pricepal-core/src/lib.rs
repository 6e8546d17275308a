//! # pricepal-core: Pure Domain Types for PricePal
//!
//! This crate holds the domain model shared by the scanner pipeline, the
//! document store and the application screens. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PricePal Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Host UI (external)                           │   │
//! │  │    Login ──► Inventory ──► Scanner ──► Scan Again               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            apps/pricepal (screens + commands)                   │   │
//! │  └──────────────┬──────────────────────────────┬───────────────────┘   │
//! │                 │                              │                        │
//! │  ┌──────────────▼──────────────┐  ┌────────────▼────────────────────┐  │
//! │  │  pricepal-scanner           │  │  pricepal-db                    │  │
//! │  │  capture → decode → report  │  │  documents + accounts (SQLite)  │  │
//! │  └──────────────┬──────────────┘  └────────────┬────────────────────┘  │
//! │                 └──────────────┬───────────────┘                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pricepal-core (THIS CRATE) ★                    │   │
//! │  │   Symbology • BarcodeSymbol • ScanResult • ItemRecord           │   │
//! │  │   UserProfile • validation • sentinels                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (BarcodeSymbol, ScanResult, ItemRecord, etc.)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation for forms and scanned values
//!
//! ## Example Usage
//!
//! ```rust
//! use pricepal_core::{BarcodeSymbol, ScanResult, Symbology};
//!
//! let symbol = BarcodeSymbol::new("012345678905", Symbology::Ean13);
//! let mut result = ScanResult::default();
//! assert!(result.is_awaiting_scan());
//!
//! result.barcode = symbol.value().to_string();
//! assert!(!result.is_awaiting_scan());
//! ```

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Sentinels
// =============================================================================

/// Barcode value shown while no scan has been received yet.
///
/// The host writes this back into the barcode binding to request a new scan.
pub const NO_SCAN_SENTINEL: &str = "Barcode";

/// Item name shown until a lookup resolves a record.
pub const UNKNOWN_ITEM_NAME: &str = "Unknown item";

/// Item price shown until a lookup resolves a record.
pub const UNKNOWN_ITEM_PRICE: &str = "0";

/// Placeholder for the shop picker before the user selects a shop.
pub const NO_SHOP_SELECTED: &str = "Select shop";

// =============================================================================
// Document Store Layout
// =============================================================================

/// Collection holding one document per shop; fields are barcodes.
pub const SHOPS_COLLECTION: &str = "shops";

/// Collection holding one profile document per account uid.
pub const USERS_COLLECTION: &str = "users";

/// Item record field: display name.
pub const FIELD_ITEM_NAME: &str = "itemName";

/// Item record field: price as entered by the shop owner.
pub const FIELD_ITEM_PRICE: &str = "itemPrice";

/// Profile field: account email.
pub const FIELD_EMAIL: &str = "email";

/// Profile field: the shop this user manages.
pub const FIELD_SHOP_NAME: &str = "shopName";
