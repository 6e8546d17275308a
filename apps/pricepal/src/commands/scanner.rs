//! # Scanner Commands
//!
//! Drive the scanner view: shop picker, barcode lookups and "Scan Again".
//!
//! ## Lookup Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  binding.changed() ──► "012345678905"                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sentinel "Barcode"? ──── yes ──► nothing to look up                   │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  fetch shops/{selected}                                                 │
//! │       ├── error / missing ──► log, keep what is on screen              │
//! │       ▼                                                                 │
//! │  name, price = "Unknown item", "0"                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  field for barcode present? ──► name, price = record                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Backend failures here are never surfaced to the user; the screen keeps
//! stale or sentinel values on display.

use pricepal_core::{BarcodeSymbol, ItemRecord, ScanResult, SHOPS_COLLECTION};
use pricepal_db::Database;
use tracing::{debug, info, warn};

use crate::state::ScannerScreen;

/// Prepares the scanner view each time it is shown.
///
/// Refreshes the shop picker, preselects `default_shop` when nothing is
/// picked yet, and re-arms the scanner.
pub async fn on_appear(db: &Database, screen: &mut ScannerScreen, default_shop: Option<&str>) {
    match db.documents().shop_names().await {
        Ok(names) => {
            debug!(count = names.len(), "Shop names fetched");
            screen.set_shop_names(names);
        }
        Err(e) => warn!(error = %e, "Failed to fetch shop names"),
    }

    if screen.selected_shop().is_none() {
        if let Some(shop) = default_shop {
            screen.select_shop(shop);
        }
    }

    screen.scan_again();
}

/// Picks the shop whose prices are looked up.
pub fn select_shop(screen: &mut ScannerScreen, name: &str) {
    if !screen.shop_names().iter().any(|known| known == name) {
        debug!(shop = %name, "Selected shop is not in the fetched list");
    }
    info!(shop = %name, "Shop selected");
    screen.select_shop(name);
}

/// Shows a scanned barcode and looks it up.
pub async fn on_barcode(db: &Database, screen: &mut ScannerScreen, symbol: &BarcodeSymbol) {
    screen.show_barcode(symbol);
    lookup(db, screen).await;
}

/// Resolves the displayed barcode against the selected shop.
pub async fn lookup(db: &Database, screen: &mut ScannerScreen) {
    if screen.result().is_awaiting_scan() {
        return;
    }

    let barcode = screen.result().barcode.clone();
    let Some(shop) = screen.selected_shop().map(str::to_string) else {
        warn!(barcode = %barcode, "No shop selected, skipping lookup");
        return;
    };

    let document = match db.documents().fetch(SHOPS_COLLECTION, &shop).await {
        Ok(Some(document)) => document,
        Ok(None) => {
            warn!(shop = %shop, "Shop document does not exist");
            return;
        }
        Err(e) => {
            warn!(shop = %shop, error = %e, "Failed to fetch shop document");
            return;
        }
    };

    let result = screen.result_mut();
    result.clear_lookup();

    match document.get(&barcode) {
        Some(value) => match ItemRecord::from_field(&barcode, value) {
            Ok(record) => {
                debug!(shop = %shop, barcode = %barcode, "Item found");
                result.apply_record(&record);
            }
            Err(e) => warn!(shop = %shop, error = %e, "Stored item is malformed"),
        },
        None => debug!(shop = %shop, barcode = %barcode, "Item not priced in shop"),
    }
}

/// "Scan Again": everything back to sentinels, scanner re-armed.
pub fn scan_again(screen: &mut ScannerScreen) {
    screen.scan_again();
}

/// Waits for the next scanned barcode and resolves it.
///
/// Returns `None` once the capture side has gone away.
pub async fn next_scan(db: &Database, screen: &mut ScannerScreen) -> Option<ScanResult> {
    let symbol = screen.binding_mut().changed().await?;
    on_barcode(db, screen, &symbol).await;
    Some(screen.result().clone())
}

/// Drains the binding on the UI task, rendering after every lookup.
pub async fn run<F>(db: &Database, screen: &mut ScannerScreen, mut render: F)
where
    F: FnMut(&mut ScannerScreen),
{
    while next_scan(db, screen).await.is_some() {
        render(screen);
    }
    debug!("Scanner binding closed");
}
