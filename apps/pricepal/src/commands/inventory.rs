//! # Inventory Commands
//!
//! Price list management for the logged-in user's shop.
//!
//! The shop is read from `users/{uid}.shopName` once per session and cached
//! in [`InventoryState`]. Items live as fields of `shops/{shop}`, keyed by
//! barcode.

use pricepal_core::validation::{validate_barcode, validate_item_name, validate_item_price};
use pricepal_core::{InventoryItem, ItemRecord, UserProfile, SHOPS_COLLECTION, USERS_COLLECTION};
use pricepal_db::{Database, Document};
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::state::{InventoryState, SessionState};

/// Reads the user's shop name from their profile.
pub async fn fetch_shop_name(
    db: &Database,
    session: &SessionState,
    inventory: &InventoryState,
) -> ApiResult<String> {
    let user = session.require().await?;

    let document = db
        .documents()
        .fetch(USERS_COLLECTION, &user.uid)
        .await?
        .ok_or_else(|| ApiError::not_found("User", &user.uid))?;

    let profile = UserProfile::from_document(&document)?;
    debug!(uid = %user.uid, shop = %profile.shop_name, "Shop name resolved");

    inventory.set_shop_name(profile.shop_name.clone()).await;
    Ok(profile.shop_name)
}

/// Loads every item of the user's shop, sorted by barcode.
///
/// A shop with no document yet has no items.
pub async fn fetch_items(
    db: &Database,
    session: &SessionState,
    inventory: &InventoryState,
) -> ApiResult<Vec<InventoryItem>> {
    let shop = current_shop(db, session, inventory).await?;

    let items = match db.documents().fetch(SHOPS_COLLECTION, &shop).await? {
        Some(document) => items_from_document(&document),
        None => Vec::new(),
    };

    debug!(shop = %shop, count = items.len(), "Items fetched");
    Ok(inventory.replace_items(items).await)
}

/// Adds or replaces an item, then reloads the list.
pub async fn add_item(
    db: &Database,
    session: &SessionState,
    inventory: &InventoryState,
    barcode: &str,
    item_name: &str,
    item_price: &str,
) -> ApiResult<Vec<InventoryItem>> {
    let barcode = validate_barcode(barcode)?;
    let record = ItemRecord::new(validate_item_name(item_name)?, validate_item_price(item_price)?);

    let shop = current_shop(db, session, inventory).await?;

    db.documents()
        .upsert_field(SHOPS_COLLECTION, &shop, &barcode, &record.to_value())
        .await?;
    info!(shop = %shop, barcode = %barcode, "Item saved");

    fetch_items(db, session, inventory).await
}

/// Deletes an item from the shop and from the local list.
pub async fn remove_item(
    db: &Database,
    session: &SessionState,
    inventory: &InventoryState,
    barcode: &str,
) -> ApiResult<()> {
    let shop = current_shop(db, session, inventory).await?;

    let removed = db
        .documents()
        .delete_field(SHOPS_COLLECTION, &shop, barcode)
        .await?;
    if removed {
        info!(shop = %shop, barcode = %barcode, "Item removed");
    } else {
        debug!(shop = %shop, barcode = %barcode, "Item was not stored");
    }

    inventory.remove_item(barcode).await;
    Ok(())
}

/// Converts a shop document into list items, skipping malformed fields.
pub fn items_from_document(document: &Document) -> Vec<InventoryItem> {
    document
        .iter()
        .filter_map(|(barcode, value)| match ItemRecord::from_field(barcode, value) {
            Ok(record) => Some(InventoryItem::from_record(barcode.clone(), record)),
            Err(e) => {
                warn!(barcode = %barcode, error = %e, "Skipping malformed item");
                None
            }
        })
        .collect()
}

async fn current_shop(
    db: &Database,
    session: &SessionState,
    inventory: &InventoryState,
) -> ApiResult<String> {
    match inventory.shop_name().await {
        Some(shop) => Ok(shop),
        None => fetch_shop_name(db, session, inventory).await,
    }
}
