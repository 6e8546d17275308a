//! # Inventory State
//!
//! The item list shown on the inventory screen for the user's shop.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Inventory State Operations                           │
//! │                                                                         │
//! │  Host Action              Command                 State Change          │
//! │  ───────────              ───────                 ────────────          │
//! │                                                                         │
//! │  Open screen ────────────► fetch_shop_name() ───► shop_name = Some(..) │
//! │                  ────────► fetch_items() ───────► items = sorted list  │
//! │                                                                         │
//! │  Submit form ────────────► add_item() ──────────► items refreshed      │
//! │                                                                         │
//! │  Swipe delete ───────────► remove_item() ───────► items.remove(i)      │
//! │                                                                         │
//! │  Log out ────────────────► logout() ────────────► cleared              │
//! │  Switch user ────────────► login()/register() ──► cleared              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use pricepal_core::InventoryItem;
use serde::Serialize;
use tokio::sync::RwLock;
use ts_rs::TS;

/// What the inventory screen renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventorySnapshot {
    pub shop_name: Option<String>,
    /// Sorted by barcode.
    pub items: Vec<InventoryItem>,
}

/// Shared inventory screen state.
#[derive(Debug, Clone, Default)]
pub struct InventoryState {
    inner: Arc<RwLock<InventorySnapshot>>,
}

impl InventoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> InventorySnapshot {
        self.inner.read().await.clone()
    }

    pub async fn shop_name(&self) -> Option<String> {
        self.inner.read().await.shop_name.clone()
    }

    pub async fn set_shop_name(&self, shop_name: String) {
        self.inner.write().await.shop_name = Some(shop_name);
    }

    /// Replaces the list, ordering it by barcode.
    pub async fn replace_items(&self, mut items: Vec<InventoryItem>) -> Vec<InventoryItem> {
        items.sort_by(|a, b| a.barcode.cmp(&b.barcode));
        self.inner.write().await.items = items.clone();
        items
    }

    /// Removes an item from the local list.
    ///
    /// ## Returns
    /// `true` if an item with that barcode was listed.
    pub async fn remove_item(&self, barcode: &str) -> bool {
        let mut inner = self.inner.write().await;
        let before = inner.items.len();
        inner.items.retain(|item| item.barcode != barcode);
        inner.items.len() != before
    }

    pub async fn clear(&self) {
        *self.inner.write().await = InventorySnapshot::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricepal_core::ItemRecord;

    fn item(barcode: &str) -> InventoryItem {
        InventoryItem::from_record(barcode, ItemRecord::new("Thing", "1"))
    }

    #[tokio::test]
    async fn test_items_sorted_and_removed() {
        let state = InventoryState::new();
        let sorted = state
            .replace_items(vec![item("300"), item("100"), item("200")])
            .await;
        let barcodes: Vec<_> = sorted.iter().map(|i| i.barcode.as_str()).collect();
        assert_eq!(barcodes, vec!["100", "200", "300"]);

        assert!(state.remove_item("200").await);
        assert!(!state.remove_item("200").await);
        assert_eq!(state.snapshot().await.items.len(), 2);
    }

    #[tokio::test]
    async fn test_clear() {
        let state = InventoryState::new();
        state.set_shop_name("Corner".into()).await;
        state.replace_items(vec![item("1")]).await;

        state.clear().await;
        assert_eq!(state.snapshot().await, InventorySnapshot::default());
    }
}
