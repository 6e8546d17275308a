//! # Domain Types
//!
//! Core domain types used throughout PricePal.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  BarcodeSymbol  │   │   ScanResult    │   │   ItemRecord    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  value          │──►│  barcode        │◄──│  itemName       │       │
//! │  │  symbology      │   │  item_name      │   │  itemPrice      │       │
//! │  └─────────────────┘   │  item_price     │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │   Symbology     │   │   UserProfile   │                              │
//! │  │  EAN-8          │   │  email          │                              │
//! │  │  EAN-13         │   │  shopName       │                              │
//! │  │  Code128        │   └─────────────────┘                              │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Document Layout
//! Shop documents map barcode → item record. User documents hold a profile:
//! ```text
//! shops/Corner Market = { "012345678905": { "itemName": "Milk", "itemPrice": "1.99" } }
//! users/<uid>         = { "email": "owner@example.com", "shopName": "Corner Market" }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::{
    FIELD_EMAIL, FIELD_ITEM_NAME, FIELD_ITEM_PRICE, FIELD_SHOP_NAME, NO_SCAN_SENTINEL,
    UNKNOWN_ITEM_NAME, UNKNOWN_ITEM_PRICE,
};

// =============================================================================
// Symbology
// =============================================================================

/// Barcode encoding standards accepted by the scanner.
///
/// Only these three linear formats are decoded; anything else the camera
/// recognizes is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    Ean8,
    Ean13,
    Code128,
}

impl Symbology {
    /// Every supported symbology, in the order handed to the recognizer.
    pub const ALL: [Symbology; 3] = [Symbology::Ean8, Symbology::Ean13, Symbology::Code128];
}

impl std::fmt::Display for Symbology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbology::Ean8 => write!(f, "EAN-8"),
            Symbology::Ean13 => write!(f, "EAN-13"),
            Symbology::Code128 => write!(f, "Code128"),
        }
    }
}

impl std::str::FromStr for Symbology {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "ean8" => Ok(Symbology::Ean8),
            "ean13" => Ok(Symbology::Ean13),
            "code128" => Ok(Symbology::Code128),
            _ => Err(CoreError::UnsupportedSymbology(s.to_string())),
        }
    }
}

// =============================================================================
// Barcode Symbol
// =============================================================================

/// A decoded barcode: the string payload plus its symbology.
///
/// Immutable once produced by the frame decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BarcodeSymbol {
    value: String,
    symbology: Symbology,
}

impl BarcodeSymbol {
    /// Creates a symbol from a decoded value and its symbology.
    pub fn new(value: impl Into<String>, symbology: Symbology) -> Self {
        BarcodeSymbol {
            value: value.into(),
            symbology,
        }
    }

    /// The decoded string.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[inline]
    pub fn symbology(&self) -> Symbology {
        self.symbology
    }

    /// Consumes the symbol, returning the decoded string.
    pub fn into_value(self) -> String {
        self.value
    }
}

impl std::fmt::Display for BarcodeSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.value, self.symbology)
    }
}

// =============================================================================
// Item Record
// =============================================================================

/// A price record stored under a barcode field in a shop document.
///
/// Prices are kept exactly as the shop owner typed them (validated on write),
/// so the display never reformats a stored value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub item_name: String,
    pub item_price: String,
}

impl ItemRecord {
    pub fn new(item_name: impl Into<String>, item_price: impl Into<String>) -> Self {
        ItemRecord {
            item_name: item_name.into(),
            item_price: item_price.into(),
        }
    }

    /// Reads a record from a document field value.
    ///
    /// ## Returns
    /// * `Ok(ItemRecord)` - value is an object with string `itemName` and `itemPrice`
    /// * `Err(CoreError::MalformedField)` - anything else
    pub fn from_field(field: &str, value: &Value) -> CoreResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| CoreError::malformed(field, "expected an object"))?;

        let item_name = object
            .get(FIELD_ITEM_NAME)
            .and_then(Value::as_str)
            .ok_or_else(|| CoreError::malformed(field, "missing itemName"))?;

        let item_price = object
            .get(FIELD_ITEM_PRICE)
            .and_then(Value::as_str)
            .ok_or_else(|| CoreError::malformed(field, "missing itemPrice"))?;

        Ok(ItemRecord::new(item_name, item_price))
    }

    /// Converts the record into the JSON value stored in a shop document.
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert(FIELD_ITEM_NAME.to_string(), Value::String(self.item_name.clone()));
        object.insert(FIELD_ITEM_PRICE.to_string(), Value::String(self.item_price.clone()));
        Value::Object(object)
    }
}

/// A barcode with its record, as listed on the inventory screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub barcode: String,
    pub item_name: String,
    pub item_price: String,
}

impl InventoryItem {
    pub fn from_record(barcode: impl Into<String>, record: ItemRecord) -> Self {
        InventoryItem {
            barcode: barcode.into(),
            item_name: record.item_name,
            item_price: record.item_price,
        }
    }
}

// =============================================================================
// User Profile
// =============================================================================

/// Profile document stored for each account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub email: String,
    pub shop_name: String,
}

impl UserProfile {
    /// Reads a profile from a user document.
    ///
    /// Only `shopName` is mandatory; a missing email reads as empty.
    pub fn from_document(document: &Map<String, Value>) -> CoreResult<Self> {
        let shop_name = document
            .get(FIELD_SHOP_NAME)
            .and_then(Value::as_str)
            .ok_or_else(|| CoreError::malformed(FIELD_SHOP_NAME, "shop name not found for user"))?;

        let email = document
            .get(FIELD_EMAIL)
            .and_then(Value::as_str)
            .unwrap_or_default();

        Ok(UserProfile {
            email: email.to_string(),
            shop_name: shop_name.to_string(),
        })
    }

    /// Field/value pairs written into the user document.
    pub fn to_fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            (FIELD_EMAIL, Value::String(self.email.clone())),
            (FIELD_SHOP_NAME, Value::String(self.shop_name.clone())),
        ]
    }
}

// =============================================================================
// Scan Result
// =============================================================================

/// What the scanner screen displays for the current scan.
///
/// Every field starts at its sentinel and returns there on reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub barcode: String,
    pub item_name: String,
    pub item_price: String,
}

impl Default for ScanResult {
    fn default() -> Self {
        ScanResult {
            barcode: NO_SCAN_SENTINEL.to_string(),
            item_name: UNKNOWN_ITEM_NAME.to_string(),
            item_price: UNKNOWN_ITEM_PRICE.to_string(),
        }
    }
}

impl ScanResult {
    /// True while no barcode has been received since the last reset.
    pub fn is_awaiting_scan(&self) -> bool {
        self.barcode == NO_SCAN_SENTINEL
    }

    /// Puts name and price back to their sentinels, keeping the barcode.
    pub fn clear_lookup(&mut self) {
        self.item_name = UNKNOWN_ITEM_NAME.to_string();
        self.item_price = UNKNOWN_ITEM_PRICE.to_string();
    }

    /// Fills name and price from a resolved record.
    pub fn apply_record(&mut self, record: &ItemRecord) {
        self.item_name = record.item_name.clone();
        self.item_price = record.item_price.clone();
    }

    /// Returns every field to its sentinel.
    pub fn reset(&mut self) {
        *self = ScanResult::default();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
