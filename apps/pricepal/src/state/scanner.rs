//! # Scanner Screen
//!
//! Display state of the scanner view: the barcode binding fed by the
//! camera, the resolved item, and the shop picker.
//!
//! ## Display Fields
//! ```text
//! ┌───────────────────────────────┐
//! │  [ Corner Store        ▾ ]    │  ◄── selected_shop ("Select shop")
//! │                               │
//! │   012345678905                │  ◄── result.barcode  ("Barcode")
//! │   Whole Milk 1L               │  ◄── result.item_name ("Unknown item")
//! │   1.29                        │  ◄── result.item_price ("0")
//! │                               │
//! │        [ Scan Again ]         │  ◄── scan_again(): all back to sentinels
//! └───────────────────────────────┘
//! ```

use pricepal_core::{BarcodeSymbol, ScanResult, NO_SHOP_SELECTED};
use pricepal_scanner::BarcodeBinding;
use serde::Serialize;
use ts_rs::TS;

/// Serializable copy of what the scanner view renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ScannerView {
    pub result: ScanResult,
    pub shop_names: Vec<String>,
    pub selected_shop: String,
}

/// Scanner view state. Lives on the UI task.
#[derive(Debug)]
pub struct ScannerScreen {
    binding: BarcodeBinding,
    result: ScanResult,
    shop_names: Vec<String>,
    selected_shop: String,
}

impl ScannerScreen {
    pub fn new(binding: BarcodeBinding) -> Self {
        Self {
            binding,
            result: ScanResult::default(),
            shop_names: Vec::new(),
            selected_shop: NO_SHOP_SELECTED.to_string(),
        }
    }

    pub fn result(&self) -> &ScanResult {
        &self.result
    }

    pub(crate) fn result_mut(&mut self) -> &mut ScanResult {
        &mut self.result
    }

    pub fn shop_names(&self) -> &[String] {
        &self.shop_names
    }

    pub fn set_shop_names(&mut self, names: Vec<String>) {
        self.shop_names = names;
    }

    /// The picked shop, or `None` while the picker shows its placeholder.
    pub fn selected_shop(&self) -> Option<&str> {
        if self.selected_shop == NO_SHOP_SELECTED {
            None
        } else {
            Some(&self.selected_shop)
        }
    }

    pub fn select_shop(&mut self, name: impl Into<String>) {
        self.selected_shop = name.into();
    }

    pub fn binding(&self) -> &BarcodeBinding {
        &self.binding
    }

    pub fn binding_mut(&mut self) -> &mut BarcodeBinding {
        &mut self.binding
    }

    /// Shows a freshly scanned barcode.
    pub fn show_barcode(&mut self, symbol: &BarcodeSymbol) {
        self.result.barcode = symbol.value().to_string();
    }

    /// Puts barcode, name and price back to their sentinels and re-arms
    /// the scanner.
    pub fn scan_again(&mut self) {
        self.binding.reset();
        self.result.reset();
    }

    pub fn view(&self) -> ScannerView {
        ScannerView {
            result: self.result.clone(),
            shop_names: self.shop_names.clone(),
            selected_shop: self.selected_shop.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricepal_core::{ItemRecord, Symbology};
    use pricepal_scanner::{scan_channel, ReportPolicy};

    #[test]
    fn test_new_screen_shows_sentinels() {
        let (_reporter, binding) = scan_channel(ReportPolicy::AwaitReset);
        let screen = ScannerScreen::new(binding);

        let view = screen.view();
        assert_eq!(view.result, ScanResult::default());
        assert_eq!(view.selected_shop, "Select shop");
        assert_eq!(screen.selected_shop(), None);
    }

    #[test]
    fn test_scan_again_resets_everything() {
        let (reporter, binding) = scan_channel(ReportPolicy::AwaitReset);
        let mut screen = ScannerScreen::new(binding);
        screen.select_shop("Corner");

        let symbol = BarcodeSymbol::new("012345678905", Symbology::Ean13);
        reporter.report(symbol.clone());
        let received = screen.binding_mut().try_update().unwrap();
        screen.show_barcode(&received);
        screen
            .result_mut()
            .apply_record(&ItemRecord::new("Milk", "1.29"));
        assert!(!reporter.is_accepting());

        screen.scan_again();
        assert_eq!(screen.result(), &ScanResult::default());
        assert!(screen.binding().is_awaiting_scan());
        assert!(reporter.is_accepting());
        assert_eq!(screen.selected_shop(), Some("Corner"));
    }
}
