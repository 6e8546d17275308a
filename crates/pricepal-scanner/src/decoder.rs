//! # Frame Decoder
//!
//! Turns one frame's metadata into at most one barcode.
//!
//! ## First-Match Rule
//! ```text
//! frame objects:  [ Face, QR "https://…", EAN-13 "012345678905", Code128 "ABC123" ]
//!                    ✗        ✗ (unsupported)  ✓ ◄── reported          (ignored)
//! ```
//!
//! The first object that is a machine-readable code of a supported
//! symbology with a non-empty value wins. Everything after it is ignored.

use std::sync::Arc;

use pricepal_core::BarcodeSymbol;
use tracing::debug;

use crate::feedback::ScanFeedback;
use crate::frame::MetadataObject;
use crate::reporter::ScanReporter;

/// Per-frame callback installed on a running capture device.
#[derive(Clone)]
pub struct FrameDecoder {
    reporter: ScanReporter,
    feedback: Arc<dyn ScanFeedback>,
}

impl std::fmt::Debug for FrameDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameDecoder")
            .field("reporter", &self.reporter)
            .finish_non_exhaustive()
    }
}

impl FrameDecoder {
    pub fn new(reporter: ScanReporter, feedback: Arc<dyn ScanFeedback>) -> Self {
        Self { reporter, feedback }
    }

    /// Picks the barcode a frame yields, without side effects.
    pub fn decode(objects: &[MetadataObject]) -> Option<BarcodeSymbol> {
        objects.iter().find_map(|object| match object {
            MetadataObject::MachineReadableCode {
                code_type,
                value: Some(value),
            } if !value.is_empty() => code_type
                .symbology()
                .map(|symbology| BarcodeSymbol::new(value.clone(), symbology)),
            _ => None,
        })
    }

    /// Handles one frame: decode, acknowledge, report.
    ///
    /// Feedback plays only when the report will be accepted, so a user is
    /// never told about a scan the screen then ignores.
    ///
    /// ## Returns
    /// The symbol that was reported, if any.
    pub fn on_frame(&self, objects: &[MetadataObject]) -> Option<BarcodeSymbol> {
        let symbol = Self::decode(objects)?;

        if !self.reporter.is_accepting() {
            return None;
        }

        self.feedback.acknowledge(&symbol);
        debug!(barcode = %symbol.value(), symbology = %symbol.symbology(), "Barcode decoded");

        if self.reporter.report(symbol.clone()) {
            Some(symbol)
        } else {
            None
        }
    }
}
