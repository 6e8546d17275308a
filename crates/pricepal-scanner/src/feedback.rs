//! # Scan Feedback
//!
//! The acknowledgment played when a frame yields a barcode (vibration on a
//! phone, a bell on a terminal). Runs on the camera thread, so
//! implementations must return quickly.

use std::io::Write;
use std::sync::Arc;

use pricepal_core::BarcodeSymbol;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Acknowledges a successful decode to the user.
pub trait ScanFeedback: Send + Sync {
    fn acknowledge(&self, symbol: &BarcodeSymbol);
}

/// No acknowledgment.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentFeedback;

impl ScanFeedback for SilentFeedback {
    fn acknowledge(&self, _symbol: &BarcodeSymbol) {}
}

/// Logs each acknowledged scan.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFeedback;

impl ScanFeedback for LogFeedback {
    fn acknowledge(&self, symbol: &BarcodeSymbol) {
        info!(barcode = %symbol.value(), symbology = %symbol.symbology(), "Scan acknowledged");
    }
}

/// Rings the terminal bell.
#[derive(Debug, Default, Clone, Copy)]
pub struct BellFeedback;

impl ScanFeedback for BellFeedback {
    fn acknowledge(&self, _symbol: &BarcodeSymbol) {
        let mut stderr = std::io::stderr();
        // A terminal that cannot ring is not a scan failure.
        let _ = stderr.write_all(b"\x07");
        let _ = stderr.flush();
    }
}

/// Feedback selected in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    None,
    #[default]
    Log,
    Bell,
}

impl FeedbackKind {
    /// Builds the feedback implementation for this kind.
    pub fn build(self) -> Arc<dyn ScanFeedback> {
        match self {
            FeedbackKind::None => Arc::new(SilentFeedback),
            FeedbackKind::Log => Arc::new(LogFeedback),
            FeedbackKind::Bell => Arc::new(BellFeedback),
        }
    }
}

impl std::fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedbackKind::None => write!(f, "none"),
            FeedbackKind::Log => write!(f, "log"),
            FeedbackKind::Bell => write!(f, "bell"),
        }
    }
}

impl std::str::FromStr for FeedbackKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "off" | "silent" => Ok(FeedbackKind::None),
            "log" => Ok(FeedbackKind::Log),
            "bell" | "beep" => Ok(FeedbackKind::Bell),
            other => Err(format!(
                "Unknown feedback: '{}'. Valid options: none, log, bell",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_kind_parsing() {
        assert_eq!("off".parse::<FeedbackKind>().unwrap(), FeedbackKind::None);
        assert_eq!("beep".parse::<FeedbackKind>().unwrap(), FeedbackKind::Bell);
        assert!("vibrate-loudly".parse::<FeedbackKind>().is_err());
    }
}
