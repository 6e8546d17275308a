//! # Scan Reporter
//!
//! Hands decoded barcodes from the camera thread to the UI context.
//!
//! ## Handoff
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Camera thread → UI context                          │
//! │                                                                         │
//! │  camera thread                          UI update turn                  │
//! │  ─────────────                          ──────────────                  │
//! │  FrameDecoder                                                           │
//! │       │ report(symbol)                                                  │
//! │       ▼                                                                 │
//! │  ScanReporter ──► unbounded mpsc (FIFO) ──► BarcodeBinding             │
//! │       ▲              never blocks the           │ changed()/try_update │
//! │       │              sender                     ▼                       │
//! │       │                                   value = "012345678905"       │
//! │       │                                         │                       │
//! │       └────────── armed flag ◄──── reset() ─────┘                       │
//! │                                   value = "Barcode"                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Report Policy
//! With [`ReportPolicy::AwaitReset`] the reporter forwards one barcode and then
//! stays disarmed until the UI calls [`BarcodeBinding::reset`], so at most one
//! symbol is in flight per scan. [`ReportPolicy::EveryFrame`] forwards every
//! decoded frame.
//!
//! ## Generations
//! The armed flag and a generation number share one atomic word. Every reset
//! starts a new generation, and each report carries the generation it was
//! claimed in. A report claimed before a reset but queued after it arrives
//! stamped with the old generation and is dropped on the UI side, so the
//! dismissed barcode never reappears and the re-armed latch stays open.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use pricepal_core::{BarcodeSymbol, NO_SCAN_SENTINEL};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Whether the reporter waits for a reset between reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPolicy {
    /// One report per scan session; further decodes are dropped until reset.
    #[default]
    AwaitReset,

    /// Every decoded frame is forwarded.
    EveryFrame,
}

impl std::fmt::Display for ReportPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportPolicy::AwaitReset => write!(f, "await_reset"),
            ReportPolicy::EveryFrame => write!(f, "every_frame"),
        }
    }
}

impl std::str::FromStr for ReportPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "await_reset" | "latch" => Ok(ReportPolicy::AwaitReset),
            "every_frame" | "continuous" => Ok(ReportPolicy::EveryFrame),
            other => Err(format!(
                "Unknown report policy: '{}'. Valid options: await_reset, every_frame",
                other
            )),
        }
    }
}

/// Low bit of the latch word: set while the reporter may claim a report.
const ARMED: u64 = 1;

fn generation_of(word: u64) -> u64 {
    word >> 1
}

/// Creates a connected reporter/binding pair.
///
/// The reporter goes to the capture session (and from there to the camera
/// thread); the binding stays with the screen that displays the barcode.
pub fn scan_channel(policy: ReportPolicy) -> (ScanReporter, BarcodeBinding) {
    let (tx, rx) = mpsc::unbounded_channel();
    let latch = Arc::new(AtomicU64::new(ARMED));

    let reporter = ScanReporter {
        tx,
        latch: latch.clone(),
        policy,
    };

    let binding = BarcodeBinding {
        rx,
        latch,
        generation: 0,
        value: NO_SCAN_SENTINEL.to_string(),
        delivered: 0,
    };

    (reporter, binding)
}

// =============================================================================
// Reporter (camera side)
// =============================================================================

/// Camera-side end of the handoff.
#[derive(Debug, Clone)]
pub struct ScanReporter {
    tx: mpsc::UnboundedSender<(u64, BarcodeSymbol)>,
    latch: Arc<AtomicU64>,
    policy: ReportPolicy,
}

impl ScanReporter {
    pub fn policy(&self) -> ReportPolicy {
        self.policy
    }

    /// True if a report made now would reach the UI.
    ///
    /// Only the camera thread disarms the reporter, so a `true` observed there
    /// stays valid until its own next `report`.
    pub fn is_accepting(&self) -> bool {
        if self.tx.is_closed() {
            return false;
        }

        match self.policy {
            ReportPolicy::EveryFrame => true,
            ReportPolicy::AwaitReset => self.latch.load(Ordering::Acquire) & ARMED != 0,
        }
    }

    /// Queues a symbol for the UI without blocking.
    ///
    /// ## Returns
    /// * `true` - the symbol was queued
    /// * `false` - dropped: awaiting reset, or the binding is gone
    pub fn report(&self, symbol: BarcodeSymbol) -> bool {
        match self.claim() {
            Some(generation) => self.deliver(generation, symbol),
            None => {
                trace!(barcode = %symbol.value(), "Report dropped: awaiting reset");
                false
            }
        }
    }

    /// Takes the right to report in the current generation.
    ///
    /// Under `AwaitReset` this clears the armed bit; `None` means it was
    /// already clear.
    fn claim(&self) -> Option<u64> {
        match self.policy {
            ReportPolicy::EveryFrame => Some(generation_of(self.latch.load(Ordering::Acquire))),
            ReportPolicy::AwaitReset => self
                .latch
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |word| {
                    (word & ARMED != 0).then_some(word & !ARMED)
                })
                .ok()
                .map(generation_of),
        }
    }

    fn deliver(&self, generation: u64, symbol: BarcodeSymbol) -> bool {
        match self.tx.send((generation, symbol)) {
            Ok(()) => true,
            Err(mpsc::error::SendError((_, symbol))) => {
                debug!(barcode = %symbol.value(), "Report dropped: binding closed");
                false
            }
        }
    }
}

// =============================================================================
// Binding (UI side)
// =============================================================================

/// UI-side end of the handoff: the "current scanned barcode" value.
///
/// Holds the `"Barcode"` sentinel until a report is applied. The host writes
/// the sentinel back (via [`reset`](Self::reset) or [`set`](Self::set)) to
/// ask for a new scan.
#[derive(Debug)]
pub struct BarcodeBinding {
    rx: mpsc::UnboundedReceiver<(u64, BarcodeSymbol)>,
    latch: Arc<AtomicU64>,
    generation: u64,
    value: String,
    delivered: u64,
}

impl BarcodeBinding {
    /// The current barcode string (or the sentinel).
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_awaiting_scan(&self) -> bool {
        self.value == NO_SCAN_SENTINEL
    }

    /// Number of reports applied since creation.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Restores the sentinel and re-arms the reporter.
    ///
    /// Reports claimed before the reset are discarded, whether already queued
    /// or still on their way, so they cannot trigger a lookup for a barcode
    /// the user already dismissed.
    pub fn reset(&mut self) {
        let mut discarded = 0usize;
        while self.rx.try_recv().is_ok() {
            discarded += 1;
        }
        if discarded > 0 {
            debug!(discarded, "Discarded stale reports on reset");
        }

        // Drain first: anything queued after this point is either stamped
        // with the old generation or claimed in the new one.
        self.generation += 1;
        self.value = NO_SCAN_SENTINEL.to_string();
        self.latch
            .store((self.generation << 1) | ARMED, Ordering::Release);
    }

    /// Host-side write. Writing the sentinel is a reset.
    pub fn set(&mut self, value: impl Into<String>) {
        let value = value.into();
        if value == NO_SCAN_SENTINEL {
            self.reset();
        } else {
            self.value = value;
        }
    }

    /// Applies the next queued report, if any. Call on the UI update turn.
    pub fn try_update(&mut self) -> Option<BarcodeSymbol> {
        loop {
            let (generation, symbol) = self.rx.try_recv().ok()?;
            if let Some(symbol) = self.apply(generation, symbol) {
                return Some(symbol);
            }
        }
    }

    /// Waits for the next report and applies it.
    ///
    /// Returns `None` once every reporter has been dropped.
    pub async fn changed(&mut self) -> Option<BarcodeSymbol> {
        loop {
            let (generation, symbol) = self.rx.recv().await?;
            if let Some(symbol) = self.apply(generation, symbol) {
                return Some(symbol);
            }
        }
    }

    fn apply(&mut self, generation: u64, symbol: BarcodeSymbol) -> Option<BarcodeSymbol> {
        if generation != self.generation {
            debug!(
                barcode = %symbol.value(),
                stamped = generation,
                current = self.generation,
                "Dropped report claimed before reset"
            );
            return None;
        }

        self.value = symbol.value().to_string();
        self.delivered += 1;
        Some(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricepal_core::Symbology;

    fn ean13(value: &str) -> BarcodeSymbol {
        BarcodeSymbol::new(value, Symbology::Ean13)
    }

    #[test]
    fn test_reset_then_report_then_reset() {
        let (reporter, mut binding) = scan_channel(ReportPolicy::AwaitReset);

        binding.reset();
        assert!(reporter.report(ean13("012345678905")));
        assert_eq!(binding.try_update(), Some(ean13("012345678905")));
        assert_eq!(binding.value(), "012345678905");

        binding.reset();
        assert_eq!(binding.value(), "Barcode");
        assert!(binding.is_awaiting_scan());
    }

    #[test]
    fn test_await_reset_drops_second_report() {
        let (reporter, mut binding) = scan_channel(ReportPolicy::AwaitReset);

        assert!(reporter.report(ean13("012345678905")));
        assert!(!reporter.is_accepting());
        assert!(!reporter.report(ean13("4006381333931")));

        assert_eq!(binding.try_update(), Some(ean13("012345678905")));
        assert_eq!(binding.try_update(), None);

        binding.reset();
        assert!(reporter.is_accepting());
        assert!(reporter.report(ean13("4006381333931")));
        assert_eq!(binding.try_update().unwrap().value(), "4006381333931");
    }

    #[test]
    fn test_every_frame_preserves_order() {
        let (reporter, mut binding) = scan_channel(ReportPolicy::EveryFrame);

        for value in ["1", "2", "3"] {
            assert!(reporter.report(BarcodeSymbol::new(value, Symbology::Code128)));
        }

        let seen: Vec<String> = std::iter::from_fn(|| binding.try_update())
            .map(BarcodeSymbol::into_value)
            .collect();
        assert_eq!(seen, vec!["1", "2", "3"]);
        assert_eq!(binding.delivered(), 3);
        assert_eq!(binding.value(), "3");
    }

    #[test]
    fn test_reset_discards_queued_reports() {
        let (reporter, mut binding) = scan_channel(ReportPolicy::EveryFrame);
        reporter.report(ean13("012345678905"));
        reporter.report(ean13("012345678905"));

        binding.reset();
        assert_eq!(binding.try_update(), None);
        assert_eq!(binding.value(), "Barcode");
    }

    #[test]
    fn test_host_writing_sentinel_rearms() {
        let (reporter, mut binding) = scan_channel(ReportPolicy::AwaitReset);
        reporter.report(ean13("012345678905"));
        binding.try_update();
        assert!(!reporter.is_accepting());

        binding.set("Barcode");
        assert!(reporter.is_accepting());
    }

    #[test]
    fn test_report_claimed_before_reset_is_dropped() {
        let (reporter, mut binding) = scan_channel(ReportPolicy::AwaitReset);

        // Camera claims the latch, then the user resets before the send lands.
        let generation = reporter.claim().unwrap();
        binding.reset();
        assert!(reporter.deliver(generation, ean13("012345678905")));

        assert_eq!(binding.try_update(), None);
        assert_eq!(binding.value(), "Barcode");
        assert_eq!(binding.delivered(), 0);

        // The reset left the latch open for exactly one new report.
        assert!(reporter.is_accepting());
        assert!(reporter.report(ean13("4006381333931")));
        assert!(!reporter.report(ean13("5449000000996")));
        assert_eq!(binding.try_update(), Some(ean13("4006381333931")));
        assert_eq!(binding.try_update(), None);
        assert_eq!(binding.delivered(), 1);
    }

    #[test]
    fn test_every_frame_drops_frames_claimed_before_reset() {
        let (reporter, mut binding) = scan_channel(ReportPolicy::EveryFrame);

        let generation = reporter.claim().unwrap();
        binding.reset();
        reporter.deliver(generation, ean13("012345678905"));
        reporter.report(ean13("4006381333931"));

        assert_eq!(binding.try_update(), Some(ean13("4006381333931")));
        assert_eq!(binding.try_update(), None);
    }

    #[tokio::test]
    async fn test_changed_skips_stale_reports() {
        let (reporter, mut binding) = scan_channel(ReportPolicy::AwaitReset);

        let generation = reporter.claim().unwrap();
        binding.reset();
        reporter.deliver(generation, ean13("012345678905"));
        reporter.report(ean13("4006381333931"));

        assert_eq!(binding.changed().await, Some(ean13("4006381333931")));
        assert_eq!(binding.value(), "4006381333931");
    }

    #[test]
    fn test_report_after_binding_dropped() {
        let (reporter, binding) = scan_channel(ReportPolicy::EveryFrame);
        drop(binding);
        assert!(!reporter.is_accepting());
        assert!(!reporter.report(ean13("012345678905")));
    }

    #[tokio::test]
    async fn test_changed_ends_when_reporters_dropped() {
        let (reporter, mut binding) = scan_channel(ReportPolicy::EveryFrame);

        let camera = std::thread::spawn(move || {
            reporter.report(ean13("012345678905"));
        });
        camera.join().unwrap();

        assert_eq!(binding.changed().await, Some(ean13("012345678905")));
        assert_eq!(binding.changed().await, None);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "every-frame".parse::<ReportPolicy>().unwrap(),
            ReportPolicy::EveryFrame
        );
        assert_eq!(
            "await_reset".parse::<ReportPolicy>().unwrap(),
            ReportPolicy::AwaitReset
        );
        assert!("sometimes".parse::<ReportPolicy>().is_err());
    }
}
