//! # pricepal-scanner: Barcode Capture-and-Report Pipeline
//!
//! Drives a camera, decodes at most one barcode per frame and hands it to
//! the UI context without ever blocking the camera thread.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌────────────────┐   frames    ┌──────────────┐  BarcodeSymbol        │
//! │  │ CaptureSession │ ──────────► │ FrameDecoder │ ───────┐               │
//! │  │ (owns device)  │  camera     │ first match  │        │               │
//! │  └────────────────┘  thread     └──────┬───────┘        ▼               │
//! │          ▲                             │        ┌──────────────┐        │
//! │          │ start()/stop()              │ beep   │ ScanReporter │        │
//! │          │                             ▼        └──────┬───────┘        │
//! │  ┌───────┴────────┐            ┌──────────────┐        │ mpsc          │
//! │  │ Scanner screen │ ◄───────── │BarcodeBinding│ ◄──────┘               │
//! │  │  (UI context)  │  changed() └──────────────┘                         │
//! │  └────────────────┘                                                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`capture`] - [`CaptureSession`] state machine and owned [`Pipeline`]
//! - [`device`] - Camera platform traits
//! - [`decoder`] - [`FrameDecoder`] first-match rule
//! - [`reporter`] - [`ScanReporter`] / [`BarcodeBinding`] handoff
//! - [`feedback`] - Scan acknowledgment (log, bell)
//! - [`frame`] - Frame metadata objects
//! - [`simulated`] - Hardware-free camera for tests and the scan station
//!
//! ## Example Usage
//!
//! ```rust
//! use pricepal_scanner::{
//!     scan_channel, CaptureSession, CaptureState, ReportPolicy, SimulatedCamera,
//! };
//!
//! let (camera, _feed) = SimulatedCamera::new();
//! let (reporter, binding) = scan_channel(ReportPolicy::AwaitReset);
//! let mut session = CaptureSession::new(camera, reporter);
//!
//! session.start().unwrap();
//! assert_eq!(session.state(), CaptureState::Running);
//! assert!(binding.is_awaiting_scan());
//!
//! session.stop();
//! assert_eq!(session.state(), CaptureState::Stopped);
//! ```

pub mod capture;
pub mod decoder;
pub mod device;
pub mod error;
pub mod feedback;
pub mod frame;
pub mod reporter;
pub mod simulated;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use capture::{CaptureSession, CaptureState, Pipeline};
pub use decoder::FrameDecoder;
pub use device::{CameraPlatform, CaptureDevice};
pub use error::{CaptureError, CaptureResult, DeviceFault};
pub use feedback::{BellFeedback, FeedbackKind, LogFeedback, ScanFeedback, SilentFeedback};
pub use frame::{CodeType, MetadataObject};
pub use reporter::{scan_channel, BarcodeBinding, ReportPolicy, ScanReporter};
pub use simulated::{SimulatedCamera, SimulatedCameraHandle, SimulatedDevice};
