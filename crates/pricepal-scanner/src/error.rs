//! # Capture Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    configure() failure points                           │
//! │                                                                         │
//! │  default_video_device() ── None ─────────► DeviceUnavailable           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  bind_input() ──────────── DeviceFault ──► InputBindingFailed          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  attach_metadata_output() ─ DeviceFault ─► OutputAttachFailed          │
//! │                                                                         │
//! │  Every failure releases what was acquired; the session stays Idle.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for capture operations.
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Fault reported by a camera platform while assembling a pipeline.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeviceFault {
    /// The user (or OS policy) has not granted camera access.
    #[error("camera permission denied")]
    PermissionDenied,

    /// Another client holds the device.
    #[error("device is busy")]
    Busy,

    /// The pipeline refused the stage.
    #[error("stage rejected: {0}")]
    Rejected(String),
}

/// Errors raised by [`CaptureSession::configure`](crate::CaptureSession::configure).
///
/// All are terminal for that call and never retried automatically.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaptureError {
    /// No video capture device is present.
    #[error("No video capture device available")]
    DeviceUnavailable,

    /// The device could not be bound as a pipeline input.
    #[error("Failed to bind {device} as input: {fault}")]
    InputBindingFailed { device: String, fault: DeviceFault },

    /// The metadata-recognition stage could not be attached.
    #[error("Failed to attach metadata output to {device}: {fault}")]
    OutputAttachFailed { device: String, fault: DeviceFault },
}
