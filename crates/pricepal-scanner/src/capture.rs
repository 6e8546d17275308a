//! # Capture Session
//!
//! Owns the camera device and its pipeline stages for the lifetime of a
//! scanner view.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │           configure() ok            start()              stop()         │
//! │   ┌──────┐ ──────────► ┌─────────────┐ ──────► ┌─────────┐ ──────►     │
//! │   │ Idle │             │ Configuring │         │ Running │   ┌───────┐ │
//! │   └──────┘ ◄────────── └─────────────┘         └─────────┘   │Stopped│ │
//! │      ▲  configure() err                                      └───────┘ │
//! │      │                                                          │      │
//! │      │      start() from Idle/Stopped configures first          │      │
//! │      └──── stop() from any state ends in Stopped ◄──────────────┘      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The device and its stages live in one [`Pipeline`] value. Dropping it
//! stops frame delivery and releases the device, so a failed `configure()`,
//! a `stop()` and dropping the session all release the same way.

use std::sync::Arc;

use pricepal_core::Symbology;
use tracing::{debug, info, warn};

use crate::decoder::FrameDecoder;
use crate::device::{CameraPlatform, CaptureDevice};
use crate::error::{CaptureError, CaptureResult};
use crate::feedback::{LogFeedback, ScanFeedback};
use crate::reporter::ScanReporter;

/// Lifecycle state of a [`CaptureSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// Nothing acquired.
    Idle,
    /// Device bound and metadata stage attached, frames not flowing yet.
    Configuring,
    /// Frames are being delivered to the decoder.
    Running,
    /// Torn down; the device has been released.
    Stopped,
}

impl std::fmt::Display for CaptureState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureState::Idle => write!(f, "idle"),
            CaptureState::Configuring => write!(f, "configuring"),
            CaptureState::Running => write!(f, "running"),
            CaptureState::Stopped => write!(f, "stopped"),
        }
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// An acquired device with its input and output stages attached.
#[derive(Debug)]
pub struct Pipeline<D: CaptureDevice> {
    device: D,
    running: bool,
}

impl<D: CaptureDevice> Pipeline<D> {
    /// Binds `device` and attaches a metadata stage for `targets`.
    ///
    /// On error the partially assembled pipeline is dropped, which releases
    /// the device.
    fn assemble(device: D, targets: &[Symbology]) -> CaptureResult<Self> {
        let mut pipeline = Self {
            device,
            running: false,
        };

        pipeline
            .device
            .bind_input()
            .map_err(|fault| CaptureError::InputBindingFailed {
                device: pipeline.device.name().to_string(),
                fault,
            })?;

        pipeline
            .device
            .attach_metadata_output(targets)
            .map_err(|fault| CaptureError::OutputAttachFailed {
                device: pipeline.device.name().to_string(),
                fault,
            })?;

        Ok(pipeline)
    }

    fn start(&mut self, decoder: FrameDecoder) {
        if !self.running {
            self.device.start_running(decoder);
            self.running = true;
        }
    }

    pub fn device_name(&self) -> &str {
        self.device.name()
    }
}

impl<D: CaptureDevice> Drop for Pipeline<D> {
    fn drop(&mut self) {
        if self.running {
            self.device.stop_running();
            self.running = false;
        }
        self.device.release();
        debug!(device = %self.device.name(), "Capture device released");
    }
}

// =============================================================================
// Session
// =============================================================================

/// Camera lifecycle for one scanner view.
pub struct CaptureSession<P: CameraPlatform> {
    platform: P,
    state: CaptureState,
    pipeline: Option<Pipeline<P::Device>>,
    reporter: ScanReporter,
    feedback: Arc<dyn ScanFeedback>,
}

impl<P: CameraPlatform> std::fmt::Debug for CaptureSession<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSession")
            .field("state", &self.state)
            .field("device", &self.device_name())
            .finish_non_exhaustive()
    }
}

impl<P: CameraPlatform> CaptureSession<P> {
    /// Creates an idle session that reports through `reporter` and logs
    /// each acknowledged scan.
    pub fn new(platform: P, reporter: ScanReporter) -> Self {
        Self::with_feedback(platform, reporter, Arc::new(LogFeedback))
    }

    pub fn with_feedback(
        platform: P,
        reporter: ScanReporter,
        feedback: Arc<dyn ScanFeedback>,
    ) -> Self {
        Self {
            platform,
            state: CaptureState::Idle,
            pipeline: None,
            reporter,
            feedback,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == CaptureState::Running
    }

    /// Name of the acquired device, if one is held.
    pub fn device_name(&self) -> Option<&str> {
        self.pipeline.as_ref().map(Pipeline::device_name)
    }

    /// Acquires the default camera and assembles the pipeline.
    ///
    /// Does nothing if a pipeline is already assembled. On failure nothing
    /// stays acquired and the session is left `Idle`.
    pub fn configure(&mut self) -> CaptureResult<()> {
        if self.pipeline.is_some() {
            debug!(state = %self.state, "Capture already configured");
            return Ok(());
        }

        let Some(device) = self.platform.default_video_device() else {
            warn!("No video capture device available");
            self.state = CaptureState::Idle;
            return Err(CaptureError::DeviceUnavailable);
        };

        match Pipeline::assemble(device, &Symbology::ALL) {
            Ok(pipeline) => {
                info!(device = %pipeline.device_name(), "Capture session configured");
                self.pipeline = Some(pipeline);
                self.state = CaptureState::Configuring;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Capture configuration failed");
                self.state = CaptureState::Idle;
                Err(e)
            }
        }
    }

    /// Starts delivering frames to the decoder.
    ///
    /// From `Idle` or `Stopped` the session configures first and returns any
    /// configuration error. Already running is a no-op.
    pub fn start(&mut self) -> CaptureResult<()> {
        if self.state == CaptureState::Running {
            return Ok(());
        }

        self.configure()?;

        let decoder = FrameDecoder::new(self.reporter.clone(), self.feedback.clone());
        if let Some(pipeline) = self.pipeline.as_mut() {
            pipeline.start(decoder);
            info!(device = %pipeline.device_name(), "Capture session running");
        }
        self.state = CaptureState::Running;
        Ok(())
    }

    /// Stops capture and releases the device. Idempotent.
    pub fn stop(&mut self) {
        if self.state == CaptureState::Stopped && self.pipeline.is_none() {
            return;
        }

        let previous = self.state;
        // Dropping the pipeline stops frame delivery and releases the device.
        self.pipeline = None;
        self.state = CaptureState::Stopped;
        info!(from = %previous, "Capture session stopped");
    }
}

impl<P: CameraPlatform> Drop for CaptureSession<P> {
    fn drop(&mut self) {
        self.stop();
    }
}
