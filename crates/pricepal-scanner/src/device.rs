//! # Camera Platform Abstraction
//!
//! The capture session drives a camera through these two traits. A real
//! platform binding and [`SimulatedCamera`](crate::SimulatedCamera) both
//! implement them.
//!
//! ## Device Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  default_video_device() ──► bind_input() ──► attach_metadata_output()  │
//! │                                                      │                  │
//! │                                                      ▼                  │
//! │                                 start_running(decoder)                  │
//! │                                   frames → decoder.on_frame()           │
//! │                                   (camera thread)                       │
//! │                                                      │                  │
//! │                                                      ▼                  │
//! │                                 stop_running() ──► release()           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pricepal_core::Symbology;

use crate::decoder::FrameDecoder;
use crate::error::DeviceFault;

/// Source of capture devices.
pub trait CameraPlatform: Send {
    type Device: CaptureDevice;

    /// Acquires the default video device, or `None` if there is none.
    fn default_video_device(&mut self) -> Option<Self::Device>;
}

/// One acquired video capture device.
///
/// The session calls these methods in lifecycle order and always ends with
/// [`release`](Self::release), including after a failed assembly.
pub trait CaptureDevice: Send {
    /// Human-readable device name, used in errors and logs.
    fn name(&self) -> &str;

    /// Binds the device as the pipeline's input.
    fn bind_input(&mut self) -> Result<(), DeviceFault>;

    /// Attaches a metadata-recognition stage restricted to `targets`.
    fn attach_metadata_output(&mut self, targets: &[Symbology]) -> Result<(), DeviceFault>;

    /// Begins delivering frames to `decoder` on the device's own thread.
    fn start_running(&mut self, decoder: FrameDecoder);

    /// Stops frame delivery. No callback may run after this returns.
    fn stop_running(&mut self);

    /// Returns the device to the platform.
    fn release(&mut self);
}
