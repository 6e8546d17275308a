//! # Simulated Camera
//!
//! A [`CameraPlatform`] with no hardware behind it. Frames are pushed in
//! through a [`SimulatedCameraHandle`] and delivered to the decoder on a real
//! camera thread, so the threading of the capture pipeline is exercised
//! exactly as on a device.
//!
//! ## Wiring
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SimulatedCameraHandle                 SimulatedDevice                  │
//! │  ─────────────────────                 ───────────────                  │
//! │  scan("ean13", "0123…") ──► frames ──► camera thread                    │
//! │  push_frame(objects)        (std mpsc)   └─► FrameDecoder::on_frame()  │
//! │                                                                         │
//! │  set_device_present(false)  ─┐                                          │
//! │  fail_bind_input(fault)     ─┼──► shared state ◄── configure()         │
//! │  fail_attach_output(fault)  ─┘    acquired / released / targets         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use pricepal_core::Symbology;
use tracing::{debug, error};

use crate::decoder::FrameDecoder;
use crate::device::{CameraPlatform, CaptureDevice};
use crate::error::DeviceFault;
use crate::frame::{CodeType, MetadataObject};

/// Name reported by the simulated device.
pub const SIMULATED_DEVICE_NAME: &str = "Simulated Camera";

/// How often the camera thread checks its stop flag while idle.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

type Frame = Vec<MetadataObject>;

#[derive(Debug)]
struct SimState {
    device_present: bool,
    bind_fault: Option<DeviceFault>,
    attach_fault: Option<DeviceFault>,
    acquired: usize,
    released: usize,
    targets: Vec<Symbology>,
    streaming: bool,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<SimState>,
    frames: Mutex<Receiver<Frame>>,
    processed: AtomicU64,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// Platform
// =============================================================================

/// Camera platform backed by pushed frames.
#[derive(Debug)]
pub struct SimulatedCamera {
    shared: Arc<Shared>,
}

impl SimulatedCamera {
    /// Creates the platform and the handle that feeds and inspects it.
    pub fn new() -> (Self, SimulatedCameraHandle) {
        let (tx, rx) = mpsc::channel();
        let shared = Arc::new(Shared {
            state: Mutex::new(SimState {
                device_present: true,
                bind_fault: None,
                attach_fault: None,
                acquired: 0,
                released: 0,
                targets: Vec::new(),
                streaming: false,
            }),
            frames: Mutex::new(rx),
            processed: AtomicU64::new(0),
        });

        (
            Self {
                shared: shared.clone(),
            },
            SimulatedCameraHandle { shared, frames: tx },
        )
    }
}

impl CameraPlatform for SimulatedCamera {
    type Device = SimulatedDevice;

    fn default_video_device(&mut self) -> Option<SimulatedDevice> {
        let mut state = self.shared.state();
        if !state.device_present {
            return None;
        }
        state.acquired += 1;

        Some(SimulatedDevice {
            name: SIMULATED_DEVICE_NAME.to_string(),
            shared: self.shared.clone(),
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
            released: false,
        })
    }
}

// =============================================================================
// Device
// =============================================================================

/// A device acquired from [`SimulatedCamera`].
#[derive(Debug)]
pub struct SimulatedDevice {
    name: String,
    shared: Arc<Shared>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    released: bool,
}

impl CaptureDevice for SimulatedDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn bind_input(&mut self) -> Result<(), DeviceFault> {
        match self.shared.state().bind_fault.clone() {
            Some(fault) => Err(fault),
            None => Ok(()),
        }
    }

    fn attach_metadata_output(&mut self, targets: &[Symbology]) -> Result<(), DeviceFault> {
        let mut state = self.shared.state();
        if let Some(fault) = state.attach_fault.clone() {
            return Err(fault);
        }
        state.targets = targets.to_vec();
        Ok(())
    }

    fn start_running(&mut self, decoder: FrameDecoder) {
        if self.worker.is_some() {
            return;
        }

        self.stop.store(false, Ordering::Release);
        let stop = self.stop.clone();
        let shared = self.shared.clone();

        let spawned = std::thread::Builder::new()
            .name("pricepal-camera".to_string())
            .spawn(move || {
                debug!("Camera thread started");
                while !stop.load(Ordering::Acquire) {
                    let next = {
                        let frames = shared.frames.lock().unwrap_or_else(PoisonError::into_inner);
                        frames.recv_timeout(POLL_INTERVAL)
                    };

                    match next {
                        Ok(objects) => {
                            decoder.on_frame(&objects);
                            shared.processed.fetch_add(1, Ordering::AcqRel);
                        }
                        Err(RecvTimeoutError::Timeout) => continue,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                debug!("Camera thread exited");
            });

        match spawned {
            Ok(worker) => {
                self.worker = Some(worker);
                self.shared.state().streaming = true;
            }
            Err(e) => error!(error = %e, "Failed to spawn camera thread"),
        }
    }

    fn stop_running(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        self.stop.store(true, Ordering::Release);
        if worker.join().is_err() {
            error!("Camera thread panicked");
        }
        self.shared.state().streaming = false;
    }

    fn release(&mut self) {
        self.stop_running();
        if !self.released {
            self.released = true;
            self.shared.state().released += 1;
        }
    }
}

impl Drop for SimulatedDevice {
    fn drop(&mut self) {
        self.stop_running();
    }
}

// =============================================================================
// Handle
// =============================================================================

/// Feeds frames into a [`SimulatedCamera`] and controls its faults.
#[derive(Debug, Clone)]
pub struct SimulatedCameraHandle {
    shared: Arc<Shared>,
    frames: Sender<Frame>,
}

impl SimulatedCameraHandle {
    /// Delivers one frame to the camera thread.
    ///
    /// Returns `false` if the camera is not streaming; like a real sensor,
    /// a stopped camera does not see what is in front of it.
    pub fn push_frame(&self, objects: Vec<MetadataObject>) -> bool {
        if !self.is_streaming() {
            return false;
        }
        self.frames.send(objects).is_ok()
    }

    /// Shows a single decoded code to the camera.
    pub fn scan(&self, code_type: CodeType, value: impl Into<String>) -> bool {
        self.push_frame(vec![MetadataObject::code(code_type, value)])
    }

    pub fn set_device_present(&self, present: bool) {
        self.shared.state().device_present = present;
    }

    /// Makes subsequent `bind_input` calls fail with `fault` (`None` clears).
    pub fn fail_bind_input(&self, fault: Option<DeviceFault>) {
        self.shared.state().bind_fault = fault;
    }

    /// Makes subsequent metadata-stage attaches fail with `fault` (`None` clears).
    pub fn fail_attach_output(&self, fault: Option<DeviceFault>) {
        self.shared.state().attach_fault = fault;
    }

    /// Number of devices handed out.
    pub fn acquired(&self) -> usize {
        self.shared.state().acquired
    }

    /// Number of devices returned.
    pub fn released(&self) -> usize {
        self.shared.state().released
    }

    /// Decode targets of the most recently attached metadata stage.
    pub fn targets(&self) -> Vec<Symbology> {
        self.shared.state().targets.clone()
    }

    pub fn is_streaming(&self) -> bool {
        self.shared.state().streaming
    }

    /// Frames the camera thread has handed to the decoder.
    pub fn frames_processed(&self) -> u64 {
        self.shared.processed.load(Ordering::Acquire)
    }
}
