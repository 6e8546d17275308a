//! # State Module
//!
//! Screen and session state owned by the application.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │  SessionState    │  │  InventoryState  │  │  ScannerScreen       │  │
//! │  │                  │  │                  │  │                      │  │
//! │  │  logged-in uid   │  │  shop name       │  │  BarcodeBinding      │  │
//! │  │  + email         │  │  item list       │  │  ScanResult          │  │
//! │  │                  │  │                  │  │  shop picker         │  │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • SessionState / InventoryState: Arc<RwLock<T>>, shared by commands   │
//! │  • ScannerScreen: owned by the UI task; it holds the receiving end     │
//! │    of the camera handoff, so only that task may drain it               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod inventory;
mod scanner;
mod session;

pub use inventory::{InventorySnapshot, InventoryState};
pub use scanner::{ScannerScreen, ScannerView};
pub use session::{Session, SessionState};
