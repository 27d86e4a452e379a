//! # scan-capture-sim
//!
//! Scriptable in-process backend for scan-capture-core.
//!
//! Provides:
//! - `SimMediaDevices`: scripted device lists, with optional hidden
//!   labels and enumeration failures
//! - `SimDecodeBackend`: per-constraint scripted open outcomes plus a
//!   test hook to emit decoded payloads into the live capture
//!
//! Useful for development without camera hardware and for integration
//! tests of the session state machine.
//!
//! ## Usage
//! ```ignore
//! use scan_capture_core::{CameraController, CameraDevice, MemoryLog, ScanConfiguration};
//! use scan_capture_sim::{OpenOutcome, SimDecodeBackend, SimMediaDevices};
//!
//! let media = SimMediaDevices::new(vec![CameraDevice::new("back", "Back Camera")]);
//! let backend = SimDecodeBackend::new();
//! backend.set_default_open(OpenOutcome::opened("Back Camera"));
//!
//! let controller = CameraController::new(
//!     backend.clone(),
//!     media,
//!     Box::new(MemoryLog::new()),
//!     ScanConfiguration::default(),
//! )
//! .unwrap();
//! controller.start().unwrap();
//! backend.emit("payload");
//! ```

pub mod backend;
pub mod media;

pub use backend::{OpenOutcome, SimDecodeBackend};
pub use media::SimMediaDevices;
