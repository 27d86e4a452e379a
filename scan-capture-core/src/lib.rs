//! # scan-capture-core
//!
//! Platform-agnostic QR scan capture core library.
//!
//! Picks the environment-facing camera out of an ambiguous,
//! inconsistently-labeled device list, verifies opened streams against
//! their reported track metadata, falls back between decode engines when
//! nothing decodes within a bounded window, and keeps a deduplicated,
//! persisted scan history with CSV export. Platform backends implement
//! the `MediaDevices` and `DecodeBackend` traits and plug into the
//! generic `CameraController`.
//!
//! ## Architecture
//!
//! ```text
//! scan-capture-core (this crate)
//! ├── traits/   ← MediaDevices, DecodeBackend, ScanDelegate, LogStore
//! ├── models/   ← ScanError, SessionState, ScanConfiguration, CameraDevice, ScanRecord
//! ├── devices/  ← enumeration heuristics, source candidate builder
//! ├── session/  ← CameraController (state machine), EngineMode fallback
//! └── storage/  ← ScanStore, JSON log persistence, CSV export
//! ```

pub mod devices;
pub mod models;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use devices::candidates::Candidate;
pub use devices::enumerator::{enumerate_cameras, guess_back_index};
pub use models::config::{DecodeConfig, ScanConfiguration};
pub use models::device::{CameraDevice, CameraFacing, SourceConstraint, TrackInfo};
pub use models::error::ScanError;
pub use models::scan::{ScanRecord, ScanStats};
pub use models::state::SessionState;
pub use session::controller::CameraController;
pub use session::engine::EngineMode;
pub use storage::json_log::JsonFileLog;
pub use storage::memory::MemoryLog;
pub use storage::scan_store::ScanStore;
pub use traits::decode_backend::{ActiveCapture, DecodeBackend, DecodeCallback};
pub use traits::log_store::LogStore;
pub use traits::media_devices::MediaDevices;
pub use traits::scan_delegate::ScanDelegate;
