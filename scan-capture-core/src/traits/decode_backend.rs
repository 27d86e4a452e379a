use std::sync::Arc;

use crate::models::config::DecodeConfig;
use crate::models::device::{SourceConstraint, TrackInfo};
use crate::models::error::ScanError;

/// Callback invoked for every successful frame decode.
///
/// The payload is the decoded text. Frames that contain no code simply do
/// not invoke the callback; per-frame decode failures are expected and
/// carry no error.
pub type DecodeCallback = Arc<dyn Fn(&str) + Send + Sync + 'static>;

/// Interface for a decode backend: something that can open a camera
/// stream under a constraint and report decoded payloads per frame.
///
/// The session controller is agnostic to which concrete engine satisfies
/// this; `DecodeConfig::use_native_detector` tells the backend which of
/// its engines to prefer.
pub trait DecodeBackend: Send + Sync {
    /// Open a capture for `constraint`, delivering decodes via `on_decode`.
    ///
    /// The callback may fire on a backend-owned thread; keep processing
    /// minimal.
    fn open(
        &self,
        constraint: &SourceConstraint,
        config: &DecodeConfig,
        on_decode: DecodeCallback,
    ) -> Result<Box<dyn ActiveCapture>, ScanError>;

    /// Decode a single still image to text.
    fn decode_image(&self, image: &[u8]) -> Result<String, ScanError>;
}

/// A live capture opened by a [`DecodeBackend`].
pub trait ActiveCapture: Send {
    /// Settings reported by the opened track, used for post-open
    /// verification.
    fn track_info(&self) -> TrackInfo;

    /// Stop the stream and release the device.
    fn stop(&mut self) -> Result<(), ScanError>;
}
