use thiserror::Error;

/// Errors that can occur while selecting a camera source, decoding, or
/// persisting scan history.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("device enumeration failed: {0}")]
    EnumerationFailed(String),

    #[error("failed to open capture: {0}")]
    OpenFailed(String),

    #[error("no camera available")]
    NoCameraAvailable,

    #[error("at least two cameras are required")]
    NotEnoughDevices,

    #[error("decode failed: {0}")]
    DecodeFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
