use crate::models::device::CameraDevice;
use crate::models::error::ScanError;

/// Interface to the platform media-device layer.
///
/// Implemented by platform backends and by the scripted sim backend used
/// in tests.
pub trait MediaDevices: Send + Sync {
    /// List camera input devices in platform enumeration order.
    ///
    /// Labels may come back empty until the user has granted camera
    /// access at least once.
    fn enumerate(&self) -> Result<Vec<CameraDevice>, ScanError>;

    /// Open and immediately close a throwaway stream so the platform
    /// unlocks device labels for subsequent enumeration.
    fn request_permission(&self) -> Result<(), ScanError>;
}
