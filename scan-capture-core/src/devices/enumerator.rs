//! Camera discovery and the back-camera heuristic.
//!
//! Some platforms hide device labels until the page has held a stream at
//! least once, so enumeration may need a one-time permission probe before
//! labels become useful.

use crate::models::device::{CameraDevice, CameraFacing};
use crate::models::error::ScanError;
use crate::traits::media_devices::MediaDevices;

/// Enumerate camera devices.
///
/// If the initial list is empty or every label is empty, request camera
/// access once (this unlocks labels) and enumerate again. A failed
/// permission probe keeps whatever the first pass returned.
pub fn enumerate_cameras<M: MediaDevices + ?Sized>(
    media: &M,
) -> Result<Vec<CameraDevice>, ScanError> {
    let devices = media.enumerate()?;

    let labels_hidden = devices.iter().all(|d| d.label.is_empty());
    if !devices.is_empty() && !labels_hidden {
        return Ok(devices);
    }

    if let Err(e) = media.request_permission() {
        log::warn!("camera permission probe failed: {e}");
        return Ok(devices);
    }

    media.enumerate()
}

/// Index of the device most likely to be the environment-facing camera.
///
/// Prefers the first label matching the back/rear/environment pattern.
/// With two or more devices and no match, falls back to the last index
/// (rear cameras are commonly enumerated last); otherwise 0.
pub fn guess_back_index(devices: &[CameraDevice]) -> usize {
    if let Some(index) = devices
        .iter()
        .position(|d| d.facing() == CameraFacing::Environment)
    {
        return index;
    }
    if devices.len() >= 2 {
        devices.len() - 1
    } else {
        0
    }
}
