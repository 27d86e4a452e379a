//! Scripted media-device layer.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use scan_capture_core::{CameraDevice, MediaDevices, ScanError};

struct MediaInner {
    devices: Mutex<Vec<CameraDevice>>,
    /// Labels come back empty until a permission probe, as on platforms
    /// that hide device names from unauthorized pages.
    labels_locked: AtomicBool,
    fail_enumeration: AtomicBool,
    deny_permission: AtomicBool,
    permission_probes: AtomicUsize,
}

/// Scripted implementation of [`MediaDevices`].
///
/// Clones share state, so a test can keep a handle after moving one clone
/// into the controller.
#[derive(Clone)]
pub struct SimMediaDevices {
    inner: Arc<MediaInner>,
}

impl SimMediaDevices {
    pub fn new(devices: Vec<CameraDevice>) -> Self {
        Self {
            inner: Arc::new(MediaInner {
                devices: Mutex::new(devices),
                labels_locked: AtomicBool::new(false),
                fail_enumeration: AtomicBool::new(false),
                deny_permission: AtomicBool::new(false),
                permission_probes: AtomicUsize::new(0),
            }),
        }
    }

    /// Hide labels until a permission probe succeeds.
    pub fn with_locked_labels(self) -> Self {
        self.inner.labels_locked.store(true, Ordering::SeqCst);
        self
    }

    /// Make every enumeration fail.
    pub fn with_failing_enumeration(self) -> Self {
        self.inner.fail_enumeration.store(true, Ordering::SeqCst);
        self
    }

    /// Make permission probes fail.
    pub fn with_denied_permission(self) -> Self {
        self.inner.deny_permission.store(true, Ordering::SeqCst);
        self
    }

    pub fn set_devices(&self, devices: Vec<CameraDevice>) {
        *self.inner.devices.lock() = devices;
    }

    /// Number of permission probes seen so far.
    pub fn permission_probes(&self) -> usize {
        self.inner.permission_probes.load(Ordering::SeqCst)
    }
}

impl MediaDevices for SimMediaDevices {
    fn enumerate(&self) -> Result<Vec<CameraDevice>, ScanError> {
        if self.inner.fail_enumeration.load(Ordering::SeqCst) {
            return Err(ScanError::EnumerationFailed("scripted failure".into()));
        }
        let devices = self.inner.devices.lock().clone();
        if self.inner.labels_locked.load(Ordering::SeqCst) {
            return Ok(devices
                .into_iter()
                .map(|d| CameraDevice::new(d.id, ""))
                .collect());
        }
        Ok(devices)
    }

    fn request_permission(&self) -> Result<(), ScanError> {
        self.inner.permission_probes.fetch_add(1, Ordering::SeqCst);
        if self.inner.deny_permission.load(Ordering::SeqCst) {
            return Err(ScanError::PermissionDenied);
        }
        self.inner.labels_locked.store(false, Ordering::SeqCst);
        Ok(())
    }
}
