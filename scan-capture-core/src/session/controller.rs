//! Camera session controller.
//!
//! Owns the start/stop/restart/flip lifecycle: walks source candidates in
//! confidence order, verifies opened tracks against their reported facing
//! metadata, and arms the decode-engine fallback watchdog on every
//! successful start.
//!
//! Candidate attempts are strictly sequential; no two captures are ever
//! open at once. The watchdog is the only scheduled callback and re-checks
//! the session generation before acting, so a stale timer can never
//! resurrect a session the user stopped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use crate::devices::candidates::{self, Candidate};
use crate::devices::enumerator::enumerate_cameras;
use crate::models::config::ScanConfiguration;
use crate::models::device::{CameraDevice, SourceConstraint, TrackInfo};
use crate::models::error::ScanError;
use crate::models::scan::{ScanRecord, ScanStats};
use crate::models::state::SessionState;
use crate::session::engine::EngineMode;
use crate::storage::export;
use crate::storage::scan_store::ScanStore;
use crate::traits::decode_backend::{ActiveCapture, DecodeBackend, DecodeCallback};
use crate::traits::log_store::LogStore;
use crate::traits::media_devices::MediaDevices;
use crate::traits::scan_delegate::ScanDelegate;

/// Internal mutable session state, protected by `parking_lot::Mutex`.
struct SessionInner {
    state: SessionState,
    engine: EngineMode,
    /// Bumped on every start and stop. Scheduled work captures the value
    /// it was armed with and bails out on mismatch.
    generation: u64,
    capture: Option<Box<dyn ActiveCapture>>,
    devices: Vec<CameraDevice>,
    current_device: Option<usize>,
    manual_device: Option<String>,
    decode_seen: Arc<AtomicBool>,
}

impl SessionInner {
    fn new() -> Self {
        Self {
            state: SessionState::Idle,
            engine: EngineMode::default(),
            generation: 0,
            capture: None,
            devices: Vec::new(),
            current_device: None,
            manual_device: None,
            decode_seen: Arc::new(AtomicBool::new(false)),
        }
    }
}

struct ControllerShared<B, M> {
    backend: B,
    media: M,
    config: ScanConfiguration,
    inner: Mutex<SessionInner>,
    store: Arc<Mutex<ScanStore>>,
    delegate: Arc<Mutex<Option<Arc<dyn ScanDelegate>>>>,
}

/// Camera session controller, generic over the decode backend and the
/// media-device layer.
///
/// One controller owns at most one active session. All public methods are
/// safe to call from any state; `stop` is idempotent.
pub struct CameraController<B: DecodeBackend + 'static, M: MediaDevices + 'static> {
    shared: Arc<ControllerShared<B, M>>,
}

impl<B: DecodeBackend + 'static, M: MediaDevices + 'static> CameraController<B, M> {
    pub fn new(
        backend: B,
        media: M,
        log_store: Box<dyn LogStore>,
        config: ScanConfiguration,
    ) -> Result<Self, ScanError> {
        config
            .validate()
            .map_err(ScanError::InvalidConfiguration)?;
        let store = ScanStore::new(log_store, &config);
        Ok(Self {
            shared: Arc::new(ControllerShared {
                backend,
                media,
                config,
                inner: Mutex::new(SessionInner::new()),
                store: Arc::new(Mutex::new(store)),
                delegate: Arc::new(Mutex::new(None)),
            }),
        })
    }

    pub fn set_delegate(&self, delegate: Arc<dyn ScanDelegate>) {
        *self.shared.delegate.lock() = Some(delegate);
    }

    pub fn state(&self) -> SessionState {
        self.shared.inner.lock().state.clone()
    }

    pub fn engine_mode(&self) -> EngineMode {
        self.shared.inner.lock().engine
    }

    /// The device list from the most recent enumeration.
    pub fn devices(&self) -> Vec<CameraDevice> {
        self.shared.inner.lock().devices.clone()
    }

    /// Open a stream by trying source candidates in confidence order.
    ///
    /// No-op when a session is already starting or running. Fails with
    /// [`ScanError::NoCameraAvailable`] only once every candidate has been
    /// exhausted, leaving the session idle.
    pub fn start(&self) -> Result<(), ScanError> {
        ControllerShared::do_start(&self.shared)
    }

    /// Cancel scheduled work and close any open stream. Idempotent.
    pub fn stop(&self) {
        self.shared.do_stop();
    }

    /// `stop` then `start`; used on camera-selection change and by the
    /// engine-fallback watchdog.
    pub fn restart(&self) -> Result<(), ScanError> {
        self.shared.do_stop();
        ControllerShared::do_start(&self.shared)
    }

    /// Advance to the next device in ring order and restart if running.
    ///
    /// The chosen device is pinned like [`CameraController::select_device`]
    /// would pin it, so later starts keep it until
    /// [`CameraController::clear_selection`].
    ///
    /// Non-fatal error when fewer than two devices exist.
    pub fn flip(&self) -> Result<(), ScanError> {
        if self.shared.inner.lock().devices.is_empty() {
            match enumerate_cameras(&self.shared.media) {
                Ok(devices) => self.shared.inner.lock().devices = devices,
                Err(e) => log::warn!("camera enumeration failed during flip: {e}"),
            }
        }

        let (was_running, target) = {
            let mut inner = self.shared.inner.lock();
            if inner.devices.len() < 2 {
                return Err(ScanError::NotEnoughDevices);
            }
            let next = match inner.current_device {
                Some(index) => (index + 1) % inner.devices.len(),
                None => 0,
            };
            inner.current_device = Some(next);
            let id = inner.devices[next].id.clone();
            inner.manual_device = Some(id.clone());
            (inner.state.is_running(), id)
        };

        log::info!("flipping to device {target}");
        if was_running {
            self.restart()?;
        }
        Ok(())
    }

    /// Pin a device: it becomes the sole candidate for the next start,
    /// bypassing the selection heuristic. Restarts a running session.
    pub fn select_device(&self, device_id: &str) -> Result<(), ScanError> {
        let was_running = {
            let mut inner = self.shared.inner.lock();
            inner.manual_device = Some(device_id.to_string());
            inner.state.is_running()
        };
        if was_running {
            self.restart()?;
        }
        Ok(())
    }

    /// Return to heuristic source selection on the next start.
    pub fn clear_selection(&self) {
        self.shared.inner.lock().manual_device = None;
    }

    /// Decode a still image through the backend and route the result into
    /// the scan log. Stops a running session first.
    pub fn scan_image(&self, image: &[u8]) -> Result<String, ScanError> {
        if self.shared.inner.lock().state.is_running() {
            self.shared.do_stop();
        }
        let payload = self.shared.backend.decode_image(image)?;
        let accepted = self.shared.store.lock().add_scan(&payload).cloned();
        if let Some(record) = accepted {
            self.shared.notify_scan(&record);
        }
        Ok(payload)
    }

    // --- Scan log access ---

    pub fn records(&self) -> Vec<ScanRecord> {
        self.shared.store.lock().records().to_vec()
    }

    pub fn stats(&self) -> ScanStats {
        self.shared.store.lock().stats().clone()
    }

    pub fn set_suppress_duplicates(&self, suppress: bool) {
        self.shared.store.lock().set_suppress_duplicates(suppress);
    }

    pub fn clear_history(&self) {
        self.shared.store.lock().clear();
    }

    /// Current log rendered as CSV.
    pub fn export_csv(&self) -> String {
        export::to_csv(self.shared.store.lock().records())
    }
}

impl<B: DecodeBackend + 'static, M: MediaDevices + 'static> Drop for CameraController<B, M> {
    fn drop(&mut self) {
        self.shared.do_stop();
    }
}

impl<B: DecodeBackend + 'static, M: MediaDevices + 'static> ControllerShared<B, M> {
    fn do_start(shared: &Arc<Self>) -> Result<(), ScanError> {
        Self::do_start_guarded(shared, None)
    }

    /// Start, but only when the session generation still matches
    /// `only_if_generation`. The watchdog restarts through this guard so
    /// any client start or stop that lands between the engine switch and
    /// the reopen wins over the restart.
    fn do_start_guarded(
        shared: &Arc<Self>,
        only_if_generation: Option<u64>,
    ) -> Result<(), ScanError> {
        let generation = {
            let mut inner = shared.inner.lock();
            if !inner.state.is_idle() {
                return Ok(());
            }
            if only_if_generation.is_some_and(|g| inner.generation != g) {
                return Ok(());
            }
            inner.state = SessionState::Starting;
            inner.generation += 1;
            inner.generation
        };
        shared.notify_state(&SessionState::Starting);

        // Refresh the device list. Enumeration failure is recoverable: the
        // candidate list still ends in facing-only constraints.
        let devices = match enumerate_cameras(&shared.media) {
            Ok(devices) => devices,
            Err(e) => {
                log::warn!("camera enumeration failed: {e}");
                shared.notify_message("Could not enumerate cameras; trying facing constraints.");
                Vec::new()
            }
        };
        if devices.is_empty() {
            shared.notify_message("No cameras detected.");
        }

        let (manual, engine) = {
            let mut inner = shared.inner.lock();
            inner.devices = devices.clone();
            (inner.manual_device.clone(), inner.engine)
        };
        let candidates = match &manual {
            Some(id) => vec![Candidate::manual(id)],
            None => candidates::build(&devices),
        };

        let decode_seen = Arc::new(AtomicBool::new(false));
        let callback = Self::make_decode_callback(
            Arc::clone(&shared.store),
            Arc::clone(&shared.delegate),
            Arc::clone(&decode_seen),
        );
        let decode_config = shared.config.decode_config(engine.prefers_native_detector());

        let last = candidates.len() - 1;
        for (index, candidate) in candidates.iter().enumerate() {
            let mut capture = match shared.backend.open(
                &candidate.constraint,
                &decode_config,
                Arc::clone(&callback),
            ) {
                Ok(capture) => capture,
                Err(e) => {
                    log::warn!(
                        "candidate {index} ({}) failed to open: {e}",
                        candidate.rationale
                    );
                    if index == last {
                        shared.transition_to_idle();
                        shared.notify_error(&ScanError::NoCameraAvailable);
                        return Err(ScanError::NoCameraAvailable);
                    }
                    continue;
                }
            };

            let track = capture.track_info();
            if track.looks_user_facing() && index != last {
                // Facing metadata can be unreliable; treat a front-looking
                // track as a failed verification, not a success.
                log::info!(
                    "candidate {index} opened a user-facing track ({:?}); trying next",
                    track.label
                );
                if let Err(e) = capture.stop() {
                    log::warn!("failed to close rejected stream: {e}");
                }
                continue;
            }

            let device_index = Self::match_device_index(&devices, &track, &candidate.constraint);
            {
                let mut inner = shared.inner.lock();
                // The session may have been stopped while this candidate
                // was opening; do not resurrect it.
                if inner.generation != generation {
                    drop(inner);
                    if let Err(e) = capture.stop() {
                        log::warn!("failed to close orphaned stream: {e}");
                    }
                    return Ok(());
                }
                inner.capture = Some(capture);
                inner.current_device = device_index;
                inner.decode_seen = Arc::clone(&decode_seen);
                inner.state = SessionState::Running { device_index };
            }
            log::info!(
                "camera running via candidate {index} ({}), {} engine",
                candidate.rationale,
                engine.label()
            );
            shared.notify_state(&SessionState::Running { device_index });
            Self::arm_fallback_watchdog(shared, generation);
            return Ok(());
        }

        // Candidate lists always end in a facing-only constraint, so the
        // loop returns before falling through.
        shared.transition_to_idle();
        shared.notify_error(&ScanError::NoCameraAvailable);
        Err(ScanError::NoCameraAvailable)
    }

    fn do_stop(&self) {
        let capture = {
            let mut inner = self.inner.lock();
            inner.generation += 1;
            if inner.state.is_idle() {
                return;
            }
            inner.state = SessionState::Stopping;
            inner.capture.take()
        };
        self.notify_state(&SessionState::Stopping);

        if let Some(mut capture) = capture {
            if let Err(e) = capture.stop() {
                log::warn!("failed to stop capture: {e}");
            }
        }

        self.transition_to_idle();
    }

    /// Arm the no-decode countdown for the session identified by
    /// `generation`. A decode before expiry implicitly cancels the
    /// consequence; expiry on a still-running silent session toggles the
    /// engine mode and restarts.
    fn arm_fallback_watchdog(shared: &Arc<Self>, generation: u64) {
        let shared = Arc::clone(shared);
        let timeout = shared.config.fallback_timeout;

        thread::Builder::new()
            .name("decode-fallback".into())
            .spawn(move || {
                thread::sleep(timeout);

                // Check, toggle, and tear down in one critical section.
                // Anything that bumps the generation during the delegate
                // callbacks below makes the guarded restart yield.
                let (mode, capture, restart_generation) = {
                    let mut inner = shared.inner.lock();
                    if inner.generation != generation || !inner.state.is_running() {
                        return;
                    }
                    if inner.decode_seen.load(Ordering::SeqCst) {
                        return;
                    }
                    inner.engine = inner.engine.toggled();
                    inner.generation += 1;
                    inner.state = SessionState::Stopping;
                    (inner.engine, inner.capture.take(), inner.generation)
                };
                log::info!(
                    "no decodes within {timeout:?}; switching to the {} engine",
                    mode.label()
                );

                shared.notify_state(&SessionState::Stopping);
                if let Some(mut capture) = capture {
                    if let Err(e) = capture.stop() {
                        log::warn!("failed to stop capture: {e}");
                    }
                }
                shared.transition_to_idle();

                shared.notify_engine_switched(mode);
                shared.notify_message("No detections; trying the alternate decode engine.");

                if let Err(e) = Self::do_start_guarded(&shared, Some(restart_generation)) {
                    log::error!("engine-fallback restart failed: {e}");
                }
            })
            .expect("failed to spawn fallback watchdog");
    }

    fn make_decode_callback(
        store: Arc<Mutex<ScanStore>>,
        delegate: Arc<Mutex<Option<Arc<dyn ScanDelegate>>>>,
        decode_seen: Arc<AtomicBool>,
    ) -> DecodeCallback {
        Arc::new(move |payload: &str| {
            decode_seen.store(true, Ordering::SeqCst);
            let accepted = store.lock().add_scan(payload).cloned();
            if let Some(record) = accepted {
                let delegate = delegate.lock().clone();
                if let Some(delegate) = delegate {
                    delegate.on_scan(&record);
                }
            }
        })
    }

    /// Best-effort mapping of an accepted track back to the enumerated
    /// device list, by label first and by the requested id second.
    fn match_device_index(
        devices: &[CameraDevice],
        track: &TrackInfo,
        constraint: &SourceConstraint,
    ) -> Option<usize> {
        if !track.label.is_empty() {
            if let Some(index) = devices.iter().position(|d| d.label == track.label) {
                return Some(index);
            }
        }
        match constraint {
            SourceConstraint::DeviceId(id) => devices.iter().position(|d| &d.id == id),
            SourceConstraint::Facing { .. } => None,
        }
    }

    fn transition_to_idle(&self) {
        self.inner.lock().state = SessionState::Idle;
        self.notify_state(&SessionState::Idle);
    }

    // Delegates are invoked outside the lock so an implementation may call
    // back into the controller.

    fn current_delegate(&self) -> Option<Arc<dyn ScanDelegate>> {
        self.delegate.lock().clone()
    }

    fn notify_state(&self, state: &SessionState) {
        if let Some(delegate) = self.current_delegate() {
            delegate.on_state_changed(state);
        }
    }

    fn notify_scan(&self, record: &ScanRecord) {
        if let Some(delegate) = self.current_delegate() {
            delegate.on_scan(record);
        }
    }

    fn notify_engine_switched(&self, mode: EngineMode) {
        if let Some(delegate) = self.current_delegate() {
            delegate.on_engine_switched(mode);
        }
    }

    fn notify_message(&self, message: &str) {
        if let Some(delegate) = self.current_delegate() {
            delegate.on_message(message);
        }
    }

    fn notify_error(&self, error: &ScanError) {
        if let Some(delegate) = self.current_delegate() {
            delegate.on_error(error);
        }
    }
}
