//! Controller state-machine tests: candidate walking, verification,
//! manual selection, flip, and image decode.

use std::sync::Arc;

use parking_lot::Mutex;

use scan_capture_core::{
    CameraController, CameraDevice, CameraFacing, EngineMode, MemoryLog, ScanConfiguration,
    ScanDelegate, ScanError, ScanRecord, SessionState, SourceConstraint,
};
use scan_capture_sim::{OpenOutcome, SimDecodeBackend, SimMediaDevices};

#[derive(Default)]
struct RecordingDelegate {
    states: Mutex<Vec<SessionState>>,
    scans: Mutex<Vec<ScanRecord>>,
    switches: Mutex<Vec<EngineMode>>,
    messages: Mutex<Vec<String>>,
    errors: Mutex<Vec<ScanError>>,
}

impl ScanDelegate for RecordingDelegate {
    fn on_state_changed(&self, state: &SessionState) {
        self.states.lock().push(state.clone());
    }

    fn on_scan(&self, record: &ScanRecord) {
        self.scans.lock().push(record.clone());
    }

    fn on_engine_switched(&self, mode: EngineMode) {
        self.switches.lock().push(mode);
    }

    fn on_message(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }

    fn on_error(&self, error: &ScanError) {
        self.errors.lock().push(error.clone());
    }
}

fn exact_environment() -> SourceConstraint {
    SourceConstraint::Facing {
        facing: CameraFacing::Environment,
        exact: true,
    }
}

fn loose_user() -> SourceConstraint {
    SourceConstraint::Facing {
        facing: CameraFacing::User,
        exact: false,
    }
}

fn two_cameras() -> Vec<CameraDevice> {
    vec![
        CameraDevice::new("front", "Front Camera"),
        CameraDevice::new("back", "Back Camera"),
    ]
}

fn controller(
    backend: &SimDecodeBackend,
    media: &SimMediaDevices,
    config: ScanConfiguration,
) -> CameraController<SimDecodeBackend, SimMediaDevices> {
    CameraController::new(
        backend.clone(),
        media.clone(),
        Box::new(MemoryLog::new()),
        config,
    )
    .unwrap()
}

#[test]
fn failed_opens_advance_to_next_candidate() {
    let backend = SimDecodeBackend::new();
    let media = SimMediaDevices::new(two_cameras());
    backend.script_open(exact_environment(), OpenOutcome::failed("not supported"));
    backend.script_open(
        SourceConstraint::DeviceId("back".into()),
        OpenOutcome::opened("Back Camera"),
    );

    let controller = controller(&backend, &media, ScanConfiguration::default());
    controller.start().unwrap();

    // Exactly N+1 attempts: one failure, then the accepted open.
    assert_eq!(backend.attempts().len(), 2);
    assert_eq!(
        controller.state(),
        SessionState::Running {
            device_index: Some(1),
        }
    );
}

#[test]
fn front_facing_track_is_closed_and_skipped() {
    let backend = SimDecodeBackend::new();
    let media = SimMediaDevices::new(two_cameras());
    // The exact-environment open "succeeds" but the track metadata says
    // front camera; the controller must reject it and move on.
    backend.script_open(exact_environment(), OpenOutcome::opened("Front Camera"));
    backend.script_open(
        SourceConstraint::DeviceId("back".into()),
        OpenOutcome::opened("Back Camera"),
    );

    let delegate = Arc::new(RecordingDelegate::default());
    let controller = controller(&backend, &media, ScanConfiguration::default());
    controller.set_delegate(delegate.clone());
    controller.start().unwrap();

    assert_eq!(backend.attempts().len(), 2);
    assert!(controller.state().is_running());

    // Running was never reported for the rejected candidate.
    let running_states: Vec<_> = delegate
        .states
        .lock()
        .iter()
        .filter(|s| s.is_running())
        .cloned()
        .collect();
    assert_eq!(
        running_states,
        vec![SessionState::Running {
            device_index: Some(1),
        }]
    );
}

#[test]
fn exhausting_all_candidates_is_fatal() {
    let backend = SimDecodeBackend::new();
    let media = SimMediaDevices::new(Vec::new());

    let delegate = Arc::new(RecordingDelegate::default());
    let controller = controller(&backend, &media, ScanConfiguration::default());
    controller.set_delegate(delegate.clone());

    assert_eq!(controller.start(), Err(ScanError::NoCameraAvailable));
    assert!(controller.state().is_idle());
    // Zero devices still yields the three facing-based candidates.
    assert_eq!(backend.attempts().len(), 3);
    assert!(delegate
        .errors
        .lock()
        .contains(&ScanError::NoCameraAvailable));
}

#[test]
fn user_facing_last_resort_is_accepted() {
    let backend = SimDecodeBackend::new();
    let media = SimMediaDevices::new(Vec::new());
    backend.script_open(loose_user(), OpenOutcome::opened("Front Camera"));

    let controller = controller(&backend, &media, ScanConfiguration::default());
    controller.start().unwrap();

    // Front-facing metadata on the final candidate is not a rejection.
    assert!(controller.state().is_running());
}

#[test]
fn start_is_a_no_op_while_running() {
    let backend = SimDecodeBackend::new();
    let media = SimMediaDevices::new(two_cameras());
    backend.script_open(exact_environment(), OpenOutcome::opened("Back Camera"));

    let controller = controller(&backend, &media, ScanConfiguration::default());
    controller.start().unwrap();
    let attempts = backend.attempts().len();

    controller.start().unwrap();
    assert_eq!(backend.attempts().len(), attempts);
    assert!(controller.state().is_running());
}

#[test]
fn stop_is_idempotent_and_releases_the_capture() {
    let backend = SimDecodeBackend::new();
    let media = SimMediaDevices::new(two_cameras());
    backend.script_open(exact_environment(), OpenOutcome::opened("Back Camera"));

    let controller = controller(&backend, &media, ScanConfiguration::default());
    controller.start().unwrap();
    assert!(backend.is_capturing());

    controller.stop();
    assert!(controller.state().is_idle());
    assert!(!backend.is_capturing());

    // Second stop from idle is harmless.
    controller.stop();
    assert!(controller.state().is_idle());
}

#[test]
fn hidden_labels_trigger_a_single_permission_probe() {
    let backend = SimDecodeBackend::new();
    let media = SimMediaDevices::new(two_cameras()).with_locked_labels();
    backend.script_open(exact_environment(), OpenOutcome::opened("Back Camera"));

    let controller = controller(&backend, &media, ScanConfiguration::default());
    controller.start().unwrap();

    assert_eq!(media.permission_probes(), 1);
    assert_eq!(controller.devices()[1].label, "Back Camera");
}

#[test]
fn enumeration_failure_still_reaches_facing_candidates() {
    let backend = SimDecodeBackend::new();
    let media = SimMediaDevices::new(two_cameras()).with_failing_enumeration();
    backend.script_open(exact_environment(), OpenOutcome::opened("Back Camera"));

    let delegate = Arc::new(RecordingDelegate::default());
    let controller = controller(&backend, &media, ScanConfiguration::default());
    controller.set_delegate(delegate.clone());
    controller.start().unwrap();

    assert!(controller.state().is_running());
    assert!(!delegate.messages.lock().is_empty());
}

#[test]
fn manual_selection_is_the_sole_candidate() {
    let backend = SimDecodeBackend::new();
    let media = SimMediaDevices::new(two_cameras());
    backend.script_open(
        SourceConstraint::DeviceId("front".into()),
        OpenOutcome::opened("Front Camera"),
    );

    let controller = controller(&backend, &media, ScanConfiguration::default());
    controller.select_device("front").unwrap();
    controller.start().unwrap();

    assert_eq!(
        backend.attempted_constraints(),
        vec![SourceConstraint::DeviceId("front".into())]
    );
    // Manual choice is honored even though the track looks user-facing.
    assert!(controller.state().is_running());
}

#[test]
fn flip_needs_at_least_two_devices() {
    let backend = SimDecodeBackend::new();
    let media = SimMediaDevices::new(vec![CameraDevice::new("only", "Back Camera")]);

    let controller = controller(&backend, &media, ScanConfiguration::default());
    assert_eq!(controller.flip(), Err(ScanError::NotEnoughDevices));
    assert!(controller.state().is_idle());
}

#[test]
fn flip_advances_the_device_ring_and_restarts() {
    let backend = SimDecodeBackend::new();
    let media = SimMediaDevices::new(two_cameras());
    backend.script_open(exact_environment(), OpenOutcome::opened("Back Camera"));
    backend.script_open(
        SourceConstraint::DeviceId("front".into()),
        OpenOutcome::opened("Front Camera"),
    );

    let controller = controller(&backend, &media, ScanConfiguration::default());
    controller.start().unwrap();
    assert_eq!(controller.state().device_index(), Some(1));

    controller.flip().unwrap();

    // Ring order: index 1 → index 0, pinned for the restart.
    assert_eq!(
        backend.attempted_constraints().last(),
        Some(&SourceConstraint::DeviceId("front".into()))
    );
    assert_eq!(
        controller.state(),
        SessionState::Running {
            device_index: Some(0),
        }
    );
}

#[test]
fn flip_pins_the_device_until_the_selection_is_cleared() {
    let backend = SimDecodeBackend::new();
    let media = SimMediaDevices::new(two_cameras());
    backend.script_open(exact_environment(), OpenOutcome::opened("Back Camera"));
    backend.script_open(
        SourceConstraint::DeviceId("front".into()),
        OpenOutcome::opened("Front Camera"),
    );

    let controller = controller(&backend, &media, ScanConfiguration::default());
    controller.start().unwrap();
    controller.flip().unwrap();

    // The flipped-to device stays the sole candidate across stop/start.
    controller.stop();
    controller.start().unwrap();
    assert_eq!(
        backend.attempted_constraints().last(),
        Some(&SourceConstraint::DeviceId("front".into()))
    );

    // Clearing the pin resumes heuristic selection.
    controller.stop();
    controller.clear_selection();
    controller.start().unwrap();
    assert_eq!(
        backend.attempted_constraints().last(),
        Some(&exact_environment())
    );
}

#[test]
fn live_decodes_flow_into_the_log_with_cooldown() {
    let backend = SimDecodeBackend::new();
    let media = SimMediaDevices::new(two_cameras());
    backend.script_open(exact_environment(), OpenOutcome::opened("Back Camera"));

    let delegate = Arc::new(RecordingDelegate::default());
    let controller = controller(&backend, &media, ScanConfiguration::default());
    controller.set_delegate(delegate.clone());
    controller.start().unwrap();

    assert!(backend.emit("first"));
    // Same payload immediately again: swallowed by the rescan cooldown.
    assert!(backend.emit("first"));
    assert!(backend.emit("second"));

    let payloads: Vec<_> = controller
        .records()
        .into_iter()
        .map(|r| r.payload)
        .collect();
    assert_eq!(payloads, vec!["second", "first"]);
    assert_eq!(delegate.scans.lock().len(), 2);
    assert_eq!(controller.stats().total, 2);
}

#[test]
fn scan_image_stops_the_session_and_records_the_payload() {
    let backend = SimDecodeBackend::new();
    let media = SimMediaDevices::new(two_cameras());
    backend.script_open(exact_environment(), OpenOutcome::opened("Back Camera"));
    backend.set_image_result(Ok("IMG".into()));

    let controller = controller(&backend, &media, ScanConfiguration::default());
    controller.start().unwrap();

    assert_eq!(controller.scan_image(&[0u8; 4]).unwrap(), "IMG");
    assert!(controller.state().is_idle());
    assert_eq!(controller.records()[0].payload, "IMG");
}

#[test]
fn export_reflects_current_log_order() {
    let backend = SimDecodeBackend::new();
    let media = SimMediaDevices::new(two_cameras());
    backend.script_open(exact_environment(), OpenOutcome::opened("Back Camera"));

    let controller = controller(&backend, &media, ScanConfiguration::default());
    controller.start().unwrap();
    backend.emit("Hello,World");

    let csv = controller.export_csv();
    assert!(csv.starts_with('\u{feff}'));
    assert!(csv.contains("\"fecha\",\"codigo\""));
    assert!(csv.contains("\"Hello,World\""));

    controller.clear_history();
    assert_eq!(controller.stats().total, 0);
}
