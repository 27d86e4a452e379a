//! Scripted decode backend.
//!
//! Open outcomes are scripted per constraint; anything unscripted uses a
//! configurable default. Tests drive decodes by calling
//! [`SimDecodeBackend::emit`], which forwards the payload to the callback
//! of the currently live capture.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use scan_capture_core::{
    ActiveCapture, CameraFacing, DecodeBackend, DecodeCallback, DecodeConfig, ScanError,
    SourceConstraint, TrackInfo,
};

/// Scripted result of opening a capture for one constraint.
#[derive(Clone)]
pub enum OpenOutcome {
    /// The open fails with the given reason.
    Fail(String),
    /// The open succeeds and the track reports this label/facing.
    Open {
        label: String,
        facing: Option<CameraFacing>,
    },
}

impl OpenOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Fail(reason.into())
    }

    /// Successful open whose track facing is inferred from the label.
    pub fn opened(label: impl Into<String>) -> Self {
        Self::Open {
            label: label.into(),
            facing: None,
        }
    }

    pub fn opened_facing(label: impl Into<String>, facing: CameraFacing) -> Self {
        Self::Open {
            label: label.into(),
            facing: Some(facing),
        }
    }
}

/// One recorded open attempt.
#[derive(Clone)]
pub struct OpenAttempt {
    pub constraint: SourceConstraint,
    pub used_native_detector: bool,
}

struct LiveCapture {
    id: u64,
    callback: DecodeCallback,
}

struct BackendInner {
    script: Mutex<HashMap<SourceConstraint, OpenOutcome>>,
    default_outcome: Mutex<OpenOutcome>,
    attempts: Mutex<Vec<OpenAttempt>>,
    live: Mutex<Option<LiveCapture>>,
    next_id: AtomicU64,
    image_result: Mutex<Option<Result<String, ScanError>>>,
}

/// Scripted implementation of [`DecodeBackend`].
///
/// Clones share state, so a test can keep a handle after moving one clone
/// into the controller.
#[derive(Clone)]
pub struct SimDecodeBackend {
    inner: Arc<BackendInner>,
}

impl Default for SimDecodeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDecodeBackend {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BackendInner {
                script: Mutex::new(HashMap::new()),
                default_outcome: Mutex::new(OpenOutcome::failed("unscripted constraint")),
                attempts: Mutex::new(Vec::new()),
                live: Mutex::new(None),
                next_id: AtomicU64::new(1),
                image_result: Mutex::new(None),
            }),
        }
    }

    /// Script the outcome for one specific constraint.
    pub fn script_open(&self, constraint: SourceConstraint, outcome: OpenOutcome) {
        self.inner.script.lock().insert(constraint, outcome);
    }

    /// Outcome used for constraints without a specific script entry.
    pub fn set_default_open(&self, outcome: OpenOutcome) {
        *self.inner.default_outcome.lock() = outcome;
    }

    pub fn set_image_result(&self, result: Result<String, ScanError>) {
        *self.inner.image_result.lock() = Some(result);
    }

    /// Every open attempt seen so far, in order.
    pub fn attempts(&self) -> Vec<OpenAttempt> {
        self.inner.attempts.lock().clone()
    }

    pub fn attempted_constraints(&self) -> Vec<SourceConstraint> {
        self.attempts().into_iter().map(|a| a.constraint).collect()
    }

    /// Whether a capture is currently live.
    pub fn is_capturing(&self) -> bool {
        self.inner.live.lock().is_some()
    }

    /// Deliver a decoded payload to the live capture, as if a frame had
    /// contained a code. Returns false when nothing is live.
    pub fn emit(&self, payload: &str) -> bool {
        let callback = self
            .inner
            .live
            .lock()
            .as_ref()
            .map(|live| Arc::clone(&live.callback));
        match callback {
            Some(callback) => {
                callback(payload);
                true
            }
            None => false,
        }
    }
}

impl DecodeBackend for SimDecodeBackend {
    fn open(
        &self,
        constraint: &SourceConstraint,
        config: &DecodeConfig,
        on_decode: DecodeCallback,
    ) -> Result<Box<dyn ActiveCapture>, ScanError> {
        self.inner.attempts.lock().push(OpenAttempt {
            constraint: constraint.clone(),
            used_native_detector: config.use_native_detector,
        });

        let outcome = self
            .inner
            .script
            .lock()
            .get(constraint)
            .cloned()
            .unwrap_or_else(|| self.inner.default_outcome.lock().clone());

        match outcome {
            OpenOutcome::Fail(reason) => Err(ScanError::OpenFailed(reason)),
            OpenOutcome::Open { label, facing } => {
                let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
                log::debug!("sim capture {id} opened for {constraint:?} as {label:?}");
                *self.inner.live.lock() = Some(LiveCapture {
                    id,
                    callback: on_decode,
                });
                Ok(Box::new(SimCapture {
                    backend: Arc::clone(&self.inner),
                    id,
                    track: TrackInfo { label, facing },
                }))
            }
        }
    }

    fn decode_image(&self, _image: &[u8]) -> Result<String, ScanError> {
        self.inner
            .image_result
            .lock()
            .clone()
            .unwrap_or_else(|| Err(ScanError::DecodeFailed("no image scripted".into())))
    }
}

struct SimCapture {
    backend: Arc<BackendInner>,
    id: u64,
    track: TrackInfo,
}

impl ActiveCapture for SimCapture {
    fn track_info(&self) -> TrackInfo {
        self.track.clone()
    }

    fn stop(&mut self) -> Result<(), ScanError> {
        let mut live = self.backend.live.lock();
        // Only clear the slot if it still belongs to this capture; a
        // newer open may have replaced it.
        if live.as_ref().is_some_and(|l| l.id == self.id) {
            *live = None;
        }
        Ok(())
    }
}
