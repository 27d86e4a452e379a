//! Decode-engine alternation.
//!
//! Two engine modes exist: the hardware-assisted detector and the
//! software decode path. A freshly started session that produces no
//! decode within the fallback window gets its mode toggled and is
//! restarted by the watchdog in the controller. The window is wall-clock
//! based: frame rate is hardware-dependent, so frame counts are not a
//! usable substitute.

/// Decode backend mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineMode {
    /// Hardware-assisted detector (default).
    #[default]
    Accelerated,
    /// Software decode path.
    Fallback,
}

impl EngineMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Accelerated => Self::Fallback,
            Self::Fallback => Self::Accelerated,
        }
    }

    /// Whether backends should prefer their native detector in this mode.
    pub fn prefers_native_detector(self) -> bool {
        matches!(self, Self::Accelerated)
    }

    /// Short human-readable name for messages and logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::Accelerated => "accelerated",
            Self::Fallback => "fallback",
        }
    }
}
