/// Camera session state machine.
///
/// State transitions:
/// ```text
/// idle → starting → running → stopping → idle
///           ↓
///         idle (all candidates exhausted)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Starting,
    Running {
        /// Index into the enumerated device list, when the opened track
        /// label could be matched back to a device.
        device_index: Option<usize>,
    },
    Stopping,
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_starting(&self) -> bool {
        matches!(self, Self::Starting)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    pub fn is_stopping(&self) -> bool {
        matches!(self, Self::Stopping)
    }

    /// Returns the matched device index if in a state that tracks it.
    pub fn device_index(&self) -> Option<usize> {
        match self {
            Self::Running { device_index } => *device_index,
            _ => None,
        }
    }
}
