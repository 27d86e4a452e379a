use crate::models::error::ScanError;
use crate::models::scan::ScanRecord;
use crate::models::state::SessionState;
use crate::session::engine::EngineMode;

/// Event delegate for scan session notifications.
///
/// Methods may be called from the caller's thread or from the fallback
/// watchdog thread. Implementations should marshal to the UI thread if
/// needed.
pub trait ScanDelegate: Send + Sync {
    /// Called on every session state transition.
    fn on_state_changed(&self, state: &SessionState);

    /// Called when a decoded payload is accepted into the log.
    fn on_scan(&self, record: &ScanRecord);

    /// Called when the decode engine mode is toggled by the watchdog.
    fn on_engine_switched(&self, mode: EngineMode);

    /// Called with user-surfaced notices (enumeration problems, engine
    /// switch hints).
    fn on_message(&self, message: &str);

    /// Called when an error occurs during a session.
    fn on_error(&self, error: &ScanError);
}
