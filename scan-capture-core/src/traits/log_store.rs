use crate::models::error::ScanError;
use crate::models::scan::ScanRecord;

/// Persistence boundary for the scan log.
///
/// Implementations hold the full log as a single entry; `save` rewrites
/// it wholesale on every mutation. Records are stored newest-first, in
/// log order. Call sites treat failures as best-effort: log and continue
/// rather than abort the session.
pub trait LogStore: Send {
    fn load(&self) -> Result<Vec<ScanRecord>, ScanError>;

    fn save(&self, records: &[ScanRecord]) -> Result<(), ScanError>;
}
