//! In-memory log store for tests and ephemeral sessions.

use parking_lot::Mutex;

use crate::models::error::ScanError;
use crate::models::scan::ScanRecord;
use crate::traits::log_store::LogStore;

#[derive(Default)]
pub struct MemoryLog {
    records: Mutex<Vec<ScanRecord>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of what has been persisted so far.
    pub fn snapshot(&self) -> Vec<ScanRecord> {
        self.records.lock().clone()
    }
}

impl LogStore for MemoryLog {
    fn load(&self) -> Result<Vec<ScanRecord>, ScanError> {
        Ok(self.records.lock().clone())
    }

    fn save(&self, records: &[ScanRecord]) -> Result<(), ScanError> {
        *self.records.lock() = records.to_vec();
        Ok(())
    }
}
