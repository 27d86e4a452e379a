//! Whole-log JSON persistence.
//!
//! The entire history is one JSON document, loaded at startup and
//! rewritten wholesale on every accepted scan or clear, the file-system
//! analog of a single key-value entry.

use std::fs;
use std::path::PathBuf;

use crate::models::error::ScanError;
use crate::models::scan::ScanRecord;
use crate::traits::log_store::LogStore;

pub struct JsonFileLog {
    path: PathBuf,
}

impl JsonFileLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl LogStore for JsonFileLog {
    fn load(&self) -> Result<Vec<ScanRecord>, ScanError> {
        // Missing file means first run, not an error.
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&self.path)
            .map_err(|e| ScanError::StorageError(format!("failed to read scan log: {e}")))?;
        serde_json::from_str(&json)
            .map_err(|e| ScanError::StorageError(format!("failed to parse scan log: {e}")))
    }

    fn save(&self, records: &[ScanRecord]) -> Result<(), ScanError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ScanError::StorageError(format!("failed to create directory: {e}")))?;
        }
        let json = serde_json::to_string(records)
            .map_err(|e| ScanError::StorageError(format!("failed to serialize scan log: {e}")))?;
        fs::write(&self.path, json)
            .map_err(|e| ScanError::StorageError(format!("failed to write scan log: {e}")))
    }
}
