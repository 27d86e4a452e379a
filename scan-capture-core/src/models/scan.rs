use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One accepted decode. Immutable once created.
///
/// Serializes with an ISO-8601 timestamp, matching the persisted log
/// format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub timestamp: DateTime<Utc>,
    pub payload: String,
}

impl ScanRecord {
    pub fn new(payload: impl Into<String>) -> Self {
        Self::at(payload, Utc::now())
    }

    /// Clock-explicit constructor, used by the store and by tests.
    pub fn at(payload: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            payload: payload.into(),
        }
    }
}

/// Aggregates recomputed after every log mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Number of records in the log.
    pub total: usize,
    /// Number of distinct payloads in the log.
    pub distinct: usize,
    /// Most recent payload, truncated to the configured preview budget.
    pub last_preview: Option<String>,
}
