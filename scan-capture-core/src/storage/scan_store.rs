//! Deduplicating scan history.
//!
//! The store is the single writer of the persisted log. Stats and export
//! only read.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::models::config::ScanConfiguration;
use crate::models::scan::{ScanRecord, ScanStats};
use crate::traits::log_store::LogStore;

/// Ordered scan log with duplicate suppression and aggregate stats.
///
/// Records are kept newest-first. Every mutation persists the full log
/// through the configured [`LogStore`]; persistence failures are logged
/// and otherwise ignored.
pub struct ScanStore {
    records: Vec<ScanRecord>,
    stats: ScanStats,
    store: Box<dyn LogStore>,
    suppress_duplicates: bool,
    cooldown: chrono::Duration,
    preview_chars: usize,
    last_accepted: Option<(String, DateTime<Utc>)>,
}

impl ScanStore {
    /// Load existing history from `store`. A load failure starts the log
    /// empty rather than failing the session.
    pub fn new(store: Box<dyn LogStore>, config: &ScanConfiguration) -> Self {
        let records = store.load().unwrap_or_else(|e| {
            log::warn!("failed to load scan history: {e}");
            Vec::new()
        });

        let mut scan_store = Self {
            records,
            stats: ScanStats::default(),
            store,
            suppress_duplicates: config.suppress_duplicates,
            cooldown: chrono::Duration::from_std(config.rescan_cooldown)
                .unwrap_or_else(|_| chrono::Duration::milliseconds(1500)),
            preview_chars: config.preview_chars,
            last_accepted: None,
        };
        scan_store.recompute_stats();
        scan_store
    }

    /// Records in log order, newest first.
    pub fn records(&self) -> &[ScanRecord] {
        &self.records
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Toggle history-wide duplicate suppression. The rescan cooldown
    /// stays active regardless.
    pub fn set_suppress_duplicates(&mut self, suppress: bool) {
        self.suppress_duplicates = suppress;
    }

    pub fn suppress_duplicates(&self) -> bool {
        self.suppress_duplicates
    }

    /// Record a decoded payload. Returns the accepted record, or `None`
    /// when the payload was suppressed.
    pub fn add_scan(&mut self, payload: &str) -> Option<&ScanRecord> {
        self.add_scan_at(payload, Utc::now())
    }

    /// Clock-explicit variant of [`ScanStore::add_scan`].
    pub fn add_scan_at(&mut self, payload: &str, now: DateTime<Utc>) -> Option<&ScanRecord> {
        // One physical code held in frame decodes on every frame; the
        // cooldown keeps that from becoming a burst of records.
        if let Some((last, accepted_at)) = &self.last_accepted {
            if last == payload && now.signed_duration_since(*accepted_at) <= self.cooldown {
                return None;
            }
        }

        if self.suppress_duplicates && self.records.iter().any(|r| r.payload == payload) {
            return None;
        }

        self.last_accepted = Some((payload.to_string(), now));
        self.records.insert(0, ScanRecord::at(payload, now));
        self.persist();
        self.recompute_stats();
        self.records.first()
    }

    /// Drop all history and persist the empty log.
    pub fn clear(&mut self) {
        self.records.clear();
        self.last_accepted = None;
        self.persist();
        self.recompute_stats();
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.records) {
            log::warn!("failed to persist scan history: {e}");
        }
    }

    fn recompute_stats(&mut self) {
        let distinct: HashSet<&str> = self.records.iter().map(|r| r.payload.as_str()).collect();
        self.stats = ScanStats {
            total: self.records.len(),
            distinct: distinct.len(),
            last_preview: self
                .records
                .first()
                .map(|r| r.payload.chars().take(self.preview_chars).collect()),
        };
    }
}
