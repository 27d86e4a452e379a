//! CSV export of the scan log.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::models::error::ScanError;
use crate::models::scan::ScanRecord;

/// Spreadsheet tools misread UTF-8 CSV without a byte-order mark.
const BOM: &str = "\u{feff}";

/// Render the log as CSV in current log order.
///
/// Header `fecha,codigo`; every field double-quoted with embedded quotes
/// doubled; CRLF row endings; leading UTF-8 BOM. Timestamps render as
/// `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn to_csv(records: &[ScanRecord]) -> String {
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(format!("{},{}", quote("fecha"), quote("codigo")));
    for record in records {
        rows.push(format!(
            "{},{}",
            quote(&format_timestamp(record.timestamp)),
            quote(&record.payload)
        ));
    }
    format!("{BOM}{}", rows.join("\r\n"))
}

/// Write the CSV as `scans-<stamp>.csv` under `dir`, returning the path.
pub fn write_csv(records: &[ScanRecord], dir: &Path) -> Result<PathBuf, ScanError> {
    fs::create_dir_all(dir)
        .map_err(|e| ScanError::StorageError(format!("failed to create directory: {e}")))?;
    let stamp = Utc::now().format("%Y-%m-%dT%H-%M-%S");
    let path = dir.join(format!("scans-{stamp}.csv"));
    fs::write(&path, to_csv(records))
        .map_err(|e| ScanError::StorageError(format!("failed to write CSV: {e}")))?;
    Ok(path)
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
