pub mod export;
pub mod json_log;
pub mod memory;
pub mod scan_store;
