pub mod decode_backend;
pub mod log_store;
pub mod media_devices;
pub mod scan_delegate;
