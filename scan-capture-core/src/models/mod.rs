pub mod config;
pub mod device;
pub mod error;
pub mod scan;
pub mod state;
