//! Logging: structured engine events and the colored HTTP request log.

pub mod logger;
pub mod request_log;

pub use logger::{Logger, Severity};
