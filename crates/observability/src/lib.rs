//! Logging setup shared by the client binaries and test harnesses.

/// Initialize process-wide logging from the environment.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init() {
    tracing::init(&tracing::LogConfig::from_env());
}

pub mod redact;
pub mod tracing;

pub use redact::redact_token;
pub use tracing::{LogConfig, LogFormat};
