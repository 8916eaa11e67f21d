//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output with configurable log levels
//! - JSON-formatted local file logs with rotation
//!
//! # Example
//!
//! ```no_run
//! use vaultflow::logging::init_logging;
//! use vaultflow::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log one attempt in a first-success chain
///
/// # Example
///
/// ```no_run
/// use vaultflow::log_candidate_attempt;
///
/// log_candidate_attempt!("metrics", 2, 4, "calendar-dates");
/// ```
#[macro_export]
macro_rules! log_candidate_attempt {
    ($chain:expr, $attempt:expr, $total:expr, $name:expr) => {
        tracing::debug!(
            chain = $chain,
            attempt = $attempt,
            total = $total,
            strategy = $name,
            "Trying strategy"
        );
    };
}

/// Log a switch to a local fallback
///
/// # Example
///
/// ```no_run
/// use vaultflow::log_fallback;
///
/// log_fallback!("pdf", "server returned 502");
/// ```
#[macro_export]
macro_rules! log_fallback {
    ($artifact:expr, $reason:expr) => {
        tracing::warn!(
            artifact = $artifact,
            reason = %$reason,
            "Server export unavailable, building artifact locally"
        );
    };
}
