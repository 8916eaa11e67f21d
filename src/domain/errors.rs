//! Domain error types
//!
//! This module defines the error hierarchy for VaultFlow. Errors are
//! domain-specific and don't expose third-party HTTP client types.
//!
//! Parsing and reconciliation never produce these errors: both are total
//! functions. Only the metrics negotiation and the server-side export
//! attempt surface an [`ApiError`], and the exporter absorbs the latter into
//! its local fallback.

use thiserror::Error;

/// Main VaultFlow error type
#[derive(Debug, Clone, Error)]
pub enum VaultFlowError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Remote API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Export errors (no source could produce an artifact)
    #[error("Export error: {0}")]
    Export(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl VaultFlowError {
    /// Returns the inner API error, if any
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            VaultFlowError::Api(e) => Some(e),
            _ => None,
        }
    }

    /// True when the error is an authorization failure from the API
    pub fn is_unauthorized(&self) -> bool {
        self.as_api().map(ApiError::is_unauthorized).unwrap_or(false)
    }
}

/// Remote API errors
///
/// `Unauthorized` aborts a negotiation chain immediately. Everything else is
/// negotiable: the next candidate encoding (or the export fallback) is tried.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 401/403 from the server
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Transport-level failure
    #[error("Server unreachable: {0}")]
    Unreachable(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Response body could not be interpreted
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Any other non-success status
    #[error("Request failed: {status} - {message}")]
    Status { status: u16, message: String },

    /// Every candidate request shape was rejected
    #[error("All {attempts} candidate request(s) failed; last error: {last_error}")]
    NegotiationExhausted { attempts: usize, last_error: String },
}

impl ApiError {
    /// True for explicit authorization failures
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// True when a caller may move on to its next strategy
    pub fn is_negotiable(&self) -> bool {
        !self.is_unauthorized()
    }

    /// Maps a transport error, keeping timeouts distinct from other failures
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(err.to_string())
        } else {
            ApiError::Unreachable(err.to_string())
        }
    }

    /// Maps a non-success HTTP status
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => ApiError::Unauthorized(format!("status {status}")),
            _ => ApiError::Status {
                status,
                message: body,
            },
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for VaultFlowError {
    fn from(err: std::io::Error) -> Self {
        VaultFlowError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for VaultFlowError {
    fn from(err: serde_json::Error) -> Self {
        VaultFlowError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for VaultFlowError {
    fn from(err: toml::de::Error) -> Self {
        VaultFlowError::Configuration(format!("TOML parse error: {err}"))
    }
}
