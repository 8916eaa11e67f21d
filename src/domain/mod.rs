//! Domain models and types for VaultFlow.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Period type** ([`DateRange`]), always inside one calendar month
//! - **Data models** ([`MetricsSnapshot`], [`TransferRecord`], [`AuthorizationClaims`])
//! - **Artifacts** ([`ExportArtifact`], [`ArtifactSource`])
//! - **Error types** ([`VaultFlowError`], [`ApiError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, VaultFlowError>`]:
//!
//! ```rust
//! use vaultflow::domain::{DateRange, Result, VaultFlowError};
//!
//! fn example() -> Result<DateRange> {
//!     DateRange::month(2025, 3).map_err(VaultFlowError::Validation)
//! }
//! ```

pub mod artifact;
pub mod claims;
pub mod errors;
pub mod range;
pub mod result;
pub mod snapshot;
pub mod transfer;

// Re-export commonly used types for convenience
pub use artifact::{ArtifactSource, ExportArtifact};
pub use claims::AuthorizationClaims;
pub use errors::{ApiError, VaultFlowError};
pub use range::DateRange;
pub use result::Result;
pub use snapshot::MetricsSnapshot;
pub use transfer::TransferRecord;
