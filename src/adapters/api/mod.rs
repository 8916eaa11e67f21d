//! Banking API integration
//!
//! - [`client`] - authenticated reqwest client shared by all endpoints
//! - [`metrics`] - metrics endpoint with query-shape negotiation
//! - [`mapping`] - lenient JSON-to-snapshot mapping
//! - [`statements`] - ledger CSV and PDF statement endpoints

pub mod client;
pub mod mapping;
pub mod metrics;
pub mod statements;

pub use client::ApiClient;
pub use metrics::{CandidateEncoding, MetricsSource, NegotiationOutcome, QueryNegotiator};
pub use statements::StatementClient;
