//! Core business logic for VaultFlow.
//!
//! # Modules
//!
//! - [`claims`] - Bearer-token role extraction and access decisions
//! - [`ledger`] - Delimited ledger parsing
//! - [`strategy`] - Ordered first-success chains
//! - [`reconcile`] - Metrics and ledger reconciliation
//! - [`export`] - CSV and PDF statements, server first with local fallback
//! - [`refresh`] - Concurrent fetch, reconcile and publish
//!
//! # Refresh Workflow
//!
//! 1. **Fetch**: Metrics (with query negotiation) and ledger, concurrently
//! 2. **Reconcile**: Replace placeholder series, align totals with the ledger
//! 3. **Publish**: Share the canonical state with every subscriber
//! 4. **Export** (optional): Build a statement from the published state
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vaultflow::adapters::api::{ApiClient, QueryNegotiator, StatementClient};
//! use vaultflow::adapters::credentials::MemoryCredentialStore;
//! use vaultflow::config::load_config;
//! use vaultflow::core::reconcile::Reconciler;
//! use vaultflow::core::refresh::RefreshCoordinator;
//! use vaultflow::domain::DateRange;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("vaultflow.toml")?;
//! let store = Arc::new(MemoryCredentialStore::with_token("token", config.api.token.clone()));
//! let client = ApiClient::new(&config.api, store, "token")?;
//!
//! let coordinator = RefreshCoordinator::new(
//!     QueryNegotiator::new(client.clone(), &config.api.metrics_path),
//!     StatementClient::new(client, &config.api.statements_path),
//!     Reconciler::from_config(&config.reconcile),
//! );
//!
//! let outcome = coordinator.refresh(&DateRange::month(2025, 3)?).await;
//! if let Some(state) = outcome.state() {
//!     println!("Total: {}", state.snapshot.total_transferred);
//! }
//! # Ok(())
//! # }
//! ```

pub mod claims;
pub mod export;
pub mod ledger;
pub mod reconcile;
pub mod refresh;
pub mod strategy;
