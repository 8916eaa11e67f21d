//! External system integrations for VaultFlow.
//!
//! - [`api`] - the banking HTTP API (metrics and statements)
//! - [`credentials`] - bearer-token storage
//!
//! # Design Pattern
//!
//! Adapters implement the traits the core consumes ([`crate::core::ledger::LedgerSource`],
//! [`api::MetricsSource`], [`crate::core::export::StatementEndpoint`]) so the core can
//! be tested against in-memory implementations.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vaultflow::adapters::api::{ApiClient, QueryNegotiator, StatementClient};
//! use vaultflow::adapters::credentials::MemoryCredentialStore;
//! use vaultflow::config::ApiConfig;
//!
//! # fn example() -> vaultflow::domain::Result<()> {
//! let config = ApiConfig::default();
//! let store = Arc::new(MemoryCredentialStore::new());
//! let client = ApiClient::new(&config, store, "token")?;
//!
//! let metrics = QueryNegotiator::new(client.clone(), &config.metrics_path);
//! let statements = StatementClient::new(client, &config.statements_path);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod credentials;
