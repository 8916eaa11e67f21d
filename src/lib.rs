// VaultFlow - Statement reconciliation and export
// Copyright (c) 2025 VaultFlow Contributors
// Licensed under the MIT License

//! # VaultFlow - Statement reconciliation and export
//!
//! VaultFlow is the data core behind the VaultFlow admin statements view. It
//! pulls monthly metrics and the transfer ledger from the banking API,
//! reconciles them into one consistent picture and produces CSV or PDF
//! statements, falling back to local builders when the server cannot deliver.
//!
//! ## Overview
//!
//! This library provides:
//! - **Authorization**: role claims decoded from a bearer token and checked
//!   against a configurable policy
//! - **Negotiation**: the metrics endpoint is probed with a fixed ladder of
//!   date encodings until one is accepted
//! - **Ledger parsing**: a total, quote-aware delimited parser
//! - **Reconciliation**: ledger-derived series replace missing or synthetic
//!   metrics series
//! - **Export**: server documents first, local CSV/PDF builders second
//! - **Refresh**: latest-wins publication of the canonical state
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Claims, ledger, reconciliation, export and refresh logic
//! - [`adapters`] - Banking API client and credential storage
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
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
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("vaultflow.toml")?;
//!     let store = Arc::new(MemoryCredentialStore::with_token("token", config.api.token.clone()));
//!     let client = ApiClient::new(&config.api, store, "token")?;
//!
//!     let coordinator = RefreshCoordinator::new(
//!         QueryNegotiator::new(client.clone(), &config.api.metrics_path),
//!         StatementClient::new(client, &config.api.statements_path),
//!         Reconciler::default(),
//!     );
//!
//!     let range = DateRange::month(2025, 3)?;
//!     if let Some(state) = coordinator.refresh(&range).await.state() {
//!         println!("Total transferred: {}", state.snapshot.total_transferred);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`], backed by
//! [`domain::VaultFlowError`]. Parsing and reconciliation are total and never
//! fail.
//!
//! ## Logging
//!
//! VaultFlow uses structured logging with the `tracing` crate; see
//! [`logging::init_logging`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
