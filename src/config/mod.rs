//! Configuration management for VaultFlow.
//!
//! # Overview
//!
//! VaultFlow uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `VAULTFLOW_<SECTION>_<KEY>` overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ApiConfig`] - Endpoint base URL, paths, timeout, bearer token
//! - [`AuthorizationConfig`] - Required roles and token storage key
//! - [`ReconcileConfig`] - Synthetic-series and unusual-activity thresholds
//! - [`ExportConfig`] - Output directory and PDF layout
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [api]
//! base_url = "https://bank.example.com"
//! token = "${VAULTFLOW_API_TOKEN}"
//!
//! [authorization]
//! required_roles = ["ADMIN"]
//! storage_key = "token"
//!
//! [export]
//! output_dir = "./statements"
//! ```
//!
//! # Validation
//!
//! ```rust,no_run
//! use vaultflow::config::load_config;
//!
//! match load_config("vaultflow.toml") {
//!     Ok(_) => println!("Configuration valid"),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_str};
pub use schema::{
    ApiConfig, ApplicationConfig, AuthorizationConfig, ExportConfig, LoggingConfig,
    ReconcileConfig, VaultFlowConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
