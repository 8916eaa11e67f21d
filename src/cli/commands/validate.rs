//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the VaultFlow configuration file.

use crate::cli::{EXIT_CONFIG, EXIT_OK};
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  API Base URL: {}", config.api.base_url);
        println!("  Metrics Path: {}", config.api.metrics_path);
        println!("  Statements Path: {}", config.api.statements_path);
        println!(
            "  Token: {}",
            if config.api.token.is_some() {
                "configured"
            } else {
                "not set"
            }
        );
        println!(
            "  Required Roles: {}",
            config.authorization.required_roles.join(", ")
        );
        println!("  Output Directory: {}", config.export.output_dir);
        println!();
        Ok(EXIT_OK)
    }
}
