//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for VaultFlow using clap.

pub mod commands;
pub mod session;
pub mod sink;

use crate::config::{load_config, LoggingConfig};
use clap::{Parser, Subcommand};

/// Exit code for success
pub const EXIT_OK: i32 = 0;
/// Exit code for configuration errors
pub const EXIT_CONFIG: i32 = 2;
/// Exit code when the authorization policy denies access
pub const EXIT_ACCESS_DENIED: i32 = 3;
/// Exit code for fatal errors
pub const EXIT_FATAL: i32 = 5;

/// VaultFlow - statement reconciliation and export
#[derive(Parser, Debug)]
#[command(name = "vaultflow")]
#[command(version, about, long_about = None)]
#[command(author = "VaultFlow Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "vaultflow.toml", env = "VAULTFLOW_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "VAULTFLOW_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log level and logging section for this invocation
    ///
    /// `--log-level` wins over `application.log_level`. `init` never reads the
    /// config, and an unreadable config falls back to console-only logging so
    /// the command can report the problem itself.
    pub fn logging_settings(&self) -> (String, LoggingConfig) {
        let config = match self.command {
            Commands::Init(_) => None,
            _ => load_config(&self.config).ok(),
        };

        match config {
            Some(config) => (
                self.log_level
                    .clone()
                    .unwrap_or(config.application.log_level),
                config.logging,
            ),
            None => (
                self.log_level.clone().unwrap_or_else(|| "info".to_string()),
                LoggingConfig::default(),
            ),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Decode a token's roles and evaluate the access policy
    Roles(commands::roles::RolesArgs),

    /// Refresh and print the reconciled metrics for a month
    Metrics(commands::metrics::MetricsArgs),

    /// Export a monthly statement as CSV or PDF
    Export(commands::export::ExportArgs),
}
