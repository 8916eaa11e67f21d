// VaultFlow - Statement reconciliation and export
// Copyright (c) 2025 VaultFlow Contributors
// Licensed under the MIT License

use clap::Parser;
use std::process;
use vaultflow::cli::{Cli, Commands, EXIT_FATAL};
use vaultflow::logging::init_logging;

#[tokio::main]
async fn main() {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (log_level, logging_config) = cli.logging_settings();
    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FATAL);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "VaultFlow - Statement reconciliation and export"
    );

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    // process::exit skips destructors, flush the file writer first
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Init(args) => args.execute().await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Roles(args) => args.execute(&cli.config).await,
        Commands::Metrics(args) => args.execute(&cli.config).await,
        Commands::Export(args) => args.execute(&cli.config).await,
    }
}
