//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "vaultflow.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing VaultFlow configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        match fs::write(&self.output, sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your API base URL", self.output);
                println!("  2. Put VAULTFLOW_API_TOKEN=<bearer token> in a .env file");
                println!("  3. Validate configuration: vaultflow validate-config");
                println!("  4. Export a statement: vaultflow export --format pdf");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}

/// Sample configuration with every section and its defaults
pub fn sample_config() -> &'static str {
    r#"# VaultFlow Configuration File

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

[api]
# Banking API base URL
base_url = "https://bank.example.com"
metrics_path = "/api/admin/metrics"
statements_path = "/api/admin/statements"
timeout_seconds = 30
tls_verify = true

# Bearer token (keep it out of this file)
token = "${VAULTFLOW_API_TOKEN}"

[authorization]
# Roles the token must carry for metrics and export
required_roles = ["ADMIN"]
storage_key = "token"

[reconcile]
# A daily series with fewer value changes than
# max(synthetic_min_changes, synthetic_change_ratio * days) is treated as a placeholder
synthetic_min_changes = 3
synthetic_change_ratio = 0.15
unusual_percentile = 0.95

[export]
output_dir = "./statements"
pdf_max_rows = 20
pdf_title = "VaultFlow - Monthly Statement"

[logging]
local_enabled = false
local_path = "/var/log/vaultflow"
local_rotation = "daily"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_writes_file() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("vaultflow.toml");
        let args = InitArgs {
            output: output.display().to_string(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), EXIT_OK);
        assert!(fs::read_to_string(&output).unwrap().contains("[api]"));
    }

    #[tokio::test]
    async fn test_init_refuses_overwrite() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("vaultflow.toml");
        fs::write(&output, "existing").unwrap();
        let args = InitArgs {
            output: output.display().to_string(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), EXIT_CONFIG);
        assert_eq!(fs::read_to_string(&output).unwrap(), "existing");
    }

    #[test]
    fn test_sample_config_parses() {
        std::env::set_var("VAULTFLOW_API_TOKEN", "a.b.c");
        let config = crate::config::load_config_str(sample_config()).unwrap();
        assert_eq!(config.export.output_dir, "./statements");
    }
}
