//! Configuration schema types
//!
//! This module defines the configuration structure for VaultFlow.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main VaultFlow configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultFlowConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Remote API settings
    pub api: ApiConfig,

    /// Access policy for elevated commands
    #[serde(default)]
    pub authorization: AuthorizationConfig,

    /// Series reconciliation tuning
    #[serde(default)]
    pub reconcile: ReconcileConfig,

    /// Statement export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl VaultFlowConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.api.validate()?;
        self.authorization.validate()?;
        self.reconcile.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Remote API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the banking API (scheme + host + optional prefix)
    pub base_url: String,

    /// Path of the monthly metrics endpoint
    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,

    /// Path prefix of the statement endpoints
    #[serde(default = "default_statements_path")]
    pub statements_path: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification enabled
    ///
    /// Only disable against local development servers.
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Bearer token (optional)
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub token: Option<SecretString>,
}

impl ApiConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("api.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("api.base_url must start with http:// or https://".to_string());
        }

        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| format!("api.base_url is not a valid URL: {e}"))?;
        if parsed.host_str().is_none() {
            return Err("api.base_url must include a host".to_string());
        }

        if !self.metrics_path.starts_with('/') {
            return Err("api.metrics_path must start with '/'".to_string());
        }

        if !self.statements_path.starts_with('/') {
            return Err("api.statements_path must start with '/'".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("api.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            metrics_path: default_metrics_path(),
            statements_path: default_statements_path(),
            timeout_seconds: default_timeout_seconds(),
            tls_verify: true,
            token: None,
        }
    }
}

/// Authorization policy configuration
///
/// Admin access requires every role in `required_roles`. The default is
/// `["ADMIN"]`; set `["ADMIN", "USER"]` to require both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationConfig {
    /// Roles a token must carry, compared case-insensitively
    #[serde(default = "default_required_roles")]
    pub required_roles: Vec<String>,

    /// Credential store key holding the bearer token
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl AuthorizationConfig {
    fn validate(&self) -> Result<(), String> {
        if self.storage_key.trim().is_empty() {
            return Err("authorization.storage_key cannot be empty".to_string());
        }
        if self.required_roles.iter().any(|r| r.trim().is_empty()) {
            return Err("authorization.required_roles cannot contain empty roles".to_string());
        }
        Ok(())
    }
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            required_roles: default_required_roles(),
            storage_key: default_storage_key(),
        }
    }
}

/// Reconciliation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Minimum number of day-to-day changes a real series must show
    #[serde(default = "default_synthetic_min_changes")]
    pub synthetic_min_changes: usize,

    /// Minimum share of days that must change in a real series
    #[serde(default = "default_synthetic_change_ratio")]
    pub synthetic_change_ratio: f64,

    /// Percentile above which a day counts as unusual
    #[serde(default = "default_unusual_percentile")]
    pub unusual_percentile: f64,
}

impl ReconcileConfig {
    fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.synthetic_change_ratio) {
            return Err(format!(
                "reconcile.synthetic_change_ratio must be between 0 and 1, got {}",
                self.synthetic_change_ratio
            ));
        }
        if !(self.unusual_percentile > 0.0 && self.unusual_percentile <= 1.0) {
            return Err(format!(
                "reconcile.unusual_percentile must be in (0, 1], got {}",
                self.unusual_percentile
            ));
        }
        Ok(())
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            synthetic_min_changes: default_synthetic_min_changes(),
            synthetic_change_ratio: default_synthetic_change_ratio(),
            unusual_percentile: default_unusual_percentile(),
        }
    }
}

/// Statement export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory the CLI saves artifacts into
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Maximum ledger rows printed in a locally built PDF
    #[serde(default = "default_pdf_max_rows")]
    pub pdf_max_rows: usize,

    /// Title line of a locally built PDF
    #[serde(default = "default_pdf_title")]
    pub pdf_title: String,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.pdf_max_rows == 0 || self.pdf_max_rows > 40 {
            return Err(format!(
                "export.pdf_max_rows must be between 1 and 40, got {}",
                self.pdf_max_rows
            ));
        }
        if self.output_dir.is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            pdf_max_rows: default_pdf_max_rows(),
            pdf_title: default_pdf_title(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log file path
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_metrics_path() -> String {
    "/api/admin/metrics".to_string()
}

fn default_statements_path() -> String {
    "/api/admin/statements".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_required_roles() -> Vec<String> {
    vec!["ADMIN".to_string()]
}

fn default_storage_key() -> String {
    "token".to_string()
}

fn default_synthetic_min_changes() -> usize {
    3
}

fn default_synthetic_change_ratio() -> f64 {
    0.15
}

fn default_unusual_percentile() -> f64 {
    0.95
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_pdf_max_rows() -> usize {
    20
}

fn default_pdf_title() -> String {
    "VaultFlow - Monthly Statement".to_string()
}

fn default_local_path() -> String {
    "/var/log/vaultflow".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> VaultFlowConfig {
        VaultFlowConfig {
            application: ApplicationConfig::default(),
            api: ApiConfig::default(),
            authorization: AuthorizationConfig::default(),
            reconcile: ReconcileConfig::default(),
            export: ExportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = base_config();
        config.application.log_level = "verbose".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("Invalid log_level"));
    }

    #[test]
    fn test_api_config_validation() {
        let mut config = base_config();
        config.api.base_url = "ftp://bank.example.com".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "https://bank.example.com".to_string();
        config.api.metrics_path = "api/admin/metrics".to_string();
        assert!(config.validate().is_err());

        config.api.metrics_path = default_metrics_path();
        config.api.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_authorization_config_validation() {
        let mut config = base_config();
        config.authorization.storage_key = "  ".to_string();
        assert!(config.validate().is_err());

        config.authorization.storage_key = "token".to_string();
        config.authorization.required_roles = vec!["ADMIN".to_string(), " ".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reconcile_config_validation() {
        let mut config = base_config();
        config.reconcile.synthetic_change_ratio = 1.5;
        assert!(config.validate().is_err());

        config.reconcile.synthetic_change_ratio = 0.15;
        config.reconcile.unusual_percentile = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_export_config_validation() {
        let mut config = base_config();
        config.export.pdf_max_rows = 0;
        assert!(config.validate().is_err());

        config.export.pdf_max_rows = 41;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = base_config();
        config.logging.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_values() {
        let config = base_config();
        assert_eq!(config.api.metrics_path, "/api/admin/metrics");
        assert_eq!(config.api.statements_path, "/api/admin/statements");
        assert_eq!(config.authorization.required_roles, vec!["ADMIN"]);
        assert_eq!(config.authorization.storage_key, "token");
        assert_eq!(config.reconcile.synthetic_min_changes, 3);
        assert_eq!(config.export.pdf_max_rows, 20);
        assert!(!config.logging.local_enabled);
    }
}
