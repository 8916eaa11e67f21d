//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::VaultFlowConfig;
use super::secret::secret_string;
use crate::domain::errors::VaultFlowError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into VaultFlowConfig
/// 4. Applies environment variable overrides (VAULTFLOW_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, a referenced variable is not
/// set, TOML parsing fails, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use vaultflow::config::loader::load_config;
///
/// let config = load_config("vaultflow.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<VaultFlowConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(VaultFlowError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        VaultFlowError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_str(&contents)
}

/// Same as [`load_config`], from an in-memory TOML document
pub fn load_config_str(contents: &str) -> Result<VaultFlowConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: VaultFlowConfig = toml::from_str(&contents)
        .map_err(|e| VaultFlowError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        VaultFlowError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| VaultFlowError::Configuration(format!("Invalid pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(VaultFlowError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using VAULTFLOW_* prefix
///
/// Variables follow the pattern `VAULTFLOW_<SECTION>_<KEY>`, for example
/// `VAULTFLOW_API_BASE_URL` or `VAULTFLOW_API_TOKEN`.
fn apply_env_overrides(config: &mut VaultFlowConfig) {
    if let Ok(val) = std::env::var("VAULTFLOW_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // API overrides
    if let Ok(val) = std::env::var("VAULTFLOW_API_BASE_URL") {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("VAULTFLOW_API_TOKEN") {
        config.api.token = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("VAULTFLOW_API_TIMEOUT_SECONDS") {
        if let Ok(secs) = val.parse() {
            config.api.timeout_seconds = secs;
        }
    }
    if let Ok(val) = std::env::var("VAULTFLOW_API_TLS_VERIFY") {
        config.api.tls_verify = val.parse().unwrap_or(true);
    }

    // Authorization overrides
    if let Ok(val) = std::env::var("VAULTFLOW_AUTHORIZATION_REQUIRED_ROLES") {
        config.authorization.required_roles = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Ok(val) = std::env::var("VAULTFLOW_AUTHORIZATION_STORAGE_KEY") {
        config.authorization.storage_key = val;
    }

    // Export overrides
    if let Ok(val) = std::env::var("VAULTFLOW_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("VAULTFLOW_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("VAULTFLOW_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
