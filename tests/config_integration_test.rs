//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables should be run with --test-threads=1
//! to avoid interference between tests.

use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;
use vaultflow::config::load_config;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("VAULTFLOW_APPLICATION_LOG_LEVEL");
    std::env::remove_var("VAULTFLOW_API_BASE_URL");
    std::env::remove_var("VAULTFLOW_API_TOKEN");
    std::env::remove_var("VAULTFLOW_AUTHORIZATION_REQUIRED_ROLES");
    std::env::remove_var("VAULTFLOW_EXPORT_OUTPUT_DIR");
    std::env::remove_var("TEST_VAULTFLOW_TOKEN");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"

[api]
base_url = "https://bank.example.com/"
metrics_path = "/api/admin/metrics"
statements_path = "/api/admin/statements"
timeout_seconds = 10
tls_verify = false
token = "header.payload.signature"

[authorization]
required_roles = ["admin", "user"]
storage_key = "session-token"

[reconcile]
synthetic_min_changes = 4
synthetic_change_ratio = 0.2
unusual_percentile = 0.9

[export]
output_dir = "./statements"
pdf_max_rows = 25
pdf_title = "Monthly Statement"

[logging]
local_enabled = false
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.api.base_url, "https://bank.example.com/");
    assert_eq!(config.api.timeout_seconds, 10);
    assert!(!config.api.tls_verify);
    assert_eq!(
        config.api.token.as_ref().unwrap().expose_secret().as_ref(),
        "header.payload.signature"
    );
    assert_eq!(config.authorization.storage_key, "session-token");
    assert_eq!(config.reconcile.synthetic_min_changes, 4);
    assert_eq!(config.export.pdf_max_rows, 25);
    assert_eq!(config.export.pdf_title, "Monthly Statement");
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_minimal_config_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("[api]\nbase_url = \"http://localhost:8080\"\n");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.api.metrics_path, "/api/admin/metrics");
    assert_eq!(config.api.statements_path, "/api/admin/statements");
    assert_eq!(config.api.timeout_seconds, 30);
    assert!(config.api.tls_verify);
    assert!(config.api.token.is_none());
    assert_eq!(config.authorization.required_roles, vec!["ADMIN"]);
    assert_eq!(config.authorization.storage_key, "token");
    assert_eq!(config.reconcile.synthetic_min_changes, 3);
    assert_eq!(config.export.pdf_max_rows, 20);
    assert_eq!(config.export.output_dir, ".");
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_VAULTFLOW_TOKEN", "h.substituted.s");

    let file = write_config(
        r#"
# token = "${NOT_SUBSTITUTED_IN_COMMENTS}"
[api]
base_url = "https://bank.example.com"
token = "${TEST_VAULTFLOW_TOKEN}"
"#,
    );
    let config = load_config(file.path()).unwrap();

    assert_eq!(
        config.api.token.as_ref().unwrap().expose_secret().as_ref(),
        "h.substituted.s"
    );
    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_is_reported() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[api]
base_url = "https://bank.example.com"
token = "${TEST_VAULTFLOW_TOKEN}"
"#,
    );
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_VAULTFLOW_TOKEN"));
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("VAULTFLOW_API_BASE_URL", "https://override.example.com");
    std::env::set_var("VAULTFLOW_AUTHORIZATION_REQUIRED_ROLES", "ADMIN, AUDITOR");
    std::env::set_var("VAULTFLOW_EXPORT_OUTPUT_DIR", "/tmp/statements");

    let file = write_config("[api]\nbase_url = \"https://bank.example.com\"\n");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.api.base_url, "https://override.example.com");
    assert_eq!(config.authorization.required_roles, vec!["ADMIN", "AUDITOR"]);
    assert_eq!(config.export.output_dir, "/tmp/statements");
    cleanup_env_vars();
}

#[test]
fn test_invalid_configs_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let cases = [
        "[api]\nbase_url = \"ftp://bank.example.com\"\n",
        "[api]\nbase_url = \"https://bank.example.com\"\ntimeout_seconds = 0\n",
        "[api]\nbase_url = \"https://bank.example.com\"\nmetrics_path = \"metrics\"\n",
        "[authorization]\nstorage_key = \"  \"\n",
        "[reconcile]\nsynthetic_change_ratio = 1.5\n",
        "[reconcile]\nunusual_percentile = 0.0\n",
        "[export]\npdf_max_rows = 0\n",
        "[export]\npdf_max_rows = 41\n",
        "[logging]\nlocal_rotation = \"weekly\"\n",
        "[application]\nlog_level = \"verbose\"\n",
    ];

    for contents in cases {
        let file = write_config(contents);
        assert!(
            load_config(file.path()).is_err(),
            "expected rejection for:\n{contents}"
        );
    }
}

#[test]
fn test_malformed_toml() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("[api\nbase_url = ");
    assert!(load_config(file.path()).is_err());
}
