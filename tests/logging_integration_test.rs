//! Integration tests for logging functionality
//!
//! A global subscriber can only be installed once per process, so everything
//! that calls `init_logging` lives in a single test.

use tempfile::TempDir;
use vaultflow::config::{load_config_str, LoggingConfig};
use vaultflow::logging::init_logging;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_logging_section_validation() {
    let config = load_config_str(
        "[logging]\nlocal_enabled = true\nlocal_path = \"./logs\"\nlocal_rotation = \"hourly\"\n",
    )
    .unwrap();
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");

    assert!(load_config_str("[logging]\nlocal_enabled = true\nlocal_path = \"\"\n").is_err());
}

#[test]
fn test_init_logging_with_file_layer() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");
    assert!(!log_path.exists());

    assert!(init_logging("verbose", &LoggingConfig::default()).is_err());

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "daily".to_string(),
    };

    let guard = init_logging("debug", &config).unwrap();
    assert!(log_path.is_dir());

    vaultflow::log_fallback!("csv", "server returned 503");
    drop(guard);

    let written: Vec<_> = std::fs::read_dir(&log_path).unwrap().collect();
    assert!(!written.is_empty());

    // a second global subscriber is refused
    assert!(init_logging("info", &LoggingConfig::default()).is_err());
}
