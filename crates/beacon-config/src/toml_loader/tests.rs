//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use crate::schema::LogLevel;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_beacon_config.toml"));
    let err = result.unwrap_err();
    assert!(matches!(err, beacon_common::ConfigError::FileNotFound(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[presence]
service_url = "http://localhost:8080/presence"
initialize_worker = true

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.presence.service_url, "http://localhost:8080/presence");
    assert!(config.presence.initialize_worker);
    assert_eq!(config.logging.level, LogLevel::Debug);
    // Defaults preserved
    assert_eq!(config.presence.subscription_ttl, 600);
    assert_eq!(config.worker.renew_margin, 60);
}

#[test]
fn load_empty_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "").unwrap();

    let config = load_from_path(&path).unwrap();
    assert!(!config.presence.initialize_worker);
    assert_eq!(config.worker.groundskeeper_interval, 20);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[presence\nservice_url = ").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, beacon_common::ConfigError::ParseError(_)));
}

#[test]
fn out_of_range_values_still_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[worker]\ngroundskeeper_interval = 1\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.worker.groundskeeper_interval, 1);
}

#[test]
fn create_default_config_writes_loadable_template() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.presence.service_url, "https://presence.beacon.dev/api/v1");
}

#[test]
fn default_config_path_ends_with_beacon_config() {
    if let Ok(path) = default_config_path() {
        assert!(path.ends_with("beacon/config.toml"));
    }
}
