//! Unit tests for config module

use std::fs;

use gridperf::Config;
use tempfile::TempDir;

#[test]
fn default_config_has_expected_values() {
    let config = Config::default();
    assert!(!config.display.seconds);
    assert!(config.display.color);
    assert_eq!(config.report.extension, "html");
    assert_eq!(config.timeline.unit_minutes, 5);
}

#[test]
fn config_serialization_roundtrip() {
    let mut config = Config::default();
    config.display.seconds = true;
    config.timeline.unit_minutes = 15;
    let toml_str = toml::to_string(&config).unwrap();
    let parsed: Config = toml::from_str(&toml_str).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let toml_str = r#"
[timeline]
unit_minutes = 10
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.timeline.unit_minutes, 10);
    assert_eq!(config.report.extension, "html");
    assert!(config.display.color);
}

#[test]
fn load_from_missing_file_returns_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::load_from(&temp_dir.path().join("config.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn load_from_reads_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[display]\nseconds = true\ncolor = false\n\n[report]\nextension = \"htm\"\n").unwrap();

    let config = Config::load_from(&path).unwrap();
    assert!(config.display.seconds);
    assert!(!config.display.color);
    assert_eq!(config.report_extension(), ".htm");
}

#[test]
fn load_from_rejects_invalid_toml() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[display\nseconds = ").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn load_from_rejects_empty_extension() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[report]\nextension = \"  \"\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("extension"));
}
