use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use enrich_cli::cli::GlobalArgs;
use enrich_cli::config::{load, CliConfig, ConfigError, LogOutput};
use enrich_client::MAX_POLL_INTERVAL;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn missing_file_yields_defaults() {
    let temp = TempDir::new().unwrap();
    let config = load(&temp.path().join("enrich.ron")).unwrap();
    assert_eq!(config, CliConfig::default());
    assert_eq!(config.base_url, "http://127.0.0.1:8000");
    assert_eq!(config.poll_interval_ms, 2000);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("enrich.ron");
    fs::write(
        &path,
        r#"(
    base_url: "https://enrich.example.com",
    poll_interval_ms: 500,
    log_output: Both,
)"#,
    )
    .unwrap();

    let config = load(&path).unwrap();
    assert_eq!(config.base_url, "https://enrich.example.com");
    assert_eq!(config.poll_interval_ms, 500);
    assert_eq!(config.log_output, LogOutput::Both);
    assert_eq!(config.output_dir, CliConfig::default().output_dir);

    let settings = config.client_settings();
    assert_eq!(settings.poll_interval, Duration::from_millis(500));
    assert_eq!(settings.connect_timeout, Duration::from_secs(10));
    assert_eq!(
        settings.stream_url("j").unwrap().as_str(),
        "wss://enrich.example.com/ws/j"
    );
}

#[test]
fn invalid_file_is_a_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("enrich.ron");
    fs::write(&path, "(base_url: 42").unwrap();

    assert!(matches!(load(&path), Err(ConfigError::Parse { .. })));
}

#[test]
fn flags_override_file_values() {
    let mut config = CliConfig {
        base_url: "http://from-file:8000".to_string(),
        ..CliConfig::default()
    };
    let flags = GlobalArgs {
        base_url: Some("http://from-flag:9000".to_string()),
        output: Some(PathBuf::from("results")),
        log: Some(LogOutput::Terminal),
        ..GlobalArgs::default()
    };

    flags.apply_to(&mut config);
    assert_eq!(config.base_url, "http://from-flag:9000");
    assert_eq!(config.output_dir, PathBuf::from("results"));
    assert_eq!(config.log_output, LogOutput::Terminal);
    assert_eq!(config.poll_interval_ms, CliConfig::default().poll_interval_ms);
}

#[test]
fn oversized_poll_interval_is_capped() {
    let config = CliConfig {
        poll_interval_ms: u64::MAX,
        ..CliConfig::default()
    };
    assert_eq!(config.client_settings().poll_interval, MAX_POLL_INTERVAL);
}
