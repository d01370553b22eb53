//! Configuration file loading tests.

use std::io::Write;
use std::time::Duration;

use fildeal::config::{Config, DEFAULT_NODE_URL};
use fildeal::error::{ConfigError, Error};
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn loads_full_config_file() {
    let file = write_config(
        r#"
[node]
ws_url = "ws://node.example:1234/rpc/v0"

[deal]
epoch_price = "5000"
min_blocks_duration = 600

[tracker]
poll_interval_ms = 500
deadline_secs = 120

[logging]
level = "debug"
format = "json"
"#,
    );

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.node.ws_url, "ws://node.example:1234/rpc/v0");
    assert_eq!(config.deal.epoch_price, "5000");
    assert_eq!(config.deal.min_blocks_duration, 600);
    assert_eq!(config.tracker.cadence(), Duration::from_millis(500));
    assert_eq!(config.tracker.deadline(), Some(Duration::from_secs(120)));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn partial_file_keeps_defaults_for_missing_sections() {
    let file = write_config("[tracker]\npoll_interval_ms = 2000\n");

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.node.ws_url, DEFAULT_NODE_URL);
    assert_eq!(config.tracker.cadence(), Duration::from_secs(2));
    assert_eq!(config.tracker.deadline(), None);
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let file = write_config("[node\nws_url = oops");

    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
}

#[test]
fn missing_file_is_a_read_error() {
    let err = Config::load("/nonexistent/fildeal.toml").unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
}

#[test]
fn invalid_endpoint_scheme_fails_validation() {
    let file = write_config("[node]\nws_url = \"http://localhost:7777\"\n");

    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue {
            field: "node.ws_url",
            ..
        })
    ));
}
