use std::path::PathBuf;

use tankwatch::error::{ConfigError, Error};
use tankwatch::infrastructure::config::settings::Config;

mod support;
use support::config::write_temp_config;

#[test]
fn config_file_values_are_loaded() {
    let (_dir, path) = write_temp_config(
        r#"
[telegram]
check_interval_secs = 30
min_change_threshold = 1.5

[storage]
subscribers_file = "state/subs.txt"

[feed]
url = "wss://push.example.com/lightstreamer"
connect_timeout_secs = 10

[feed.reconnection]
initial_delay_ms = 250
max_delay_ms = 5000

[logging]
level = "debug"
format = "json"
"#,
    );

    let config = Config::from_sources(
        &std::fs::read_to_string(&path).unwrap(),
        |_| None,
    )
    .unwrap();

    assert_eq!(config.telegram.check_interval_secs, 30);
    assert!((config.telegram.min_change_threshold - 1.5).abs() < f64::EPSILON);
    assert_eq!(config.storage.subscribers_file, PathBuf::from("state/subs.txt"));
    assert_eq!(config.feed.url, "wss://push.example.com/lightstreamer");
    assert_eq!(config.feed.adapter_set, "ISSLIVE");
    assert_eq!(config.feed.connect_timeout_secs, 10);
    assert_eq!(config.feed.reconnection.initial_delay_ms, 250);
    assert!((config.feed.reconnection.backoff_multiplier - 2.0).abs() < f64::EPSILON);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
}

#[test]
fn config_load_reads_file() {
    let (_dir, path) = write_temp_config("[feed]\nitem = \"NODE3000004\"\n");
    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.feed.item, "NODE3000004");
}

#[test]
fn missing_config_file_is_read_error() {
    let err = Config::load(Some("/nonexistent/tankwatch.toml")).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
}

#[test]
fn config_rejects_negative_threshold() {
    let err = Config::from_sources(
        "[telegram]\nmin_change_threshold = -0.5\n",
        |_| None,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue {
            field: "min_change_threshold",
            ..
        })
    ));
    assert!(err.to_string().contains("min_change_threshold"));
}

#[test]
fn config_rejects_empty_item() {
    let err = Config::from_sources("[feed]\nitem = \"  \"\n", |_| None).unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::MissingField { field: "feed.item" })
    ));
}

#[test]
fn config_rejects_zero_connect_timeout() {
    let err =
        Config::from_sources("[feed]\nconnect_timeout_secs = 0\n", |_| None).unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue {
            field: "connect_timeout_secs",
            ..
        })
    ));
}

#[test]
fn config_rejects_max_delay_below_initial() {
    let err = Config::from_sources(
        "[feed.reconnection]\ninitial_delay_ms = 5000\nmax_delay_ms = 1000\n",
        |_| None,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue {
            field: "max_delay_ms",
            ..
        })
    ));
}

#[test]
fn token_is_never_read_from_file() {
    let config = Config::from_sources("[telegram]\ntoken = \"from-file\"\n", |_| None);
    // Unknown keys are ignored; the token only comes from the environment.
    let config = config.unwrap();
    assert!(config.telegram.token.is_none());
    assert!(config.require_token().is_err());
}
