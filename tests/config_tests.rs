// Config loading and validation tests

use std::time::Duration;
use whale::config::AppConfig;

const VALID_CONFIG: &str = r#"
[collector]
max_concurrency = 8
fetch_timeout_ms = 2500
oneshot_timeout_secs = 30

[watch]
interval_ms = 1000
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.collector.max_concurrency, 8);
    assert_eq!(config.collector.fetch_timeout_ms, 2500);
    assert_eq!(config.collector.oneshot_timeout(), Duration::from_secs(30));
    assert_eq!(config.watch.interval(), Duration::from_secs(1));

    let fetcher = config.collector.fetcher();
    assert_eq!(fetcher.max_concurrency, 8);
    assert_eq!(fetcher.fetch_timeout, Duration::from_millis(2500));
}

#[test]
fn test_config_defaults_when_empty() {
    let config = AppConfig::load_from_str("").expect("empty config is valid");
    assert_eq!(config.collector.max_concurrency, 16);
    assert_eq!(config.collector.fetch_timeout_ms, 1500);
    assert_eq!(config.collector.oneshot_timeout_secs, 15);
    assert_eq!(config.watch.interval_ms, 2000);
}

#[test]
fn test_config_partial_section_keeps_other_defaults() {
    let config = AppConfig::load_from_str("[collector]\nmax_concurrency = 4\n").unwrap();
    assert_eq!(config.collector.max_concurrency, 4);
    assert_eq!(config.collector.fetch_timeout_ms, 1500);
    assert_eq!(config.watch.interval_ms, 2000);
}

#[test]
fn test_config_validation_rejects_zero_concurrency() {
    let bad = VALID_CONFIG.replace("max_concurrency = 8", "max_concurrency = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("collector.max_concurrency"));
}

#[test]
fn test_config_validation_rejects_zero_fetch_timeout() {
    let bad = VALID_CONFIG.replace("fetch_timeout_ms = 2500", "fetch_timeout_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("collector.fetch_timeout_ms"));
}

#[test]
fn test_config_validation_rejects_zero_oneshot_timeout() {
    let bad = VALID_CONFIG.replace("oneshot_timeout_secs = 30", "oneshot_timeout_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("collector.oneshot_timeout_secs"));
}

#[test]
fn test_config_validation_rejects_zero_interval() {
    let bad = VALID_CONFIG.replace("interval_ms = 1000", "interval_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("watch.interval_ms"));
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_file_env_var() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("whale.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();

    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let loaded = AppConfig::load();
    unsafe { std::env::set_var("CONFIG_FILE", dir.path().join("missing.toml")) };
    let missing = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };

    assert_eq!(loaded.expect("load from CONFIG_FILE").collector.max_concurrency, 8);
    let err = missing.unwrap_err();
    assert!(err.to_string().contains("missing.toml"));
}
