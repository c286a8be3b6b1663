//! Configuration tests
//!
//! The round-trip tests guard `to_toml()`: every field written to the
//! template must parse back into the same value, so a new field that is
//! forgotten in serialization fails here.

use super::*;
use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

fn no_env() -> impl Fn(&str) -> Option<String> {
    |_| None
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let toml_str = config.to_toml();

    let parsed: Result<FileConfig, _> = toml::from_str(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );
}

/// Every field survives to_toml -> parse -> resolve
#[test]
fn test_config_roundtrip_preserves_values() {
    let config = Config {
        api_url: "http://honeypot.internal:9000/api".to_string(),
        page_size: 25,
        error_message_ms: 8000,
        success_message_ms: 0,
        stats_days: 30,
        request_timeout_secs: Some(12),
        demo_mode: false,
        demo_addr: "127.0.0.1:9999".parse().unwrap(),
        logging: LoggingConfig {
            level: "debug".to_string(),
            file_enabled: true,
            file_dir: PathBuf::from("/tmp/honeyscope-logs"),
            file_rotation: LogRotation::Hourly,
            file_prefix: "hs".to_string(),
        },
    };

    let file: FileConfig = toml::from_str(&config.to_toml()).unwrap();
    let resolved = Config::resolve(file, no_env());

    assert_eq!(resolved.api_url, config.api_url);
    assert_eq!(resolved.page_size, 25);
    assert_eq!(resolved.error_message_ms, 8000);
    assert_eq!(resolved.success_message_ms, 0);
    assert_eq!(resolved.stats_days, 30);
    assert_eq!(resolved.request_timeout_secs, Some(12));
    assert_eq!(resolved.demo_addr, config.demo_addr);
    assert_eq!(resolved.logging.level, "debug");
    assert!(resolved.logging.file_enabled);
    assert_eq!(resolved.logging.file_dir, config.logging.file_dir);
    assert_eq!(resolved.logging.file_rotation, LogRotation::Hourly);
    assert_eq!(resolved.logging.file_prefix, "hs");
}

#[test]
fn test_unset_timeout_is_commented_out() {
    let toml_str = Config::default().to_toml();
    assert!(toml_str.contains("# request_timeout_secs"));

    let file: FileConfig = toml::from_str(&toml_str).unwrap();
    assert_eq!(file.request_timeout_secs, None);
}

// ─────────────────────────────────────────────────────────────────────────────
// Precedence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_sources_give_defaults() {
    let config = Config::resolve(FileConfig::default(), no_env());

    assert_eq!(config.api_url, "http://localhost:8083/api");
    assert_eq!(config.page_size, 50);
    assert_eq!(config.error_message_ms, 5000);
    assert_eq!(config.success_message_ms, 3000);
    assert_eq!(config.stats_days, 7);
    assert_eq!(config.request_timeout_secs, None);
    assert!(!config.demo_mode);
    assert_eq!(config.demo_api_url(), "http://127.0.0.1:8083/api");
}

#[test]
fn test_env_overrides_file() {
    let file = FileConfig {
        api_url: Some("http://from-file/api".to_string()),
        page_size: Some(20),
        request_timeout_secs: Some(5),
        ..Default::default()
    };
    let env = env_from(&[
        ("HONEYSCOPE_API_URL", "http://from-env/api"),
        ("HONEYSCOPE_PAGE_SIZE", "100"),
        ("HONEYSCOPE_TIMEOUT_SECS", "9"),
        ("HONEYSCOPE_DEMO", "true"),
    ]);

    let config = Config::resolve(file, env);
    assert_eq!(config.api_url, "http://from-env/api");
    assert_eq!(config.page_size, 100);
    assert_eq!(config.request_timeout_secs, Some(9));
    assert!(config.demo_mode);
}

#[test]
fn test_file_used_when_env_unset_or_garbage() {
    let file = FileConfig {
        page_size: Some(20),
        ..Default::default()
    };
    let env = env_from(&[("HONEYSCOPE_PAGE_SIZE", "lots")]);

    assert_eq!(Config::resolve(file, env).page_size, 20);
}

#[test]
fn test_zero_page_size_rejected() {
    let file = FileConfig {
        page_size: Some(0),
        ..Default::default()
    };
    assert_eq!(Config::resolve(file, no_env()).page_size, 50);
}

#[test]
fn test_page_size_capped_at_api_limit() {
    let file = FileConfig {
        page_size: Some(5000),
        ..Default::default()
    };
    assert_eq!(Config::resolve(file, no_env()).page_size, MAX_PAGE_SIZE);

    let env = env_from(&[("HONEYSCOPE_PAGE_SIZE", "500")]);
    assert_eq!(Config::resolve(FileConfig::default(), env).page_size, 500);
}

#[test]
fn test_bad_demo_addr_falls_back() {
    let file = FileConfig {
        demo_addr: Some("not an address".to_string()),
        ..Default::default()
    };
    assert_eq!(
        Config::resolve(file, no_env()).demo_addr.to_string(),
        DEFAULT_DEMO_ADDR
    );
}

#[test]
fn test_log_rotation_parse() {
    assert_eq!(LogRotation::from_str("HOURLY"), LogRotation::Hourly);
    assert_eq!(LogRotation::from_str("never"), LogRotation::Never);
    assert_eq!(LogRotation::from_str("weekly"), LogRotation::Daily);
}
