use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("unknown").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "NOVASCAN_ENV"));
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert!((cfg.min_quality - 40.0).abs() < f64::EPSILON);
    assert!(cfg.embed_url.is_none());
    assert_eq!(cfg.embed_batch_size, 5);
    assert_eq!(cfg.embed_batch_delay_ms, 2000);
    assert!(cfg.qdrant_url.is_none());
    assert_eq!(cfg.qdrant_collection, "social_signals");
    assert_eq!(cfg.queue_threshold, 10);
    assert!(cfg.heuristics_path.is_none());
}

#[test]
fn build_app_config_fails_on_invalid_env() {
    let mut map = HashMap::new();
    map.insert("NOVASCAN_ENV", "producton");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NOVASCAN_ENV"),
        "expected InvalidEnvVar(NOVASCAN_ENV), got: {result:?}"
    );
}

#[test]
fn embed_url_trailing_slash_is_trimmed() {
    let mut map = HashMap::new();
    map.insert("NOVASCAN_EMBED_URL", "http://localhost:8080/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.embed_url.as_deref(), Some("http://localhost:8080"));
}

#[test]
fn blank_optional_values_are_none() {
    let mut map = HashMap::new();
    map.insert("NOVASCAN_QDRANT_URL", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.qdrant_url.is_none());
}

#[test]
fn embed_batch_size_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("NOVASCAN_EMBED_BATCH_SIZE", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NOVASCAN_EMBED_BATCH_SIZE"),
        "expected InvalidEnvVar(NOVASCAN_EMBED_BATCH_SIZE), got: {result:?}"
    );
}

#[test]
fn embed_batch_delay_override() {
    let mut map = HashMap::new();
    map.insert("NOVASCAN_EMBED_BATCH_DELAY_MS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.embed_batch_delay_ms, 0);
}

#[test]
fn embed_batch_delay_invalid() {
    let mut map = HashMap::new();
    map.insert("NOVASCAN_EMBED_BATCH_DELAY_MS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NOVASCAN_EMBED_BATCH_DELAY_MS"),
        "expected InvalidEnvVar(NOVASCAN_EMBED_BATCH_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn min_quality_override() {
    let mut map = HashMap::new();
    map.insert("NOVASCAN_MIN_QUALITY", "55.5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!((cfg.min_quality - 55.5).abs() < f64::EPSILON);
}

#[test]
fn min_quality_out_of_range_is_rejected() {
    let mut map = HashMap::new();
    map.insert("NOVASCAN_MIN_QUALITY", "140");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NOVASCAN_MIN_QUALITY"),
        "expected InvalidEnvVar(NOVASCAN_MIN_QUALITY), got: {result:?}"
    );
}

#[test]
fn queue_threshold_invalid() {
    let mut map = HashMap::new();
    map.insert("NOVASCAN_QUEUE_THRESHOLD", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NOVASCAN_QUEUE_THRESHOLD"),
        "expected InvalidEnvVar(NOVASCAN_QUEUE_THRESHOLD), got: {result:?}"
    );
}

#[test]
fn debug_redacts_qdrant_api_key() {
    let mut map = HashMap::new();
    map.insert("NOVASCAN_QDRANT_API_KEY", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[redacted]"));
}
