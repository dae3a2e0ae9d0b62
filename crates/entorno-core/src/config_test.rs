use std::collections::HashMap;
use std::env::VarError;
use std::io;

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

fn key_file(contents: &'static str) -> impl Fn(&Path) -> io::Result<String> {
    move |_| Ok(contents.to_string())
}

fn no_key_file(_: &Path) -> io::Result<String> {
    Err(io::Error::new(io::ErrorKind::NotFound, "no such file"))
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map), key_file("secret-key\n")).unwrap();
    assert_eq!(cfg.api_key, "secret-key");
    assert_eq!(cfg.api_key_path, PathBuf::from("system/api_key.txt"));
    assert_eq!(cfg.results_dir, PathBuf::from("system/results"));
    assert_eq!(cfg.problems_dir, PathBuf::from("system/problems"));
    assert_eq!(cfg.output_dir, PathBuf::from("output"));
    assert_eq!(cfg.categories_path, PathBuf::from("config/categories.yaml"));
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.base_url, "https://maps.googleapis.com/maps/api/");
    assert_eq!(cfg.language, "pt-BR");
    assert_eq!(cfg.region, "BR");
    assert_eq!(cfg.request_timeout_secs, 10);
    assert_eq!(cfg.details_timeout_secs, 5);
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.retry_backoff_base_ms, 500);
}

#[test]
fn build_app_config_fails_without_key_file() {
    let map = HashMap::new();
    let result = build_app_config(lookup_from_map(&map), no_key_file);
    assert!(
        matches!(result, Err(ConfigError::MissingApiKey { ref path, .. }) if path == "system/api_key.txt"),
        "expected MissingApiKey, got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_blank_key_file() {
    let map = HashMap::new();
    let result = build_app_config(lookup_from_map(&map), key_file("  \n"));
    assert!(matches!(result, Err(ConfigError::MissingApiKey { .. })));
}

#[test]
fn build_app_config_reads_key_from_overridden_path() {
    let mut map = HashMap::new();
    map.insert("ENTORNO_API_KEY_PATH", "/etc/entorno/key.txt");
    let seen = std::cell::RefCell::new(None);
    let cfg = build_app_config(lookup_from_map(&map), |path: &Path| {
        *seen.borrow_mut() = Some(path.to_path_buf());
        Ok("k".to_string())
    })
    .unwrap();
    assert_eq!(cfg.api_key, "k");
    assert_eq!(seen.into_inner(), Some(PathBuf::from("/etc/entorno/key.txt")));
}

#[test]
fn build_app_config_request_timeout_override() {
    let mut map = HashMap::new();
    map.insert("ENTORNO_REQUEST_TIMEOUT_SECS", "30");
    let cfg = build_app_config(lookup_from_map(&map), key_file("k")).unwrap();
    assert_eq!(cfg.request_timeout_secs, 30);
}

#[test]
fn build_app_config_request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("ENTORNO_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map), key_file("k"));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ENTORNO_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(ENTORNO_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_zero_timeout_fails_validation() {
    let mut map = HashMap::new();
    map.insert("ENTORNO_DETAILS_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map), key_file("k"));
    assert!(matches!(result, Err(ConfigError::Validation(_))));
}

#[test]
fn build_app_config_max_retries_invalid() {
    let mut map = HashMap::new();
    map.insert("ENTORNO_MAX_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map), key_file("k"));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ENTORNO_MAX_RETRIES"),
        "expected InvalidEnvVar(ENTORNO_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn build_app_config_directory_overrides() {
    let mut map = HashMap::new();
    map.insert("ENTORNO_RESULTS_DIR", "/data/results");
    map.insert("ENTORNO_PROBLEMS_DIR", "/data/problems");
    map.insert("ENTORNO_OUTPUT_DIR", "/data/out");
    let cfg = build_app_config(lookup_from_map(&map), key_file("k")).unwrap();
    assert_eq!(cfg.results_dir, PathBuf::from("/data/results"));
    assert_eq!(cfg.problems_dir, PathBuf::from("/data/problems"));
    assert_eq!(cfg.output_dir, PathBuf::from("/data/out"));
}

#[test]
fn debug_output_redacts_api_key() {
    let map = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map), key_file("super-secret")).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[redacted]"));
}
