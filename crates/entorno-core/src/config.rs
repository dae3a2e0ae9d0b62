use std::path::{Path, PathBuf};

use crate::app_config::AppConfig;
use crate::ConfigError;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars,
/// then reads the API key from the configured key file.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid or the API key file is missing
/// or empty.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid or the API key file is missing
/// or empty.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key), |path| std::fs::read_to_string(path))
}

/// Build application configuration from an env-var lookup and a file reader.
///
/// Both are injected so tests can drive the parsing with a `HashMap` and an
/// in-memory key instead of touching the process environment or disk.
fn build_app_config<F, R>(lookup: F, read_file: R) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    R: Fn(&Path) -> std::io::Result<String>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let api_key_path = PathBuf::from(or_default("ENTORNO_API_KEY_PATH", "system/api_key.txt"));
    let api_key = read_api_key(&api_key_path, read_file)?;

    let results_dir = PathBuf::from(or_default("ENTORNO_RESULTS_DIR", "system/results"));
    let problems_dir = PathBuf::from(or_default("ENTORNO_PROBLEMS_DIR", "system/problems"));
    let output_dir = PathBuf::from(or_default("ENTORNO_OUTPUT_DIR", "output"));
    let categories_path = PathBuf::from(or_default(
        "ENTORNO_CATEGORIES_PATH",
        "config/categories.yaml",
    ));
    let log_level = or_default("ENTORNO_LOG_LEVEL", "info");
    let base_url = or_default("ENTORNO_BASE_URL", DEFAULT_BASE_URL);
    let language = or_default("ENTORNO_LANGUAGE", "pt-BR");
    let region = or_default("ENTORNO_REGION", "BR");

    let request_timeout_secs = parse_u64("ENTORNO_REQUEST_TIMEOUT_SECS", "10")?;
    let details_timeout_secs = parse_u64("ENTORNO_DETAILS_TIMEOUT_SECS", "5")?;
    let max_retries = parse_u32("ENTORNO_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("ENTORNO_RETRY_BACKOFF_BASE_MS", "500")?;

    if request_timeout_secs == 0 || details_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request timeouts must be greater than zero".to_string(),
        ));
    }

    Ok(AppConfig {
        api_key,
        api_key_path,
        results_dir,
        problems_dir,
        output_dir,
        categories_path,
        log_level,
        base_url,
        language,
        region,
        request_timeout_secs,
        details_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
    })
}

fn read_api_key<R>(path: &Path, read_file: R) -> Result<String, ConfigError>
where
    R: Fn(&Path) -> std::io::Result<String>,
{
    let raw = read_file(path).map_err(|e| ConfigError::MissingApiKey {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let key = raw.trim();
    if key.is_empty() {
        return Err(ConfigError::MissingApiKey {
            path: path.display().to_string(),
            reason: "file is empty".to_string(),
        });
    }
    Ok(key.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
