use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub api_key_path: PathBuf,
    pub results_dir: PathBuf,
    pub problems_dir: PathBuf,
    pub output_dir: PathBuf,
    pub categories_path: PathBuf,
    pub log_level: String,
    pub base_url: String,
    pub language: String,
    pub region: String,
    pub request_timeout_secs: u64,
    pub details_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"[redacted]")
            .field("api_key_path", &self.api_key_path)
            .field("results_dir", &self.results_dir)
            .field("problems_dir", &self.problems_dir)
            .field("output_dir", &self.output_dir)
            .field("categories_path", &self.categories_path)
            .field("log_level", &self.log_level)
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .field("region", &self.region)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("details_timeout_secs", &self.details_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .finish()
    }
}
