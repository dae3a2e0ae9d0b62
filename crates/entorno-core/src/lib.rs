pub mod app_config;
pub mod categories;
pub mod config;
pub mod geo;
pub mod place;
pub mod regions;

use thiserror::Error;

pub use app_config::AppConfig;
pub use categories::{default_categories, load_categories, resolve_categories, Category};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{
    augmented_filename, format_coord, is_augmented, make_filename, parse_filename, LatLng, Origin,
    SearchTask, TravelLeg, Viewport,
};
pub use place::{BusinessStatus, DayHours, PlaceRecord, Weekday, WeeklyHours};
pub use regions::{region_for_state, state_from_city_state, Region};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("API key not found at {path}: {reason}")]
    MissingApiKey { path: String, reason: String },

    #[error("failed to read categories file {path}: {source}")]
    CategoriesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse categories file: {0}")]
    CategoriesFileParse(#[from] serde_yaml::Error),

    #[error("configuration validation failed: {0}")]
    Validation(String),
}
