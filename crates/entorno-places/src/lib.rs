pub mod client;
pub mod error;
pub mod hours;
pub mod matrix;
pub(crate) mod retry;
pub mod search;
pub mod types;

pub use client::PlacesClient;
pub use error::PlacesError;
pub use hours::{normalize_weekday_text, to_24h};
pub use matrix::parse_distance_matrix;
pub use search::{search_by_coordinates, UNKNOWN_CITY_STATE};
