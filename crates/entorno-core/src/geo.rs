//! Geographic value types and the canonical result filename codec.

use serde::{Deserialize, Serialize};

/// Suffix appended to a result file's stem once travel distances are merged in.
pub const AUGMENTED_SUFFIX: &str = "_matrix";

const FILENAME_SEPARATOR: &str = "_near_";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Bounding box of a place as reported by the places API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub northeast: LatLng,
    pub southwest: LatLng,
}

/// Walking distance and time from an origin to one destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelLeg {
    pub distance_meters: f64,
    /// Seconds / 60, rounded to 2 decimal places.
    pub duration_minutes: f64,
}

/// A search center read from an input table.
#[derive(Debug, Clone, PartialEq)]
pub struct Origin {
    pub position: LatLng,
    pub name: Option<String>,
    /// Input column the coordinate was read from.
    pub source: Option<String>,
}

impl Origin {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            position: LatLng::new(lat, lng),
            name: None,
            source: None,
        }
    }

    /// Human-readable label: name, else source column, else the coordinates.
    #[must_use]
    pub fn label(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.source.clone())
            .unwrap_or_else(|| self.position.to_string())
    }
}

/// One origin paired with one place-type category.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTask {
    pub origin: Origin,
    pub category: String,
}

impl SearchTask {
    #[must_use]
    pub fn new(origin: Origin, category: impl Into<String>) -> Self {
        Self {
            origin,
            category: category.into(),
        }
    }

    /// Canonical result filename; doubles as the task identity.
    #[must_use]
    pub fn filename(&self) -> String {
        make_filename(&self.category, self.origin.position)
    }
}

/// Format a coordinate with at most 5 decimal places, trailing zeros stripped.
#[must_use]
pub fn format_coord(value: f64) -> String {
    let fixed = format!("{value:.5}");
    if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        fixed
    }
}

/// Build `<category>_near_<lat>_<lng>.csv`.
#[must_use]
pub fn make_filename(category: &str, position: LatLng) -> String {
    format!(
        "{category}{FILENAME_SEPARATOR}{}_{}.csv",
        format_coord(position.lat),
        format_coord(position.lng)
    )
}

/// Name of the distance-augmented variant of a result file.
#[must_use]
pub fn augmented_filename(filename: &str) -> String {
    let stem = filename.strip_suffix(".csv").unwrap_or(filename);
    format!("{stem}{AUGMENTED_SUFFIX}.csv")
}

/// Decode a result filename (plain or augmented) back into its category and origin.
///
/// Returns `None` when the name does not follow the canonical pattern.
#[must_use]
pub fn parse_filename(filename: &str) -> Option<(String, LatLng)> {
    let stem = filename.strip_suffix(".csv")?;
    let stem = stem.strip_suffix(AUGMENTED_SUFFIX).unwrap_or(stem);
    let (category, coords) = stem.rsplit_once(FILENAME_SEPARATOR)?;
    if category.is_empty() {
        return None;
    }
    let (lat, lng) = coords.split_once('_')?;
    let lat = lat.parse::<f64>().ok()?;
    let lng = lng.parse::<f64>().ok()?;
    Some((category.to_string(), LatLng::new(lat, lng)))
}

/// Whether a filename is a distance-augmented result file.
#[must_use]
pub fn is_augmented(filename: &str) -> bool {
    filename
        .strip_suffix(".csv")
        .is_some_and(|stem| stem.ends_with(AUGMENTED_SUFFIX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_coord_strips_trailing_zeros() {
        assert_eq!(format_coord(-23.5505), "-23.5505");
        assert_eq!(format_coord(-46.63330), "-46.6333");
        assert_eq!(format_coord(10.0), "10");
        assert_eq!(format_coord(0.1), "0.1");
    }

    #[test]
    fn format_coord_rounds_to_five_places() {
        assert_eq!(format_coord(-23.123_456_7), "-23.12346");
        assert_eq!(format_coord(1.000_004), "1");
    }

    #[test]
    fn filename_is_stable_under_float_noise() {
        let noisy = make_filename("school", LatLng::new(-23.550_500_000_01, -46.6333));
        let clean = make_filename("school", LatLng::new(-23.5505, -46.6333));
        assert_eq!(noisy, clean);
        assert_eq!(clean, "school_near_-23.5505_-46.6333.csv");
    }

    #[test]
    fn task_filename_uses_category_and_origin() {
        let task = SearchTask::new(Origin::new(-22.9068, -43.1729), "movie_theater");
        assert_eq!(task.filename(), "movie_theater_near_-22.9068_-43.1729.csv");
    }

    #[test]
    fn parse_filename_handles_underscored_categories() {
        let (category, pos) = parse_filename("movie_theater_near_-22.9068_-43.1729.csv").unwrap();
        assert_eq!(category, "movie_theater");
        assert!((pos.lat - (-22.9068)).abs() < 1e-9);
        assert!((pos.lng - (-43.1729)).abs() < 1e-9);
    }

    #[test]
    fn parse_filename_accepts_augmented_variant() {
        let name = augmented_filename("school_near_-23.5505_-46.6333.csv");
        assert_eq!(name, "school_near_-23.5505_-46.6333_matrix.csv");
        assert!(is_augmented(&name));
        let (category, pos) = parse_filename(&name).unwrap();
        assert_eq!(category, "school");
        assert!((pos.lng - (-46.6333)).abs() < 1e-9);
    }

    #[test]
    fn parse_filename_rejects_foreign_names() {
        assert!(parse_filename("notes.txt").is_none());
        assert!(parse_filename("school.csv").is_none());
        assert!(parse_filename("school_near_abc_def.csv").is_none());
        assert!(!is_augmented("school_near_1_2.csv"));
    }

    #[test]
    fn origin_label_prefers_name_then_source() {
        let mut origin = Origin::new(1.5, 2.5);
        assert_eq!(origin.label(), "1.5,2.5");
        origin.source = Some("Centro (Lat, Long)".to_string());
        assert_eq!(origin.label(), "Centro (Lat, Long)");
        origin.name = Some("Residencial Aurora".to_string());
        assert_eq!(origin.label(), "Residencial Aurora");
    }
}
