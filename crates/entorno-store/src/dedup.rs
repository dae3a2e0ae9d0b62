//! In-run detection of places reported twice by overlapping searches.
//!
//! Comparison works on the textual form of the coordinates, so `-23.5505`
//! and `-23.55051` share a 7-character prefix while `-23.55` and `-23.56` do
//! not. Detection is advisory: duplicates are reported, never removed.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use entorno_core::PlaceRecord;

use crate::error::StoreError;
use crate::problems::write_problem;

const EXACT_PREFIX: usize = 7;
const NEAR_PREFIX: usize = 5;
const ADDRESS_PREFIX: usize = 15;
const REPORT_COORD_PREFIX: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKind {
    /// Coordinates agree on their first 7 characters.
    SameCoordinates,
    /// Coordinates agree on 5 characters and addresses on 15.
    LookalikePlace,
}

/// First `n` characters of `s` (not bytes).
fn prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn coords_text(record: &PlaceRecord) -> (String, String) {
    (
        record.location.lat.to_string(),
        record.location.lng.to_string(),
    )
}

/// How `candidate` duplicates `cached`, if it does.
#[must_use]
pub fn duplicate_kind(candidate: &PlaceRecord, cached: &PlaceRecord) -> Option<DuplicateKind> {
    let (lat, lng) = coords_text(candidate);
    let (cached_lat, cached_lng) = coords_text(cached);

    let coords_match = |n| {
        prefix(&lat, n) == prefix(&cached_lat, n) && prefix(&lng, n) == prefix(&cached_lng, n)
    };

    if coords_match(EXACT_PREFIX) {
        Some(DuplicateKind::SameCoordinates)
    } else if coords_match(NEAR_PREFIX)
        && prefix(&candidate.address, ADDRESS_PREFIX) == prefix(&cached.address, ADDRESS_PREFIX)
    {
        Some(DuplicateKind::LookalikePlace)
    } else {
        None
    }
}

#[must_use]
pub fn is_duplicate(candidate: &PlaceRecord, cached: &PlaceRecord) -> bool {
    duplicate_kind(candidate, cached).is_some()
}

/// Two records judged to be the same physical place.
#[derive(Debug, Clone)]
pub struct DuplicateReport {
    pub kind: DuplicateKind,
    pub candidate: PlaceRecord,
    pub cached: PlaceRecord,
}

impl DuplicateReport {
    #[must_use]
    pub fn filename(&self) -> String {
        let marker = match self.kind {
            DuplicateKind::SameCoordinates => "SAME_COORDINATES_AT",
            DuplicateKind::LookalikePlace => "LOOKALIKE_PLACES_AT",
        };
        let (lat, lng) = coords_text(&self.candidate);
        let (cached_lat, cached_lng) = coords_text(&self.cached);
        format!(
            "{marker}_{}+{}_AND_{}+{}.txt",
            prefix(&lat, REPORT_COORD_PREFIX),
            prefix(&lng, REPORT_COORD_PREFIX),
            prefix(&cached_lat, REPORT_COORD_PREFIX),
            prefix(&cached_lng, REPORT_COORD_PREFIX),
        )
    }

    #[must_use]
    pub fn render(&self) -> String {
        let title = match self.kind {
            DuplicateKind::SameCoordinates => "Found places with same coordinates",
            DuplicateKind::LookalikePlace => {
                "Found places with lookalike coordinates and vicinities"
            }
        };
        let rule = "- ".repeat(20);
        let mut body = format!("{title}\n\n{rule}\n");
        let pair = [
            ("Seen earlier", &self.cached),
            ("Place next to it", &self.candidate),
        ];
        for (label, record) in pair {
            let _ = writeln!(body, "{label}: {}", record.name);
            let _ = writeln!(body, "Vicinity: {}", record.address);
            let _ = writeln!(
                body,
                "Coordinates: {} {}",
                record.location.lat, record.location.lng
            );
            let _ = writeln!(body, "Search type: {}", record.search_type);
            if let Some(id) = &record.external_id {
                let _ = writeln!(body, "Place id: {id}");
            }
            let _ = writeln!(body, "{rule}");
        }
        body
    }

    /// Write the report under `problems_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the report cannot be written.
    pub fn write(&self, problems_dir: &Path) -> Result<PathBuf, StoreError> {
        write_problem(problems_dir, &self.filename(), &self.render())
    }
}

/// Places seen so far in the current run.
#[derive(Debug, Default)]
pub struct DedupCache {
    seen: Vec<PlaceRecord>,
}

impl DedupCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Compare `candidate` against every cached place.
    ///
    /// Returns the report for the first match; otherwise the candidate joins
    /// the cache and `None` is returned.
    pub fn observe(&mut self, candidate: &PlaceRecord) -> Option<DuplicateReport> {
        let found = self
            .seen
            .iter()
            .find_map(|cached| duplicate_kind(candidate, cached).map(|kind| (kind, cached)));

        if let Some((kind, cached)) = found {
            return Some(DuplicateReport {
                kind,
                candidate: candidate.clone(),
                cached: cached.clone(),
            });
        }
        self.seen.push(candidate.clone());
        None
    }
}

#[cfg(test)]
mod tests {
    use entorno_core::{BusinessStatus, LatLng};

    use super::*;

    fn place(lat: f64, lng: f64, address: &str) -> PlaceRecord {
        PlaceRecord {
            external_id: None,
            city_state: "São Paulo/SP".into(),
            name: format!("Lugar {lat}"),
            address: address.into(),
            business_status: BusinessStatus::Operational,
            open_now: false,
            location: LatLng::new(lat, lng),
            weekly_hours: None,
            types: vec![],
            viewport: None,
            search_type: "school".into(),
        }
    }

    #[test]
    fn same_seven_char_prefix_is_tier_one() {
        let a = place(-23.55051, -46.63331, "Rua A, 1");
        let b = place(-23.55059, -46.63339, "Outra rua");
        assert_eq!(duplicate_kind(&b, &a), Some(DuplicateKind::SameCoordinates));
    }

    #[test]
    fn near_coordinates_need_matching_address() {
        let a = place(-23.551, -46.631, "Avenida Paulista, 1000");
        let same_street = place(-23.559, -46.639, "Avenida Paulista, 1500");
        let other_street = place(-23.559, -46.639, "Rua Augusta, 200");

        assert_eq!(
            duplicate_kind(&same_street, &a),
            Some(DuplicateKind::LookalikePlace)
        );
        assert!(!is_duplicate(&other_street, &a));
    }

    #[test]
    fn differing_at_five_chars_is_never_duplicate() {
        let a = place(-23.55, -46.63, "Avenida Paulista, 1000");
        let b = place(-23.65, -46.63, "Avenida Paulista, 1000");
        assert!(!is_duplicate(&b, &a));
    }

    #[test]
    fn prefix_counts_characters() {
        assert_eq!(prefix("Praça da Sé", 5), "Praça");
        assert_eq!(prefix("abc", 10), "abc");
    }

    #[test]
    fn cache_keeps_first_and_reports_later() {
        let mut cache = DedupCache::new();
        let first = place(-23.55051, -46.63331, "Rua A");
        let second = place(-23.55051, -46.63331, "Rua A");

        assert!(cache.observe(&first).is_none());
        let report = cache.observe(&second).expect("duplicate");
        assert_eq!(report.kind, DuplicateKind::SameCoordinates);
        assert_eq!(cache.len(), 1);
        assert_eq!(
            report.filename(),
            "SAME_COORDINATES_AT_-23.55051+-46.63331_AND_-23.55051+-46.63331.txt"
        );
    }

    #[test]
    fn report_is_written_to_problems_dir() {
        let dir = tempfile::tempdir().unwrap();
        let report = DuplicateReport {
            kind: DuplicateKind::LookalikePlace,
            candidate: place(-23.559, -46.639, "Avenida Paulista, 1500"),
            cached: place(-23.551, -46.631, "Avenida Paulista, 1000"),
        };
        let path = report.write(dir.path()).unwrap();
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("LOOKALIKE_PLACES_AT_-23.559+-46.639_AND_"));
        let body = std::fs::read_to_string(path).unwrap();
        assert!(body.contains("Avenida Paulista, 1000"));
    }
}
