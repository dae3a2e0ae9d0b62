//! Moves result files into `<results_dir>/<Region>/` by the state of their
//! first row.

use std::fs;
use std::path::{Path, PathBuf};

use entorno_core::{region_for_state, state_from_city_state, Region};

use crate::error::StoreError;
use crate::result_set::first_city_state;

/// Where a result file ended up after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionOutcome {
    pub state: Option<String>,
    pub region: Option<Region>,
    pub path: PathBuf,
}

impl RegionOutcome {
    fn unclassified(path: &Path) -> Self {
        Self {
            state: None,
            region: None,
            path: path.to_path_buf(),
        }
    }
}

/// State and region of a result file, `(None, None)` when undeterminable.
#[must_use]
pub fn infer_region(path: &Path) -> (Option<String>, Option<Region>) {
    let city_state = match first_city_state(path) {
        Ok(Some(city_state)) => city_state,
        Ok(None) => return (None, None),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "cannot read city_state");
            return (None, None);
        }
    };
    match state_from_city_state(&city_state) {
        Some(state) => {
            let region = region_for_state(&state);
            (Some(state), region)
        }
        None => (None, None),
    }
}

/// Classify `path` and move it under its region folder.
///
/// Unclassifiable files stay where they are. A file already inside its
/// region folder is left alone, and a missing source returns its own path.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the region folder cannot be created or the
/// move fails.
pub fn classify_and_move(results_dir: &Path, path: &Path) -> Result<RegionOutcome, StoreError> {
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "classification source missing");
        return Ok(RegionOutcome::unclassified(path));
    }

    let (state, region) = infer_region(path);
    let Some(region) = region else {
        return Ok(RegionOutcome::unclassified(path));
    };

    let target_dir = results_dir.join(region.as_str());
    let Some(file_name) = path.file_name() else {
        return Ok(RegionOutcome::unclassified(path));
    };
    let target = target_dir.join(file_name);

    if path.parent() != Some(target_dir.as_path()) {
        fs::create_dir_all(&target_dir).map_err(|e| StoreError::io(&target_dir, e))?;
        fs::rename(path, &target).map_err(|e| StoreError::io(path, e))?;
        tracing::debug!(from = %path.display(), to = %target.display(), %region, "moved result file");
    }

    Ok(RegionOutcome {
        state,
        region: Some(region),
        path: target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_with_city_state(dir: &Path, name: &str, city_state: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(
            &path,
            format!("id;city_state;name\nP1;{city_state};Escola\nP2;Outra/RJ;Escola 2\n"),
        )
        .unwrap();
        path
    }

    #[test]
    fn sp_file_moves_to_sudeste() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_with_city_state(dir.path(), "school_near_-23.5_-46.6.csv", "São Paulo/sp ");

        let outcome = classify_and_move(dir.path(), &path).unwrap();
        assert_eq!(outcome.state.as_deref(), Some("SP"));
        assert_eq!(outcome.region, Some(Region::Sudeste));
        assert_eq!(outcome.path, dir.path().join("Sudeste").join("school_near_-23.5_-46.6.csv"));
        assert!(outcome.path.is_file());
        assert!(!path.exists());
    }

    #[test]
    fn unknown_state_stays_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_with_city_state(dir.path(), "a.csv", "Lugar/ZZ");

        let outcome = classify_and_move(dir.path(), &path).unwrap();
        assert_eq!(outcome, RegionOutcome::unclassified(&path));
        assert!(path.is_file());
    }

    #[test]
    fn malformed_and_placeholder_values_are_unclassified() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_with_city_state(dir.path(), "b.csv", "Desconhecido");
        assert_eq!(infer_region(&path), (None, None));
    }

    #[test]
    fn already_in_region_folder_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let sul = dir.path().join("Sul");
        fs::create_dir_all(&sul).unwrap();
        let path = write_with_city_state(&sul, "c.csv", "Curitiba/PR");

        let outcome = classify_and_move(dir.path(), &path).unwrap();
        assert_eq!(outcome.region, Some(Region::Sul));
        assert_eq!(outcome.path, path);
        assert!(path.is_file());
    }

    #[test]
    fn missing_source_returns_original_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ghost.csv");
        let outcome = classify_and_move(dir.path(), &path).unwrap();
        assert_eq!(outcome.path, path);
        assert_eq!(outcome.region, None);
    }
}
