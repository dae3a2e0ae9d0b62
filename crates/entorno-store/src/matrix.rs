//! File side of distance augmentation: reading destinations out of a result
//! file and writing the `_matrix` variant with travel columns appended.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use entorno_core::{augmented_filename, is_augmented, parse_filename, LatLng, TravelLeg};
use walkdir::WalkDir;

use crate::error::StoreError;
use crate::problems::write_problem;
use crate::result_set::{column_index, read_raw, DELIMITER};

pub const DISTANCE_COLUMN: &str = "distance_meters";
pub const DURATION_COLUMN: &str = "duration_minutes";

/// A plain result file loaded for augmentation.
#[derive(Debug, Clone)]
pub struct MatrixSource {
    pub path: PathBuf,
    pub category: String,
    pub origin: LatLng,
    headers: StringRecord,
    rows: Vec<StringRecord>,
    /// One coordinate per row, in file order.
    pub destinations: Vec<LatLng>,
}

impl MatrixSource {
    /// Read `path` and decode its origin from the filename.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidFilename`] if the name is not a canonical result name.
    /// - [`StoreError::MissingColumn`] / [`StoreError::InvalidValue`] if a row
    ///   has no usable `latitude`/`longitude`.
    /// - [`StoreError::Csv`] if the file cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (category, origin) = parse_filename(&file_name)
            .ok_or_else(|| StoreError::InvalidFilename(path.display().to_string()))?;

        let (headers, rows) = read_raw(path)?;
        let lat_idx = column_index(&headers, "latitude", path)?;
        let lng_idx = column_index(&headers, "longitude", path)?;

        let parse = |row: &StringRecord, idx: usize, column: &str, n: usize| {
            let raw = row.get(idx).unwrap_or("").trim();
            raw.parse::<f64>().map_err(|_| StoreError::InvalidValue {
                path: path.display().to_string(),
                row: n + 1,
                column: column.to_string(),
                value: raw.to_string(),
            })
        };

        let destinations = rows
            .iter()
            .enumerate()
            .map(|(n, row)| {
                Ok(LatLng::new(
                    parse(row, lat_idx, "latitude", n)?,
                    parse(row, lng_idx, "longitude", n)?,
                ))
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        Ok(Self {
            path: path.to_path_buf(),
            category,
            origin,
            headers,
            rows,
            destinations,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn augmented_path(&self) -> PathBuf {
        augmented_sibling(&self.path)
    }

    /// Write the augmented file next to the source, then remove the source.
    ///
    /// The new content goes to a temporary file in the same directory and is
    /// persisted under the augmented name, so a crash never leaves a partial
    /// augmented file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LengthMismatch`] if `legs` does not match the row
    /// count, or an I/O/CSV error if writing fails.
    pub fn write_augmented(&self, legs: &[TravelLeg]) -> Result<PathBuf, StoreError> {
        if legs.len() != self.rows.len() {
            return Err(StoreError::LengthMismatch {
                path: self.path.display().to_string(),
                expected: self.rows.len(),
                got: legs.len(),
            });
        }

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let target = self.augmented_path();
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;

        {
            let mut writer = csv::WriterBuilder::new()
                .delimiter(DELIMITER)
                .flexible(true)
                .from_writer(tmp.as_file_mut());

            let mut headers = self.headers.clone();
            headers.push_field(DISTANCE_COLUMN);
            headers.push_field(DURATION_COLUMN);
            writer
                .write_record(&headers)
                .map_err(|e| StoreError::csv(&target, e))?;

            for (row, leg) in self.rows.iter().zip(legs) {
                let mut row = row.clone();
                row.push_field(&leg.distance_meters.to_string());
                row.push_field(&leg.duration_minutes.to_string());
                writer
                    .write_record(&row)
                    .map_err(|e| StoreError::csv(&target, e))?;
            }
            writer.flush().map_err(|e| StoreError::io(&target, e))?;
        }

        tmp.persist(&target)
            .map_err(|e| StoreError::io(&target, e.error))?;
        fs::remove_file(&self.path).map_err(|e| StoreError::io(&self.path, e))?;

        Ok(target)
    }
}

/// `<stem>_matrix.csv` next to `path`.
#[must_use]
pub fn augmented_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(augmented_filename(&name))
}

/// Plain (not yet augmented) result files under `results_dir`, sorted.
#[must_use]
pub fn list_plain_results(results_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(results_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            !is_augmented(&name) && parse_filename(&name).is_some()
        })
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();
    files
}

/// Write `MATRIX_at_<stem>.txt` describing a failed augmentation.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the report cannot be written.
pub fn write_matrix_problem(
    problems_dir: &Path,
    source: &Path,
    origin: LatLng,
    destination_count: usize,
    detail: &str,
) -> Result<PathBuf, StoreError> {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut body = String::new();
    let _ = writeln!(body, "Distance matrix failed for {}", source.display());
    let _ = writeln!(body, "Origin: {origin}");
    let _ = writeln!(body, "Destinations: {destination_count}");
    let _ = writeln!(body);
    let _ = writeln!(body, "{detail}");
    write_problem(problems_dir, &format!("MATRIX_at_{stem}.txt"), &body)
}
