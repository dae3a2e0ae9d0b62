//! `;`-delimited result files, one per search task.

use std::fs;
use std::path::{Path, PathBuf};

use entorno_core::PlaceRecord;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Column order of every result file.
pub const RESULT_HEADER: [&str; 12] = [
    "id",
    "city_state",
    "name",
    "address",
    "open_now",
    "business_status",
    "latitude",
    "longitude",
    "weekday_text",
    "types",
    "search_type",
    "viewport",
];

pub(crate) const DELIMITER: u8 = b';';

/// One line of a result file. Structured fields are JSON-encoded strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub id: String,
    pub city_state: String,
    pub name: String,
    pub address: String,
    pub open_now: bool,
    pub business_status: String,
    pub latitude: f64,
    pub longitude: f64,
    /// JSON array of `"<Dia>: <horário>"` strings; `[]` when hours are unknown.
    pub weekday_text: String,
    /// JSON array of provider types.
    pub types: String,
    pub search_type: String,
    /// JSON object with `northeast`/`southwest` corners, or empty.
    pub viewport: String,
}

impl ResultRow {
    /// Flatten a record into its file representation.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if a structured field fails to encode.
    pub fn from_record(record: &PlaceRecord) -> Result<Self, serde_json::Error> {
        let weekday_lines = record
            .weekly_hours
            .as_ref()
            .map(entorno_core::WeeklyHours::lines)
            .unwrap_or_default();
        let viewport = match &record.viewport {
            Some(viewport) => serde_json::to_string(viewport)?,
            None => String::new(),
        };

        Ok(Self {
            id: record.external_id.clone().unwrap_or_default(),
            city_state: record.city_state.clone(),
            name: record.name.clone(),
            address: record.address.clone(),
            open_now: record.open_now,
            business_status: record.business_status.as_str().to_string(),
            latitude: record.location.lat,
            longitude: record.location.lng,
            weekday_text: serde_json::to_string(&weekday_lines)?,
            types: serde_json::to_string(&record.types)?,
            search_type: record.search_type.clone(),
            viewport,
        })
    }
}

/// Write `records` to `<dir>/<filename>`, creating `dir` if needed.
///
/// # Errors
///
/// Returns [`StoreError`] on I/O, CSV or JSON encoding failure.
pub fn write_result_set(
    dir: &Path,
    filename: &str,
    records: &[PlaceRecord],
) -> Result<PathBuf, StoreError> {
    fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
    let path = dir.join(filename);

    // Written under a temporary name so the canonical name only ever holds a
    // complete file.
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
    {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .from_writer(tmp.as_file_mut());

        writer
            .write_record(RESULT_HEADER)
            .map_err(|e| StoreError::csv(&path, e))?;
        for record in records {
            let row = ResultRow::from_record(record)?;
            writer
                .serialize(&row)
                .map_err(|e| StoreError::csv(&path, e))?;
        }
        writer.flush().map_err(|e| StoreError::io(&path, e))?;
    }

    tmp.persist(&path)
        .map_err(|e| StoreError::io(&path, e.error))?;

    Ok(path)
}

/// Read every row of a result file, ignoring any extra columns.
///
/// # Errors
///
/// Returns [`StoreError::Csv`] if the file cannot be opened or a row does not
/// match [`ResultRow`].
pub fn read_result_rows(path: &Path) -> Result<Vec<ResultRow>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .from_path(path)
        .map_err(|e| StoreError::csv(path, e))?;
    reader
        .deserialize()
        .collect::<Result<Vec<ResultRow>, _>>()
        .map_err(|e| StoreError::csv(path, e))
}

/// Headers and raw records of a `;`-delimited file.
pub(crate) fn read_raw(path: &Path) -> Result<(csv::StringRecord, Vec<csv::StringRecord>), StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .from_path(path)
        .map_err(|e| StoreError::csv(path, e))?;
    let headers = reader.headers().map_err(|e| StoreError::csv(path, e))?.clone();
    let rows = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| StoreError::csv(path, e))?;
    Ok((headers, rows))
}

/// Index of `column` in `headers`.
pub(crate) fn column_index(
    headers: &csv::StringRecord,
    column: &str,
    path: &Path,
) -> Result<usize, StoreError> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| StoreError::MissingColumn {
            path: path.display().to_string(),
            column: column.to_string(),
        })
}

/// `city_state` of the first row, if the file has one.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be read or lacks the column.
pub fn first_city_state(path: &Path) -> Result<Option<String>, StoreError> {
    let (headers, rows) = read_raw(path)?;
    let idx = column_index(&headers, "city_state", path)?;
    Ok(rows
        .first()
        .and_then(|row| row.get(idx))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}
