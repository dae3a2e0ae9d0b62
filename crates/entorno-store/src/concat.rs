//! Concatenation of result files into one timestamped output table.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use entorno_core::is_augmented;
use walkdir::WalkDir;

use crate::error::StoreError;
use crate::result_set::{read_raw, DELIMITER};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatOutcome {
    pub path: PathBuf,
    pub files: usize,
    pub rows: usize,
}

/// `entorno_<dd-mm-YYYY_HH-MM>_<label>.csv`.
#[must_use]
pub fn output_filename(label: &str, now: NaiveDateTime) -> String {
    let label = label.strip_suffix(".csv").unwrap_or(label);
    format!("entorno_{}_{label}.csv", now.format("%d-%m-%Y_%H-%M"))
}

fn collect_inputs(results_dir: &Path, include_all: bool) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(results_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            name.ends_with(".csv") && (include_all || is_augmented(&name))
        })
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();
    files
}

/// Merge result files under `results_dir` into one file in `output_dir`.
///
/// Only distance-augmented files are taken unless `include_all` is set.
/// Columns are the union of all headers in first-seen order; cells a file
/// does not have are left empty. Source files are not modified. Returns
/// `Ok(None)` when there is nothing to concatenate.
///
/// # Errors
///
/// Returns [`StoreError`] if a source cannot be read or the output cannot be
/// written.
pub fn concat_results(
    results_dir: &Path,
    output_dir: &Path,
    label: &str,
    include_all: bool,
    now: NaiveDateTime,
) -> Result<Option<ConcatOutcome>, StoreError> {
    let inputs = collect_inputs(results_dir, include_all);
    if inputs.is_empty() {
        return Ok(None);
    }

    let mut columns: Vec<String> = Vec::new();
    let mut tables = Vec::with_capacity(inputs.len());
    for path in &inputs {
        let (headers, rows) = read_raw(path)?;
        let mapping: Vec<usize> = headers
            .iter()
            .map(|h| match columns.iter().position(|c| c == h) {
                Some(idx) => idx,
                None => {
                    columns.push(h.to_string());
                    columns.len() - 1
                }
            })
            .collect();
        tables.push((mapping, rows));
    }

    fs::create_dir_all(output_dir).map_err(|e| StoreError::io(output_dir, e))?;
    let path = output_dir.join(output_filename(label, now));
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_path(&path)
        .map_err(|e| StoreError::csv(&path, e))?;
    writer
        .write_record(&columns)
        .map_err(|e| StoreError::csv(&path, e))?;

    let mut total_rows = 0;
    for (mapping, rows) in &tables {
        for row in rows {
            let mut out = vec![""; columns.len()];
            for (field, &target) in row.iter().zip(mapping) {
                out[target] = field;
            }
            writer
                .write_record(&out)
                .map_err(|e| StoreError::csv(&path, e))?;
            total_rows += 1;
        }
    }
    writer.flush().map_err(|e| StoreError::io(&path, e))?;

    tracing::info!(
        path = %path.display(),
        files = inputs.len(),
        rows = total_rows,
        "concatenated results"
    );
    Ok(Some(ConcatOutcome {
        path,
        files: inputs.len(),
        rows: total_rows,
    }))
}
