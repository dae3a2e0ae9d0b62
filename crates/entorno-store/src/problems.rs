//! Plain-text problem reports for operators.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Write `body` to `<problems_dir>/<filename>`, replacing any previous report.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the directory or file cannot be written.
pub fn write_problem(problems_dir: &Path, filename: &str, body: &str) -> Result<PathBuf, StoreError> {
    fs::create_dir_all(problems_dir).map_err(|e| StoreError::io(problems_dir, e))?;
    let path = problems_dir.join(filename);
    fs::write(&path, body).map_err(|e| StoreError::io(&path, e))?;
    tracing::debug!(path = %path.display(), "wrote problem report");
    Ok(path)
}
