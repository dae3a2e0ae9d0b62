use thiserror::Error;

/// Filesystem and CSV failures while reading or writing result artifacts.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// A result file whose name does not decode to `(category, origin)`.
    #[error("not a result filename: {0}")]
    InvalidFilename(String),

    #[error("column '{column}' missing from {path}")]
    MissingColumn { path: String, column: String },

    #[error("invalid {column} '{value}' at row {row} of {path}")]
    InvalidValue {
        path: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("{path} has {expected} rows but {got} travel legs were given")]
    LengthMismatch {
        path: String,
        expected: usize,
        got: usize,
    },
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn csv(path: &std::path::Path, source: csv::Error) -> Self {
        Self::Csv {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Failures reading the origin table given to `collect`.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read input file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse input file {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("no latitude/longitude columns or coordinate-pair columns in {path} (columns: {columns:?})")]
    NoGeoColumns { path: String, columns: Vec<String> },

    #[error("no coordinate pair could be extracted from columns {columns:?} in {path}")]
    NoPairs { path: String, columns: Vec<String> },
}
