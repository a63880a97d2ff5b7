//! Error types shared by the viewer library.

use std::path::PathBuf;

/// Result type alias for viewer operations.
pub type Result<T> = std::result::Result<T, ViewerError>;

/// Errors surfaced by loading, viewing, exporting and comparing tables.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// Unrecognized extension or a file the decoder rejected.
    #[error("cannot read {path:?} as a table: {message}")]
    FileFormat { path: PathBuf, message: String },

    /// Unreadable or unwritable path.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The worker runtime could not be started.
    #[error("cannot start the background runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// Malformed schema document.
    #[error("invalid schema document: {0}")]
    SchemaParse(String),

    /// Cell access outside the visible table.
    #[error("cell ({row}, {column}) out of range for a {rows}x{columns} view")]
    Index {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },

    /// Sample size larger than the table.
    #[error("requested {requested} rows but only {available} are available")]
    ExportRange { requested: usize, available: usize },

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Excel error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

impl ViewerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ViewerError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        ViewerError::FileFormat {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
