//! Export of table samples to CSV, Gzip-CSV and Parquet.

use flate2::Compression as GzLevel;
use flate2::write::GzEncoder;
use polars::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::error::{Result, ViewerError};

/// Which rows to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    Head(usize),
    Tail(usize),
    Random(usize),
    All,
}

impl ExportMode {
    /// Sample size, `None` for [`ExportMode::All`].
    pub fn requested(&self) -> Option<usize> {
        match *self {
            ExportMode::Head(n) | ExportMode::Tail(n) | ExportMode::Random(n) => Some(n),
            ExportMode::All => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    CsvGzip,
    Parquet,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if name.ends_with(".gz") {
            Some(ExportFormat::CsvGzip)
        } else if name.ends_with(".parquet") || name.ends_with(".pq") {
            Some(ExportFormat::Parquet)
        } else if name.ends_with(".csv") || name.ends_with(".txt") {
            Some(ExportFormat::Csv)
        } else {
            None
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::CsvGzip => "csv.gz",
            ExportFormat::Parquet => "parquet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Field separator for CSV output.
    pub separator: u8,
    /// Columns left out of the export. Unknown names are ignored.
    pub exclude_columns: Vec<String>,
    /// Seed for [`ExportMode::Random`].
    pub seed: Option<u64>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            separator: b',',
            exclude_columns: Vec::new(),
            seed: None,
        }
    }
}

/// Pick the rows described by `mode`.
///
/// Asking for more rows than the table holds is rejected rather than
/// silently clamped.
pub fn select_rows(frame: &DataFrame, mode: ExportMode, seed: Option<u64>) -> Result<DataFrame> {
    let available = frame.height();
    if let Some(requested) = mode.requested() {
        if requested > available {
            return Err(ViewerError::ExportRange {
                requested,
                available,
            });
        }
    }
    let selected = match mode {
        ExportMode::Head(n) => frame.head(Some(n)),
        ExportMode::Tail(n) => frame.tail(Some(n)),
        ExportMode::Random(n) => frame.sample_n_literal(n, false, false, seed)?,
        ExportMode::All => frame.clone(),
    };
    Ok(selected)
}

fn without_columns(frame: &DataFrame, exclude: &[String]) -> Result<DataFrame> {
    if exclude.is_empty() {
        return Ok(frame.clone());
    }
    let keep: Vec<PlSmallStr> = frame
        .get_column_names()
        .into_iter()
        .filter(|name| !exclude.iter().any(|x| x.trim() == name.as_str()))
        .cloned()
        .collect();
    Ok(frame.select(keep)?)
}

/// Write the selected rows of `frame` to `path` and return how many rows
/// were written.
pub fn export(
    frame: &DataFrame,
    mode: ExportMode,
    format: ExportFormat,
    path: &Path,
    options: &ExportOptions,
) -> Result<usize> {
    let trimmed = without_columns(frame, &options.exclude_columns)?;
    let mut selected = select_rows(&trimmed, mode, options.seed)?;
    let file = File::create(path).map_err(|e| ViewerError::io(path, e))?;

    match format {
        ExportFormat::Csv => {
            let mut out = BufWriter::new(file);
            write_csv(&mut out, &mut selected, options.separator)?;
            out.flush().map_err(|e| ViewerError::io(path, e))?;
        }
        ExportFormat::CsvGzip => {
            let mut encoder = GzEncoder::new(BufWriter::new(file), GzLevel::default());
            write_csv(&mut encoder, &mut selected, options.separator)?;
            encoder
                .finish()
                .and_then(|mut inner| inner.flush())
                .map_err(|e| ViewerError::io(path, e))?;
        }
        ExportFormat::Parquet => {
            ParquetWriter::new(file)
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut selected)?;
        }
    }

    info!(
        "Exported {} rows ({:?}, {:?}) to {:?}",
        selected.height(),
        mode,
        format,
        path
    );
    Ok(selected.height())
}

fn write_csv<W: Write>(out: &mut W, frame: &mut DataFrame, separator: u8) -> Result<()> {
    CsvWriter::new(out)
        .include_header(true)
        .with_separator(separator)
        .finish(frame)?;
    Ok(())
}
