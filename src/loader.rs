//! Decoding of supported files into an in-memory table.
//!
//! Format is chosen by extension. Parquet goes through the polars Parquet
//! reader, delimited text through the polars CSV reader, and `*.gz` files are
//! inflated with flate2 before being parsed as delimited text.

use flate2::read::GzDecoder;
use ::parquet::file::reader::{FileReader, SerializedFileReader};
use polars::prelude::*;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use crate::error::{Result, ViewerError};
use crate::export::ExportFormat;

/// Rows scanned when inferring column types of delimited text.
const INFER_SCHEMA_ROWS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Parquet,
    Csv,
    /// Delimited text, `|` separated unless told otherwise.
    Text,
    Tsv,
    /// Gzip-compressed CSV or text.
    Gzip,
}

impl FileKind {
    pub fn detect(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if name.ends_with(".gz") {
            return Ok(FileKind::Gzip);
        }
        let ext = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        match ext {
            "parquet" | "pq" => Ok(FileKind::Parquet),
            "csv" => Ok(FileKind::Csv),
            "txt" | "dat" => Ok(FileKind::Text),
            "tsv" => Ok(FileKind::Tsv),
            other => Err(ViewerError::format(
                path,
                format!("unsupported file extension {other:?}"),
            )),
        }
    }

    pub fn default_separator(self) -> u8 {
        match self {
            FileKind::Text => b'|',
            FileKind::Tsv => b'\t',
            FileKind::Parquet | FileKind::Csv | FileKind::Gzip => b',',
        }
    }

    pub fn is_delimited(self) -> bool {
        self != FileKind::Parquet
    }
}

/// How delimited text is parsed. Ignored for Parquet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// `None` uses the file kind's default.
    pub separator: Option<u8>,
    pub has_header: bool,
    /// When false every column is read as a string.
    pub infer_types: bool,
    pub quote_char: Option<u8>,
    pub lossy_utf8: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            separator: None,
            has_header: true,
            infer_types: true,
            quote_char: Some(b'"'),
            lossy_utf8: true,
        }
    }
}

/// Decode `path` into a table on the calling thread.
pub fn read_table(path: &Path, options: &LoadOptions) -> Result<DataFrame> {
    let kind = FileKind::detect(path)?;
    std::fs::metadata(path).map_err(|e| ViewerError::io(path, e))?;
    let start = Instant::now();

    let mut frame = match kind {
        FileKind::Parquet => {
            let file = File::open(path).map_err(|e| ViewerError::io(path, e))?;
            ParquetReader::new(file)
                .finish()
                .map_err(|e| ViewerError::format(path, e))?
        }
        FileKind::Csv | FileKind::Text | FileKind::Tsv => {
            read_delimited(path, kind, options, |csv| {
                csv.try_into_reader_with_file_path(Some(path.to_path_buf()))?
                    .finish()
            })?
        }
        FileKind::Gzip => {
            let file = File::open(path).map_err(|e| ViewerError::io(path, e))?;
            let mut bytes = Vec::new();
            GzDecoder::new(file)
                .read_to_end(&mut bytes)
                .map_err(|e| ViewerError::format(path, e))?;
            debug!("Inflated {:?} to {} bytes", path, bytes.len());
            read_delimited(path, kind, options, |csv| {
                csv.into_reader_with_file_handle(Cursor::new(bytes.as_slice()))
                    .finish()
            })?
        }
    };

    if kind.is_delimited() && !options.has_header {
        name_columns_generically(&mut frame)?;
    }

    info!(
        "Loaded {:?} ({:?}, {} rows x {} columns) in {}ms",
        path,
        kind,
        frame.height(),
        frame.width(),
        start.elapsed().as_millis()
    );
    Ok(frame)
}

/// Parse delimited text, inferring types from a leading sample first.
///
/// A column that changes type after the sample fails the first pass, which
/// is then retried with inference over every row.
fn read_delimited<F>(path: &Path, kind: FileKind, options: &LoadOptions, read: F) -> Result<DataFrame>
where
    F: Fn(CsvReadOptions) -> PolarsResult<DataFrame>,
{
    let infer_rows = if options.infer_types {
        Some(INFER_SCHEMA_ROWS)
    } else {
        Some(0)
    };
    match read(csv_options(kind, options, infer_rows)) {
        Ok(frame) => Ok(frame),
        Err(e) if options.infer_types => {
            debug!(
                "Sampled inference failed for {:?} ({}), rescanning every row",
                path, e
            );
            read(csv_options(kind, options, None)).map_err(|e| ViewerError::format(path, e))
        }
        Err(e) => Err(ViewerError::format(path, e)),
    }
}

fn csv_options(kind: FileKind, options: &LoadOptions, infer_rows: Option<usize>) -> CsvReadOptions {
    let separator = options.separator.unwrap_or(kind.default_separator());
    let quote_char = options.quote_char;
    let encoding = if options.lossy_utf8 {
        CsvEncoding::LossyUtf8
    } else {
        CsvEncoding::Utf8
    };
    let try_parse_dates = options.infer_types;
    CsvReadOptions::default()
        .with_has_header(options.has_header)
        .with_infer_schema_length(infer_rows)
        .map_parse_options(move |parse| {
            parse
                .with_separator(separator)
                .with_quote_char(quote_char)
                .with_encoding(encoding)
                .with_truncate_ragged_lines(true)
                .with_try_parse_dates(try_parse_dates)
        })
}

// Headerless files get `col1..colN`.
fn name_columns_generically(frame: &mut DataFrame) -> Result<()> {
    let old: Vec<String> = frame
        .get_column_names()
        .into_iter()
        .map(|n| n.to_string())
        .collect();
    for (idx, name) in old.iter().enumerate() {
        frame.rename(name, format!("col{}", idx + 1).into())?;
    }
    Ok(())
}

/// Footer-level facts about a Parquet file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParquetInfo {
    pub rows: usize,
    pub row_groups: usize,
    pub columns: usize,
    pub created_by: Option<String>,
}

/// Read Parquet footer metadata without decoding any rows.
pub fn parquet_info(path: &Path) -> Result<ParquetInfo> {
    let file = File::open(path).map_err(|e| ViewerError::io(path, e))?;
    let reader = SerializedFileReader::new(file)?;
    let meta = reader.metadata();
    let file_meta = meta.file_metadata();
    Ok(ParquetInfo {
        rows: file_meta.num_rows().max(0) as usize,
        row_groups: meta.num_row_groups(),
        columns: file_meta.schema_descr().num_columns(),
        created_by: file_meta.created_by().map(str::to_string),
    })
}

/// Split a file name into stem and extension, treating `csv.gz` and
/// `txt.gz` as one extension.
pub fn split_file_name(path: &Path) -> (String, String) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let lower = name.to_ascii_lowercase();
    for compound in [".csv.gz", ".txt.gz"] {
        if lower.ends_with(compound) {
            let stem = name[..name.len() - compound.len()].to_string();
            return (stem, compound[1..].to_string());
        }
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), ext.to_string()),
        _ => (name, String::new()),
    }
}

/// Suggested export file name, `<stem>_export.<ext>`.
pub fn export_file_name(stem: &str, format: ExportFormat) -> String {
    let stem = if stem.is_empty() { "export" } else { stem };
    format!("{stem}_export.{}", format.extension())
}
