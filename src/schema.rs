//! Schema extraction and persistence.
//!
//! A [`SchemaDocument`] is an ordered list of column names and types. It can
//! be derived from a loaded table, written to JSON or Excel, and read back
//! from JSON for comparison with [`crate::diff`].

use polars::prelude::*;
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{Result, ViewerError};

/// Column type as it appears in a schema document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeTag {
    String,
    Integer,
    Double,
    Boolean,
    Timestamp,
    Date,
    Null,
    /// Any name outside the known set, kept verbatim.
    Other(String),
}

impl TypeTag {
    /// Map a polars dtype onto a schema type.
    pub fn from_dtype(dtype: &DataType) -> Self {
        if dtype.is_integer() {
            return TypeTag::Integer;
        }
        if dtype.is_float() {
            return TypeTag::Double;
        }
        match dtype {
            DataType::Boolean => TypeTag::Boolean,
            DataType::Datetime(_, _) => TypeTag::Timestamp,
            DataType::Date => TypeTag::Date,
            DataType::Null => TypeTag::Null,
            _ => TypeTag::String,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TypeTag::String => "string",
            TypeTag::Integer => "integer",
            TypeTag::Double => "double",
            TypeTag::Boolean => "boolean",
            TypeTag::Timestamp => "timestamp",
            TypeTag::Date => "date",
            TypeTag::Null => "null",
            TypeTag::Other(name) => name,
        }
    }
}

impl From<&str> for TypeTag {
    fn from(name: &str) -> Self {
        let name = name.trim();
        match name.to_ascii_lowercase().as_str() {
            "string" => TypeTag::String,
            "integer" | "int" | "long" => TypeTag::Integer,
            "double" | "float" => TypeTag::Double,
            "boolean" | "bool" => TypeTag::Boolean,
            "timestamp" => TypeTag::Timestamp,
            "date" => TypeTag::Date,
            "null" => TypeTag::Null,
            _ => TypeTag::Other(name.to_string()),
        }
    }
}

impl From<String> for TypeTag {
    fn from(name: String) -> Self {
        TypeTag::from(name.as_str())
    }
}

impl From<TypeTag> for String {
    fn from(tag: TypeTag) -> Self {
        tag.as_str().to_string()
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column of a schema document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: TypeTag,
    /// Polars dtype name, e.g. `i64` or `str`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_type: Option<String>,
    /// File the column was extracted from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl SchemaEntry {
    pub fn new(name: impl Into<String>, type_tag: impl Into<TypeTag>) -> Self {
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
            native_type: None,
            source: None,
        }
    }
}

/// Ordered schema entries, unique by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SchemaDocument {
    entries: Vec<SchemaEntry>,
}

/// Envelope written by earlier releases of the viewer.
#[derive(Deserialize)]
struct LegacyDocument {
    schema: Vec<LegacyEntry>,
    #[serde(default)]
    data_file: Option<String>,
}

#[derive(Deserialize)]
struct LegacyEntry {
    column_name: String,
    spark_type: TypeTag,
    #[serde(default)]
    pandas_type: Option<String>,
}

impl SchemaDocument {
    /// Build a document, rejecting duplicate column names.
    pub fn new(entries: Vec<SchemaEntry>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.name.as_str()) {
                return Err(ViewerError::SchemaParse(format!(
                    "duplicate column name {:?}",
                    entry.name
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Describe the columns of `frame` in column order.
    pub fn from_frame(frame: &DataFrame, source: Option<&str>) -> Self {
        let entries = frame
            .get_columns()
            .iter()
            .map(|col| SchemaEntry {
                name: col.name().to_string(),
                type_tag: TypeTag::from_dtype(col.dtype()),
                native_type: Some(col.dtype().to_string()),
                source: source.map(str::to_string),
            })
            .collect();
        // Polars frames cannot hold two columns with the same name.
        Self { entries }
    }

    /// Parse either the bare entry array or the legacy envelope.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| ViewerError::SchemaParse(e.to_string()))?;
        let entries = match value {
            serde_json::Value::Array(_) => serde_json::from_value::<Vec<SchemaEntry>>(value)
                .map_err(|e| ViewerError::SchemaParse(e.to_string()))?,
            serde_json::Value::Object(_) => {
                let legacy: LegacyDocument = serde_json::from_value(value)
                    .map_err(|e| ViewerError::SchemaParse(e.to_string()))?;
                legacy
                    .schema
                    .into_iter()
                    .map(|e| SchemaEntry {
                        name: e.column_name,
                        type_tag: e.spark_type,
                        native_type: e.pandas_type,
                        source: legacy.data_file.clone(),
                    })
                    .collect()
            }
            _ => {
                return Err(ViewerError::SchemaParse(
                    "expected a JSON array of columns or an object with a \"schema\" field"
                        .into(),
                ));
            }
        };
        Self::new(entries)
    }

    pub fn read_json(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ViewerError::io(path, e))?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let text = self.to_json_string()?;
        fs::write(path, text).map_err(|e| ViewerError::io(path, e))?;
        info!("Wrote schema with {} columns to {:?}", self.len(), path);
        Ok(())
    }

    /// Write the schema as a single `Schema` worksheet.
    pub fn write_excel(&self, path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Schema")?;
        for (col, title) in ["Column Name", "Native Type", "Type"].iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *title, &bold)?;
        }
        for (idx, entry) in self.entries.iter().enumerate() {
            let row = idx as u32 + 1;
            sheet.write_string(row, 0, &entry.name)?;
            sheet.write_string(row, 1, entry.native_type.as_deref().unwrap_or(""))?;
            sheet.write_string(row, 2, entry.type_tag.as_str())?;
        }
        workbook.save(path)?;
        info!("Wrote schema workbook to {:?}", path);
        Ok(())
    }

    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&SchemaEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

impl<'a> IntoIterator for &'a SchemaDocument {
    type Item = &'a SchemaEntry;
    type IntoIter = std::slice::Iter<'a, SchemaEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_are_normalized() {
        assert_eq!(TypeTag::from("int"), TypeTag::Integer);
        assert_eq!(TypeTag::from("Integer"), TypeTag::Integer);
        assert_eq!(TypeTag::from("bool"), TypeTag::Boolean);
        assert_eq!(TypeTag::from("text"), TypeTag::Other("text".into()));
        assert_eq!(TypeTag::from("text").to_string(), "text");
        assert_ne!(TypeTag::from("text"), TypeTag::String);
        assert_eq!(TypeTag::from(" text "), TypeTag::from("text"));
        assert_eq!(TypeTag::from(" string "), TypeTag::String);
    }

    #[test]
    fn dtypes_map_to_schema_types() {
        assert_eq!(TypeTag::from_dtype(&DataType::UInt16), TypeTag::Integer);
        assert_eq!(TypeTag::from_dtype(&DataType::Float32), TypeTag::Double);
        assert_eq!(TypeTag::from_dtype(&DataType::String), TypeTag::String);
        assert_eq!(
            TypeTag::from_dtype(&DataType::Datetime(TimeUnit::Milliseconds, None)),
            TypeTag::Timestamp
        );
    }
}
