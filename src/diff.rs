//! Bidirectional comparison of two schema documents.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::error::Result;
use crate::schema::{SchemaDocument, SchemaEntry, TypeTag};

/// A column present on both sides with different types.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeMismatch {
    pub name: String,
    pub left: TypeTag,
    pub right: TypeTag,
}

/// A column present on both sides at a different position.
///
/// Positions are 1-based ranks among the columns the two documents share.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderMismatch {
    pub name: String,
    pub left_position: usize,
    pub right_position: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffReport {
    pub only_in_left: Vec<SchemaEntry>,
    pub only_in_right: Vec<SchemaEntry>,
    pub type_mismatches: Vec<TypeMismatch>,
    pub order_mismatches: Vec<OrderMismatch>,
}

impl DiffReport {
    pub fn is_empty(&self) -> bool {
        self.total_differences() == 0
    }

    pub fn total_differences(&self) -> usize {
        self.only_in_left.len()
            + self.only_in_right.len()
            + self.type_mismatches.len()
            + self.order_mismatches.len()
    }
}

/// Compare `left` against `right`.
///
/// Every output list follows the column order of the document it came from:
/// left order for `only_in_left` and both mismatch lists, right order for
/// `only_in_right`.
pub fn diff(left: &SchemaDocument, right: &SchemaDocument) -> DiffReport {
    let left_types: HashMap<&str, &TypeTag> =
        left.into_iter().map(|e| (e.name.as_str(), &e.type_tag)).collect();
    let right_types: HashMap<&str, &TypeTag> =
        right.into_iter().map(|e| (e.name.as_str(), &e.type_tag)).collect();

    let only_in_left = left
        .into_iter()
        .filter(|e| !right_types.contains_key(e.name.as_str()))
        .cloned()
        .collect();
    let only_in_right = right
        .into_iter()
        .filter(|e| !left_types.contains_key(e.name.as_str()))
        .cloned()
        .collect();

    let common_left: Vec<&SchemaEntry> = left
        .into_iter()
        .filter(|e| right_types.contains_key(e.name.as_str()))
        .collect();
    let right_rank: HashMap<&str, usize> = right
        .into_iter()
        .filter(|e| left_types.contains_key(e.name.as_str()))
        .enumerate()
        .map(|(rank, e)| (e.name.as_str(), rank))
        .collect();

    let mut type_mismatches = Vec::new();
    let mut order_mismatches = Vec::new();
    for (rank, entry) in common_left.iter().enumerate() {
        let name = entry.name.as_str();
        let right_type = right_types[name];
        if entry.type_tag != *right_type {
            type_mismatches.push(TypeMismatch {
                name: name.to_string(),
                left: entry.type_tag.clone(),
                right: right_type.clone(),
            });
        }
        let other = right_rank[name];
        if rank != other {
            order_mismatches.push(OrderMismatch {
                name: name.to_string(),
                left_position: rank + 1,
                right_position: other + 1,
            });
        }
    }

    DiffReport {
        only_in_left,
        only_in_right,
        type_mismatches,
        order_mismatches,
    }
}

/// Parse two JSON schema documents and compare them.
pub fn diff_json(left: &str, right: &str) -> Result<DiffReport> {
    let left = SchemaDocument::from_json_str(left)?;
    let right = SchemaDocument::from_json_str(right)?;
    Ok(diff(&left, &right))
}

pub fn diff_files(left: &Path, right: &Path) -> Result<DiffReport> {
    let left = SchemaDocument::read_json(left)?;
    let right = SchemaDocument::read_json(right)?;
    Ok(diff(&left, &right))
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "Schemas are identical (columns, types and order match).");
        }
        writeln!(f, "{} difference(s) found.", self.total_differences())?;
        if !self.only_in_left.is_empty() {
            writeln!(f, "\n--- Only in first file ({}) ---", self.only_in_left.len())?;
            for e in &self.only_in_left {
                writeln!(f, "{}: {}", e.name, e.type_tag)?;
            }
        }
        if !self.only_in_right.is_empty() {
            writeln!(f, "\n--- Only in second file ({}) ---", self.only_in_right.len())?;
            for e in &self.only_in_right {
                writeln!(f, "{}: {}", e.name, e.type_tag)?;
            }
        }
        if !self.type_mismatches.is_empty() {
            writeln!(f, "\n--- Type mismatches ({}) ---", self.type_mismatches.len())?;
            for m in &self.type_mismatches {
                writeln!(f, "{}: {} vs {}", m.name, m.left, m.right)?;
            }
        }
        if !self.order_mismatches.is_empty() {
            writeln!(f, "\n--- Order mismatches ({}) ---", self.order_mismatches.len())?;
            for m in &self.order_mismatches {
                writeln!(
                    f,
                    "{}: position {} in file 1 vs position {} in file 2",
                    m.name, m.left_position, m.right_position
                )?;
            }
        }
        Ok(())
    }
}
