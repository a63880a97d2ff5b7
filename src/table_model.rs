//! Index-based access to an in-memory table for a virtually scrolled grid.
//!
//! The model never materializes rendered rows up front. The grid asks for
//! `(row, column)` pairs of the rows it is about to paint and the model
//! renders just those cells. A search filter is kept as a list of
//! underlying row indices, rebuilt in full whenever the term changes.

use polars::prelude::*;
use rayon::prelude::*;
use std::ops::Range;
use std::time::Instant;
use tracing::{debug, trace};

use crate::error::{Result, ViewerError};
use crate::search::SearchTerm;
use crate::value::render_any_value;

/// Why the view asked for a repaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// The whole table was replaced or cleared.
    Reset,
    /// The filtered view was rebuilt.
    Filtered,
}

type RefreshHook = Box<dyn FnMut(Refresh)>;

pub struct TableModel {
    frame: DataFrame,
    // None is the identity view.
    view: Option<Vec<usize>>,
    term: SearchTerm,
    hook: Option<RefreshHook>,
}

impl Default for TableModel {
    fn default() -> Self {
        Self::empty()
    }
}

impl TableModel {
    pub fn empty() -> Self {
        Self::new(DataFrame::empty())
    }

    pub fn new(frame: DataFrame) -> Self {
        Self {
            frame,
            view: None,
            term: SearchTerm::default(),
            hook: None,
        }
    }

    /// Register the callback fired after every change to the visible rows.
    pub fn set_refresh_hook(&mut self, hook: impl FnMut(Refresh) + 'static) {
        self.hook = Some(Box::new(hook));
    }

    /// Swap in a freshly loaded table, dropping the previous one and its filter.
    pub fn replace(&mut self, frame: DataFrame) {
        self.frame = frame;
        self.view = None;
        self.term = SearchTerm::default();
        self.notify(Refresh::Reset);
    }

    pub fn clear(&mut self) {
        self.replace(DataFrame::empty());
    }

    pub fn is_empty(&self) -> bool {
        self.frame.width() == 0
    }

    /// Number of visible rows.
    pub fn row_count(&self) -> usize {
        match &self.view {
            Some(rows) => rows.len(),
            None => self.frame.height(),
        }
    }

    pub fn column_count(&self) -> usize {
        self.frame.width()
    }

    /// Row count of the underlying table, ignoring the filter.
    pub fn total_rows(&self) -> usize {
        self.frame.height()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect()
    }

    pub fn header(&self, column: usize) -> Option<String> {
        self.frame
            .get_columns()
            .get(column)
            .map(|c| c.name().to_string())
    }

    /// 1-based position of a visible row in the underlying table.
    pub fn row_label(&self, row: usize) -> Option<usize> {
        (row < self.row_count()).then(|| self.source_row(row) + 1)
    }

    /// Rendered value at visible row `row` and column `column`.
    pub fn cell_value(&self, row: usize, column: usize) -> Result<String> {
        let rows = self.row_count();
        let columns = self.column_count();
        if row >= rows || column >= columns {
            return Err(ViewerError::Index {
                row,
                column,
                rows,
                columns,
            });
        }
        let value = self.frame.get_columns()[column].get(self.source_row(row))?;
        Ok(render_any_value(&value))
    }

    /// Cell accessor for the grid.
    ///
    /// The grid only asks for cells it was told exist, so out-of-range access
    /// is a bug: it panics in debug builds and is clamped in release builds.
    pub fn display_cell(&self, row: usize, column: usize) -> String {
        let rows = self.row_count();
        let columns = self.column_count();
        debug_assert!(
            row < rows && column < columns,
            "cell ({row}, {column}) out of range for a {rows}x{columns} view"
        );
        if rows == 0 || columns == 0 {
            return String::new();
        }
        self.cell_value(row.min(rows - 1), column.min(columns - 1))
            .unwrap_or_default()
    }

    /// Render the visible rows in `range`, clipped to the view.
    pub fn rows(&self, range: Range<usize>) -> Vec<Vec<String>> {
        let end = range.end.min(self.row_count());
        let start = range.start.min(end);
        (start..end)
            .map(|r| {
                (0..self.column_count())
                    .map(|c| self.display_cell(r, c))
                    .collect()
            })
            .collect()
    }

    /// Keep only rows where some cell contains `term`, ignoring case.
    ///
    /// An empty term restores every row.
    pub fn set_filter(&mut self, term: &str) {
        let term = SearchTerm::new(term);
        if term.is_empty() {
            self.view = None;
        } else {
            let start = Instant::now();
            let columns = self.frame.get_columns();
            let rows: Vec<usize> = (0..self.frame.height())
                .into_par_iter()
                .filter(|&row| row_matches(columns, row, &term))
                .collect();
            debug!(
                "Filter {:?} kept {} of {} rows in {}ms",
                term.as_str(),
                rows.len(),
                self.frame.height(),
                start.elapsed().as_millis()
            );
            self.view = Some(rows);
        }
        self.term = term;
        self.notify(Refresh::Filtered);
    }

    pub fn filter_term(&self) -> &str {
        self.term.as_str()
    }

    pub fn is_filtered(&self) -> bool {
        self.view.is_some()
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// The visible rows as their own table.
    pub fn visible_frame(&self) -> Result<DataFrame> {
        match &self.view {
            None => Ok(self.frame.clone()),
            Some(rows) => {
                let idx = IdxCa::from_vec(
                    "idx".into(),
                    rows.iter().map(|&r| r as IdxSize).collect(),
                );
                Ok(self.frame.take(&idx)?)
            }
        }
    }

    fn source_row(&self, row: usize) -> usize {
        match &self.view {
            Some(rows) => rows[row],
            None => row,
        }
    }

    fn notify(&mut self, reason: Refresh) {
        trace!("Table model refresh: {reason:?}");
        if let Some(hook) = self.hook.as_mut() {
            hook(reason);
        }
    }
}

fn row_matches(columns: &[Column], row: usize, term: &SearchTerm) -> bool {
    columns.iter().any(|col| {
        col.get(row)
            .map(|v| term.matches(&render_any_value(&v)))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_model_has_no_rows() {
        let mut model = TableModel::empty();
        assert_eq!(model.row_count(), 0);
        assert_eq!(model.column_count(), 0);
        model.set_filter("x");
        assert_eq!(model.row_count(), 0);
        assert!(model.cell_value(0, 0).is_err());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn display_cell_panics_in_debug() {
        let df = df!("a" => &["x", "y"]).unwrap();
        TableModel::new(df).display_cell(5, 3);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn display_cell_clamps_in_release() {
        let df = df!("a" => &["x", "y"]).unwrap();
        let model = TableModel::new(df);
        assert_eq!(model.display_cell(5, 3), "y");
    }
}
