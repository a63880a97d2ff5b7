//! Viewing, filtering, exporting and schema comparison for tabular files.
//!
//! Tables are polars [`DataFrame`](polars::prelude::DataFrame)s decoded by
//! [`loader`], usually on a worker thread through [`background`]. The
//! [`table_model`] serves their cells to a virtually scrolled grid, and
//! [`schema`] with [`diff`] describe and compare their structure.

pub mod background;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod export;
pub mod loader;
pub mod pagination;
pub mod schema;
pub mod search;
pub mod table_model;
pub mod value;

pub use error::{Result, ViewerError};
