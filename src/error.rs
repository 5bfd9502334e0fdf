//! Error types for the analysis pipeline.
//!
//! Library functions return `EdaError` so callers can tell fatal failures
//! (a missing input file) apart from locally reportable ones (an absent
//! column, a degenerate test). The binary wraps these in `anyhow`.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the loading, cleaning and analysis stages.
#[derive(Debug, Error)]
pub enum EdaError {
    /// Input path does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// File extension is neither `csv` nor `parquet`.
    #[error("Unsupported file format: '{0}'. Supported formats: csv, parquet")]
    UnsupportedFormat(String),

    /// A referenced column is absent from the table.
    #[error("Column '{column}' not found. Available columns: {available:?}")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// A column that must be numeric holds another type.
    #[error("Column '{column}' must be numeric, found {dtype}")]
    NonNumeric { column: String, dtype: String },

    /// The target holds values other than 0/1 where a binary target is needed.
    #[error("Target column '{column}' must be binary (0/1). Found values: {values:?}")]
    NonBinaryTarget { column: String, values: Vec<String> },

    /// A statistical test has too few categories to be defined.
    #[error("Degenerate test: column '{column}' has {categories} distinct categories, at least 2 required")]
    DegenerateTest { column: String, categories: usize },

    /// A configuration value is out of range or inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A distribution could not be constructed.
    #[error("Statistics error: {0}")]
    Statistics(String),

    /// Chart encoding failed.
    #[error("Failed to write chart {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),
}

impl EdaError {
    /// Build a `MissingColumn` error listing the table's columns.
    pub fn missing_column(df: &polars::prelude::DataFrame, column: &str) -> Self {
        EdaError::MissingColumn {
            column: column.to_string(),
            available: df
                .get_column_names()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// True for errors the orchestrator reports and moves past.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EdaError::MissingColumn { .. }
                | EdaError::NonNumeric { .. }
                | EdaError::NonBinaryTarget { .. }
                | EdaError::DegenerateTest { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EdaError>;
