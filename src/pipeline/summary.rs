//! Descriptive statistics over a table
//!
//! The caller decides which table to pass: the raw table for a data-quality
//! review, the cleaned one for verification.

use std::collections::HashSet;

use polars::prelude::*;
use serde::Serialize;

use super::schema::ColumnKind;
use super::values::{mean, missing_count, present_floats, quantile_linear, sample_std, sorted, string_values};
use crate::error::Result;

/// count, mean, std, min, quartiles, max of a numeric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two values
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl NumericStats {
    /// Statistics of the present values; `None` when there are none
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let sorted_values = sorted(values);
        let first = *sorted_values.first()?;
        let last = *sorted_values.last()?;
        Some(Self {
            count: sorted_values.len(),
            mean: mean(&sorted_values)?,
            std: sample_std(&sorted_values),
            min: first,
            q25: quantile_linear(&sorted_values, 0.25)?,
            median: quantile_linear(&sorted_values, 0.5)?,
            q75: quantile_linear(&sorted_values, 0.75)?,
            max: last,
        })
    }
}

/// Inferred type and missing count of one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub missing: usize,
}

/// Per-column summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    pub dtype: String,
    pub missing: usize,
    pub missing_ratio: f64,
    pub distinct: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<NumericStats>,
}

/// Summary of a whole table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
}

impl DatasetSummary {
    /// Look up a column's summary by name
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Missing counts keyed by column, in column order
    pub fn missing(&self) -> Vec<(String, usize)> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.missing))
            .collect()
    }

    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|c| c.missing).sum()
    }
}

fn distinct_count(col: &Column) -> Result<usize> {
    let distinct: HashSet<String> = string_values(col)?.into_iter().flatten().collect();
    Ok(distinct.len())
}

/// Summarize every column of the table. The input is not modified.
pub fn summarize(df: &DataFrame) -> Result<DatasetSummary> {
    let rows = df.height();
    let mut columns = Vec::with_capacity(df.width());

    for col in df.get_columns() {
        let kind = ColumnKind::of(col);
        let missing = missing_count(col)?;
        let stats = match kind {
            ColumnKind::Numeric => NumericStats::from_values(&present_floats(col)?),
            _ => None,
        };

        columns.push(ColumnSummary {
            name: col.name().to_string(),
            kind,
            dtype: col.dtype().to_string(),
            missing,
            missing_ratio: if rows > 0 { missing as f64 / rows as f64 } else { 0.0 },
            distinct: distinct_count(col)?,
            stats,
        });
    }

    Ok(DatasetSummary { rows, columns })
}

/// Inferred kind and missing count per column, in column order
pub fn infer_column_types(df: &DataFrame) -> Result<Vec<ColumnProfile>> {
    df.get_columns()
        .iter()
        .map(|col| {
            Ok(ColumnProfile {
                name: col.name().to_string(),
                kind: ColumnKind::of(col),
                missing: missing_count(col)?,
            })
        })
        .collect()
}
