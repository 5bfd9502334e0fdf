//! Missing value analysis

use polars::prelude::*;

use super::values::missing_count;
use crate::error::Result;

/// Count missing cells (nulls and NaN) per column, in column order
pub fn missing_counts(df: &DataFrame) -> Result<Vec<(String, usize)>> {
    df.get_columns()
        .iter()
        .map(|col| Ok((col.name().to_string(), missing_count(col)?)))
        .collect()
}

/// Analyze missing values in the dataset.
///
/// Returns `(column, missing_count / row_count)` sorted by ratio descending.
/// Ties keep column order.
pub fn analyze_missing_values(df: &DataFrame) -> Result<Vec<(String, f64)>> {
    if df.height() == 0 {
        return Ok(Vec::new());
    }

    let rows = df.height() as f64;
    let mut missing_ratios: Vec<(String, f64)> = missing_counts(df)?
        .into_iter()
        .map(|(name, count)| (name, count as f64 / rows))
        .collect();

    missing_ratios.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    Ok(missing_ratios)
}

/// Get features whose missing ratio exceeds the threshold (target is never returned)
pub fn get_features_above_threshold(
    missing_ratios: &[(String, f64)],
    threshold: f64,
    target_column: &str,
) -> Vec<String> {
    missing_ratios
        .iter()
        .filter(|(name, ratio)| *ratio > threshold && name != target_column)
        .map(|(name, _)| name.clone())
        .collect()
}

/// Columns with no present value at all
pub fn get_fully_missing_columns(missing_ratios: &[(String, f64)]) -> Vec<String> {
    missing_ratios
        .iter()
        .filter(|(_, ratio)| *ratio >= 1.0)
        .map(|(name, _)| name.clone())
        .collect()
}
