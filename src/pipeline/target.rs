//! Target column analysis and mapping
//!
//! The default indicator must be binary 0/1 for rate plots and correlation.
//! Datasets that label outcomes with strings ("Charged Off" / "Fully Paid",
//! "Yes" / "No") are mapped through a `TargetMapping`.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::values::{float_values, string_values};
use crate::error::{EdaError, Result};

/// Tolerance for floating point comparison when checking binary 0/1 values
const TOLERANCE: f64 = 1e-9;

/// Mapping configuration for converting target column values to binary 0/1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetMapping {
    /// Value that maps to 1 (default / event)
    pub event_value: String,
    /// Value that maps to 0 (repaid / non-event)
    pub non_event_value: String,
}

impl TargetMapping {
    pub fn new(event_value: impl Into<String>, non_event_value: impl Into<String>) -> Self {
        Self {
            event_value: event_value.into(),
            non_event_value: non_event_value.into(),
        }
    }
}

/// Result of analyzing a target column
#[derive(Debug, Clone, PartialEq)]
pub enum TargetAnalysis {
    /// Target column is already binary 0/1, no mapping needed
    AlreadyBinary,
    /// Target column needs mapping - contains these unique values
    NeedsMapping { unique_values: Vec<String> },
}

/// Analyze a target column to determine if it needs value mapping
pub fn analyze_target_column(df: &DataFrame, target: &str) -> Result<TargetAnalysis> {
    let target_col = df
        .column(target)
        .map_err(|_| EdaError::missing_column(df, target))?;

    if target_col.len() == 0 {
        return Err(EdaError::InvalidConfig(format!(
            "Target column '{}' is empty",
            target
        )));
    }

    if target_col.null_count() == target_col.len() {
        return Err(EdaError::InvalidConfig(format!(
            "Target column '{}' contains only null values",
            target
        )));
    }

    if target_col.dtype().is_primitive_numeric() && is_binary_numeric(target_col)? {
        return Ok(TargetAnalysis::AlreadyBinary);
    }

    let mut unique_values: Vec<String> = string_values(target_col)?
        .into_iter()
        .flatten()
        .collect();
    unique_values.sort();
    unique_values.dedup();

    if unique_values.is_empty() {
        return Err(EdaError::InvalidConfig(format!(
            "Target column '{}' has no valid (non-null) values",
            target
        )));
    }

    Ok(TargetAnalysis::NeedsMapping { unique_values })
}

fn is_binary_numeric(col: &Column) -> PolarsResult<bool> {
    Ok(float_values(col)?
        .into_iter()
        .flatten()
        .all(|v| v.abs() < TOLERANCE || (v - 1.0).abs() < TOLERANCE))
}

/// Create a binary target mask based on the mapping
///
/// Returns a Vec<Option<i32>> where:
/// - Some(1) for event values
/// - Some(0) for non-event values
/// - None for values that match neither
pub fn create_target_mask(
    df: &DataFrame,
    target: &str,
    mapping: &TargetMapping,
) -> Result<Vec<Option<i32>>> {
    let target_col = df
        .column(target)
        .map_err(|_| EdaError::missing_column(df, target))?;

    let mask = string_values(target_col)?
        .iter()
        .map(|v| match v {
            Some(s) if s == &mapping.event_value => Some(1),
            Some(s) if s == &mapping.non_event_value => Some(0),
            _ => None,
        })
        .collect();

    Ok(mask)
}

/// Count how many records match the event and non-event values
pub fn count_mapped_records(
    df: &DataFrame,
    target: &str,
    mapping: &TargetMapping,
) -> Result<(usize, usize, usize)> {
    let mask = create_target_mask(df, target, mapping)?;

    let events = mask.iter().filter(|v| **v == Some(1)).count();
    let non_events = mask.iter().filter(|v| **v == Some(0)).count();
    let ignored = mask.iter().filter(|v| v.is_none()).count();

    Ok((events, non_events, ignored))
}

/// Read a binary 0/1 target as `Option<i32>` per row (missing rows are `None`)
pub fn binary_target_values(df: &DataFrame, target: &str) -> Result<Vec<Option<i32>>> {
    match analyze_target_column(df, target)? {
        TargetAnalysis::AlreadyBinary => {
            let col = df.column(target)?;
            Ok(float_values(col)?
                .into_iter()
                .map(|v| v.map(|x| if x.abs() < TOLERANCE { 0 } else { 1 }))
                .collect())
        }
        TargetAnalysis::NeedsMapping { unique_values } => Err(EdaError::NonBinaryTarget {
            column: target.to_string(),
            values: unique_values,
        }),
    }
}
