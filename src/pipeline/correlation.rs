//! Correlation of numeric features with the target, and the full feature
//! correlation matrix used by the heatmap

use faer::Mat;
use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::schema::{has_column, ColumnKind};
use super::values::float_values;
use crate::error::{EdaError, Result};

/// Pearson correlation of one feature with the target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetCorrelation {
    pub feature: String,
    pub correlation: f64,
    /// Rows where both the feature and the target are present
    pub observations: usize,
}

/// Represents a correlated pair of features
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelatedPair {
    pub feature1: String,
    pub feature2: String,
    pub correlation: f64,
}

/// Pearson correlation matrix over numeric, non-constant columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major `columns.len() x columns.len()` coefficients
    pub values: Vec<Vec<f64>>,
    /// Complete rows the matrix was computed on
    pub observations: usize,
}

impl CorrelationMatrix {
    /// Coefficient between two named columns
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Compute Pearson correlation with Welford's single-pass algorithm.
///
/// Only rows where both values are present contribute. Returns `None` with
/// fewer than two such rows or when either side has zero variance.
pub fn pearson_correlation(x: &[Option<f64>], y: &[Option<f64>]) -> Option<(f64, usize)> {
    if x.len() != y.len() {
        return None;
    }

    let mut n = 0usize;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (x, y) in x.iter().zip(y.iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            n += 1;
            let dx = x - mean_x;
            let dy = y - mean_y;
            mean_x += dx / n as f64;
            mean_y += dy / n as f64;
            var_x += dx * (x - mean_x);
            var_y += dy * (y - mean_y);
            cov_xy += dx * (y - mean_y);
        }
    }

    if n < 2 || var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    let r = cov_xy / (var_x.sqrt() * var_y.sqrt());
    if r.is_nan() {
        return None;
    }
    Some((r.clamp(-1.0, 1.0), n))
}

fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| ColumnKind::of(col) == ColumnKind::Numeric)
        .map(|col| col.name().to_string())
        .collect()
}

/// Correlate every numeric column with the target.
///
/// Fails if the target is absent or not numeric. Columns without a defined
/// coefficient (constant, or fewer than two paired values) are omitted.
/// Results are ordered by absolute coefficient descending; ties keep column
/// order.
pub fn correlation_analysis(df: &DataFrame, target: &str) -> Result<Vec<TargetCorrelation>> {
    if !has_column(df, target) {
        return Err(EdaError::missing_column(df, target));
    }

    let target_col = df.column(target)?;
    if ColumnKind::of(target_col) != ColumnKind::Numeric {
        return Err(EdaError::NonNumeric {
            column: target.to_string(),
            dtype: target_col.dtype().to_string(),
        });
    }
    let target_values = float_values(target_col)?;

    let mut correlations = Vec::new();
    for name in numeric_column_names(df) {
        if name == target {
            continue;
        }
        let values = float_values(df.column(&name)?)?;
        match pearson_correlation(&values, &target_values) {
            Some((correlation, observations)) => correlations.push(TargetCorrelation {
                feature: name,
                correlation,
                observations,
            }),
            None => debug!(column = %name, "correlation undefined, skipping"),
        }
    }

    // sort_by is stable: equal magnitudes keep column order
    correlations.sort_by(|a, b| {
        b.correlation
            .abs()
            .partial_cmp(&a.correlation.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(correlations)
}

/// Compute the correlation matrix using matrix operations.
///
/// Algorithm:
/// 1. Keep rows where every numeric column is present
/// 2. Drop constant columns, standardize: Z = (X - mean) / (std * sqrt(n))
/// 3. R = Z^T * Z
pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
    let names = numeric_column_names(df);
    let columns: Vec<Vec<Option<f64>>> = names
        .iter()
        .map(|name| Ok(float_values(df.column(name)?)?))
        .collect::<Result<_>>()?;

    let complete_rows: Vec<usize> = (0..df.height())
        .filter(|&row| columns.iter().all(|col| col[row].is_some()))
        .collect();
    let n_rows = complete_rows.len();

    let mut kept_names = Vec::new();
    let mut standardized: Vec<Vec<f64>> = Vec::new();

    if n_rows >= 2 {
        for (name, col) in names.iter().zip(columns.iter()) {
            let values: Vec<f64> = complete_rows.iter().filter_map(|&r| col[r]).collect();
            let mean = values.iter().sum::<f64>() / n_rows as f64;
            let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
            if ss <= 0.0 {
                debug!(column = %name, "constant column excluded from correlation matrix");
                continue;
            }
            let scale = ss.sqrt();
            kept_names.push(name.clone());
            standardized.push(values.iter().map(|v| (v - mean) / scale).collect());
        }
    }

    let k = kept_names.len();
    let mut z = Mat::<f64>::zeros(n_rows, k);
    for (col_idx, col_data) in standardized.iter().enumerate() {
        for (row_idx, &val) in col_data.iter().enumerate() {
            z[(row_idx, col_idx)] = val;
        }
    }

    let corr = z.transpose() * &z;

    let values = (0..k)
        .map(|i| {
            (0..k)
                .map(|j| if i == j { 1.0 } else { corr[(i, j)].clamp(-1.0, 1.0) })
                .collect()
        })
        .collect();

    Ok(CorrelationMatrix {
        columns: kept_names,
        values,
        observations: n_rows,
    })
}

/// Extract feature pairs whose absolute correlation exceeds the threshold,
/// sorted by absolute correlation descending
pub fn find_correlated_pairs(matrix: &CorrelationMatrix, threshold: f64) -> Vec<CorrelatedPair> {
    let n = matrix.len();
    let mut pairs = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            let corr = matrix.values[i][j];
            if corr.abs() > threshold && !corr.is_nan() {
                pairs.push(CorrelatedPair {
                    feature1: matrix.columns[i].clone(),
                    feature2: matrix.columns[j].clone(),
                    correlation: corr,
                });
            }
        }
    }

    pairs.sort_by(|a, b| {
        b.correlation
            .abs()
            .partial_cmp(&a.correlation.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    pairs
}
