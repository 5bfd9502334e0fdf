//! Association between categorical attributes and the target
//!
//! Chi-square test of independence with Cramér's V, per-category target
//! rates, and quantile banding so numeric attributes (age, income) can be
//! tested the same way.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use polars::prelude::*;
use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};
use tracing::debug;

use super::schema::{has_column, ColumnKind};
use super::target::binary_target_values;
use super::values::{float_values, present_floats, quantile_linear, sorted, string_values};
use crate::error::{EdaError, Result};

/// Position of a category label in display order
#[derive(Debug, Clone, Copy, PartialEq)]
enum CategoryKey {
    Number(f64),
    Text,
}

impl CategoryKey {
    /// Band labels key on their lower edge, plain numbers on their value
    fn of(label: &str) -> Self {
        let numeric = label
            .strip_prefix('[')
            .and_then(|rest| rest.split(',').next())
            .unwrap_or(label)
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite());
        match numeric {
            Some(x) => CategoryKey::Number(x),
            None => CategoryKey::Text,
        }
    }
}

/// Order category labels for display and tabulation.
///
/// Numeric labels and quantile band labels (`[lo, hi)`) sort by value and
/// come before text labels, which sort lexically. Ties fall back to the
/// label text so the order is total.
pub fn compare_categories(a: &str, b: &str) -> Ordering {
    let by_key = match (CategoryKey::of(a), CategoryKey::of(b)) {
        (CategoryKey::Number(x), CategoryKey::Number(y)) => x.total_cmp(&y),
        (CategoryKey::Number(_), CategoryKey::Text) => Ordering::Less,
        (CategoryKey::Text, CategoryKey::Number(_)) => Ordering::Greater,
        (CategoryKey::Text, CategoryKey::Text) => Ordering::Equal,
    };
    by_key.then_with(|| a.cmp(b))
}

/// Distinct labels in [`compare_categories`] order
fn ordered_categories<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut categories: Vec<String> = labels.map(str::to_string).collect();
    categories.sort_by(|a, b| compare_categories(a, b));
    categories.dedup();
    categories
}

/// Cross-tabulation of two categorical columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContingencyTable {
    /// Categories of the tested column in [`compare_categories`] order
    pub row_categories: Vec<String>,
    /// Categories of the target in the same order
    pub col_categories: Vec<String>,
    /// `observed[i][j]`: rows with row category i and column category j
    pub observed: Vec<Vec<f64>>,
}

impl ContingencyTable {
    /// Count co-occurrences over rows where both values are present
    pub fn from_values(rows: &[Option<String>], cols: &[Option<String>]) -> Self {
        let pairs: Vec<(&str, &str)> = rows
            .iter()
            .zip(cols.iter())
            .filter_map(|(r, c)| Some((r.as_deref()?, c.as_deref()?)))
            .collect();

        let row_categories = ordered_categories(pairs.iter().map(|(r, _)| *r));
        let col_categories = ordered_categories(pairs.iter().map(|(_, c)| *c));

        let row_index: HashMap<&str, usize> =
            row_categories.iter().enumerate().map(|(i, s)| (s.as_str(), i)).collect();
        let col_index: HashMap<&str, usize> =
            col_categories.iter().enumerate().map(|(i, s)| (s.as_str(), i)).collect();

        let mut observed = vec![vec![0.0; col_categories.len()]; row_categories.len()];
        for (r, c) in pairs {
            observed[row_index[r]][col_index[c]] += 1.0;
        }

        Self {
            row_categories,
            col_categories,
            observed,
        }
    }

    pub fn total(&self) -> f64 {
        self.observed.iter().flatten().sum()
    }

    pub fn row_totals(&self) -> Vec<f64> {
        self.observed.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn col_totals(&self) -> Vec<f64> {
        (0..self.col_categories.len())
            .map(|j| self.observed.iter().map(|row| row[j]).sum())
            .collect()
    }

    /// Expected counts under independence: row_total * col_total / n
    pub fn expected(&self) -> Vec<Vec<f64>> {
        let n = self.total();
        let col_totals = self.col_totals();
        self.row_totals()
            .iter()
            .map(|r| col_totals.iter().map(|c| r * c / n).collect())
            .collect()
    }

    pub fn degrees_of_freedom(&self) -> usize {
        self.row_categories.len().saturating_sub(1) * self.col_categories.len().saturating_sub(1)
    }

    /// Pearson chi-square statistic.
    ///
    /// With `yates`, each observed count is moved towards its expected count
    /// by at most 0.5 before squaring.
    pub fn statistic(&self, yates: bool) -> f64 {
        let expected = self.expected();
        let mut stat = 0.0;
        for (obs_row, exp_row) in self.observed.iter().zip(expected.iter()) {
            for (&o, &e) in obs_row.iter().zip(exp_row.iter()) {
                if e <= 0.0 {
                    continue;
                }
                let o = if yates {
                    let diff = e - o;
                    o + diff.signum() * diff.abs().min(0.5)
                } else {
                    o
                };
                stat += (o - e) * (o - e) / e;
            }
        }
        stat
    }
}

/// Outcome of a chi-square independence test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChiSquareResult {
    pub column: String,
    pub target: String,
    pub statistic: f64,
    pub dof: usize,
    pub p_value: f64,
    /// Association strength in [0, 1], from the uncorrected statistic
    pub cramers_v: f64,
    /// Rows where both values are present
    pub observations: usize,
    /// Continuity correction applied (2x2 tables)
    pub yates_corrected: bool,
    pub contingency: ContingencyTable,
}

impl ChiSquareResult {
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Test independence of a categorical column and the target.
///
/// Rows where either value is missing are ignored. Values are compared as
/// strings, so an integer-coded target works as well as a labelled one.
pub fn chi_square_test(df: &DataFrame, categorical_column: &str, target: &str) -> Result<ChiSquareResult> {
    for name in [categorical_column, target] {
        if !has_column(df, name) {
            return Err(EdaError::missing_column(df, name));
        }
    }

    let rows = string_values(df.column(categorical_column)?)?;
    let cols = string_values(df.column(target)?)?;
    let table = ContingencyTable::from_values(&rows, &cols);

    if table.row_categories.len() < 2 {
        return Err(EdaError::DegenerateTest {
            column: categorical_column.to_string(),
            categories: table.row_categories.len(),
        });
    }
    if table.col_categories.len() < 2 {
        return Err(EdaError::DegenerateTest {
            column: target.to_string(),
            categories: table.col_categories.len(),
        });
    }

    let dof = table.degrees_of_freedom();
    let yates = dof == 1;
    let statistic = table.statistic(yates);

    let chi2 = ChiSquared::new(dof as f64).map_err(|e| EdaError::Statistics(e.to_string()))?;
    let p_value = chi2.sf(statistic).clamp(0.0, 1.0);

    let n = table.total();
    let min_dim = table.row_categories.len().min(table.col_categories.len()) - 1;
    let cramers_v = (table.statistic(false) / (n * min_dim as f64)).sqrt().clamp(0.0, 1.0);

    debug!(
        column = categorical_column,
        target,
        statistic,
        dof,
        p_value,
        "chi-square test"
    );

    Ok(ChiSquareResult {
        column: categorical_column.to_string(),
        target: target.to_string(),
        statistic,
        dof,
        p_value,
        cramers_v,
        observations: n as usize,
        yates_corrected: yates,
        contingency: table,
    })
}

/// Share of target events within one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRate {
    pub category: String,
    pub count: usize,
    pub events: usize,
    pub rate: f64,
}

/// Event rate of a binary target per category, in [`compare_categories`] order
pub fn target_rate_by_category(df: &DataFrame, column: &str, target: &str) -> Result<Vec<CategoryRate>> {
    if !has_column(df, column) {
        return Err(EdaError::missing_column(df, column));
    }

    let targets = binary_target_values(df, target)?;
    let categories = string_values(df.column(column)?)?;

    let mut counts: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for (category, t) in categories.into_iter().zip(targets) {
        if let (Some(category), Some(t)) = (category, t) {
            let entry = counts.entry(category).or_insert((0, 0));
            entry.0 += 1;
            if t == 1 {
                entry.1 += 1;
            }
        }
    }

    let mut rates: Vec<CategoryRate> = counts
        .into_iter()
        .map(|(category, (count, events))| CategoryRate {
            category,
            count,
            events,
            rate: events as f64 / count as f64,
        })
        .collect();
    rates.sort_by(|a, b| compare_categories(&a.category, &b.category));
    Ok(rates)
}

fn format_edge(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value);
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    };
    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}

/// Edge text with the fewest decimals (at least two) that keeps adjacent
/// edges distinct and no nonzero edge shown as zero
fn edge_labels(edges: &[f64]) -> Vec<String> {
    for decimals in 2..=15 {
        let labels: Vec<String> = edges.iter().map(|&e| format_edge(e, decimals)).collect();
        let distinct = labels.windows(2).all(|w| w[0] != w[1]);
        let nonzero_kept = edges.iter().zip(&labels).all(|(&e, l)| e == 0.0 || l != "0");
        if distinct && nonzero_kept {
            return labels;
        }
    }
    // Shortest round-trip form is unique per distinct value
    edges.iter().map(|e| format!("{}", e)).collect()
}

/// Quantile edges of the present values, duplicates removed
fn band_edges(values: &[f64], bands: usize) -> Vec<f64> {
    let sorted_values = sorted(values);
    let mut edges: Vec<f64> = (0..=bands)
        .filter_map(|i| quantile_linear(&sorted_values, i as f64 / bands as f64))
        .collect();
    edges.dedup_by(|a, b| (*a - *b).abs() < f64::EPSILON);
    edges
}

/// `labels` holds the text of each edge, as produced by [`edge_labels`]
fn band_label(value: f64, edges: &[f64], labels: &[String]) -> String {
    let last = edges.len() - 1;
    if last == 0 {
        return format!("[{}, {}]", labels[0], labels[0]);
    }
    let k = edges[..last]
        .iter()
        .rposition(|&e| e <= value)
        .unwrap_or(0);
    if k + 1 == last {
        format!("[{}, {}]", labels[k], labels[last])
    } else {
        format!("[{}, {})", labels[k], labels[k + 1])
    }
}

/// Bin a numeric column into quantile bands.
///
/// Returns a string column named `<column>_band` with labels such as
/// `[25, 34)`; the last band is closed. Missing values stay missing. Tied
/// quantiles collapse, so fewer than `bands` labels may appear.
pub fn band_numeric_column(df: &DataFrame, column: &str, bands: usize) -> Result<Column> {
    if bands == 0 {
        return Err(EdaError::InvalidConfig("band count must be at least 1".to_string()));
    }
    if !has_column(df, column) {
        return Err(EdaError::missing_column(df, column));
    }

    let col = df.column(column)?;
    if ColumnKind::of(col) != ColumnKind::Numeric {
        return Err(EdaError::NonNumeric {
            column: column.to_string(),
            dtype: col.dtype().to_string(),
        });
    }

    let present = present_floats(col)?;
    let edges = band_edges(&present, bands);
    let edge_text = edge_labels(&edges);

    let labels: Vec<Option<String>> = float_values(col)?
        .into_iter()
        .map(|v| match v {
            Some(x) if !edges.is_empty() => Some(band_label(x, &edges, &edge_text)),
            _ => None,
        })
        .collect();

    Ok(Column::new(format!("{}_band", column).into(), labels))
}
