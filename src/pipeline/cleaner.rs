//! Data cleaning: target preparation, missing-value handling, outlier
//! treatment and categorical encoding
//!
//! The policy is fixed and reproducible:
//!
//! 1. Rows with a missing target are dropped (labels are never imputed). A
//!    string target is mapped to 0/1 when a `TargetMapping` is configured.
//! 2. Entirely missing columns are dropped with a warning.
//! 3. Numeric gaps are filled with the median, categorical gaps with the mode.
//! 4. Numeric features are cast to Float64, then outliers outside the Tukey
//!    fences are capped (or their rows removed).
//! 5. Categorical features are ordinal-encoded into `<column>_code`.
//!
//! Cleaning an already clean table changes nothing: quartiles for the fences
//! are order statistics, which capping leaves in place, and row removal
//! repeats until no row is flagged.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use polars::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::missing::{analyze_missing_values, get_features_above_threshold, get_fully_missing_columns};
use super::schema::{has_column, ColumnKind};
use super::target::{analyze_target_column, count_mapped_records, create_target_mask, TargetAnalysis, TargetMapping};
use super::values::{float_values, missing_count, quantile_nearest, sorted, string_values};
use crate::error::{EdaError, Result};

/// Default Tukey fence multiplier
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// How missing numeric values are filled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericImputation {
    #[default]
    Median,
    Mean,
}

impl std::fmt::Display for NumericImputation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumericImputation::Median => write!(f, "median"),
            NumericImputation::Mean => write!(f, "mean"),
        }
    }
}

impl std::str::FromStr for NumericImputation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "median" => Ok(NumericImputation::Median),
            "mean" => Ok(NumericImputation::Mean),
            _ => Err(format!("Unknown numeric imputation: '{}'. Use 'median' or 'mean'.", s)),
        }
    }
}

/// How missing categorical values are filled
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum CategoricalImputation {
    /// Most frequent category; ties go to the lexicographically smallest
    #[default]
    Mode,
    /// A fixed placeholder category
    Placeholder(String),
}

/// What happens to values outside the Tukey fences
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlierStrategy {
    /// Winsorize to the nearest fence
    #[default]
    Cap,
    /// Delete rows with any value outside its fences
    Remove,
    /// Leave outliers untouched
    None,
}

impl std::fmt::Display for OutlierStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutlierStrategy::Cap => write!(f, "cap"),
            OutlierStrategy::Remove => write!(f, "remove"),
            OutlierStrategy::None => write!(f, "none"),
        }
    }
}

impl std::str::FromStr for OutlierStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cap" => Ok(OutlierStrategy::Cap),
            "remove" => Ok(OutlierStrategy::Remove),
            "none" => Ok(OutlierStrategy::None),
            _ => Err(format!(
                "Unknown outlier strategy: '{}'. Use 'cap', 'remove' or 'none'.",
                s
            )),
        }
    }
}

/// How categorical features are encoded for numeric analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingStrategy {
    /// `<column>_code` holding the index of the category in sorted order
    #[default]
    Ordinal,
    /// One `<column>_<category>` 0/1 indicator per category
    OneHot,
    None,
}

impl std::fmt::Display for EncodingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodingStrategy::Ordinal => write!(f, "ordinal"),
            EncodingStrategy::OneHot => write!(f, "onehot"),
            EncodingStrategy::None => write!(f, "none"),
        }
    }
}

impl std::str::FromStr for EncodingStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "ordinal" => Ok(EncodingStrategy::Ordinal),
            "onehot" => Ok(EncodingStrategy::OneHot),
            "none" => Ok(EncodingStrategy::None),
            _ => Err(format!(
                "Unknown encoding: '{}'. Use 'ordinal', 'onehot' or 'none'.",
                s
            )),
        }
    }
}

/// Cleaning policy
#[derive(Debug, Clone, Serialize)]
pub struct CleaningConfig {
    /// Target column: protected from imputation, outlier treatment and encoding
    pub target: Option<String>,
    /// Label mapping for a non-binary target
    pub target_mapping: Option<TargetMapping>,
    pub numeric_imputation: NumericImputation,
    pub categorical_imputation: CategoricalImputation,
    pub outlier_strategy: OutlierStrategy,
    /// Tukey fence multiplier `k` in `Q1 - k*IQR`, `Q3 + k*IQR`
    pub iqr_multiplier: f64,
    pub encoding: EncodingStrategy,
    /// Categorical columns to encode; `None` encodes every categorical feature
    pub encode_columns: Option<Vec<String>>,
    /// Drop columns whose missing ratio exceeds this (1.0 keeps all but fully missing)
    pub missing_threshold: f64,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            target: None,
            target_mapping: None,
            numeric_imputation: NumericImputation::default(),
            categorical_imputation: CategoricalImputation::default(),
            outlier_strategy: OutlierStrategy::default(),
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            encoding: EncodingStrategy::default(),
            encode_columns: None,
            missing_threshold: 1.0,
        }
    }
}

impl CleaningConfig {
    /// Default policy protecting the given target column
    pub fn for_target(target: &str) -> Self {
        Self {
            target: Some(target.to_string()),
            ..Default::default()
        }
    }

    pub fn with_target_mapping(mut self, mapping: TargetMapping) -> Self {
        self.target_mapping = Some(mapping);
        self
    }

    pub fn with_outlier_strategy(mut self, strategy: OutlierStrategy) -> Self {
        self.outlier_strategy = strategy;
        self
    }

    pub fn with_encoding(mut self, encoding: EncodingStrategy) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_numeric_imputation(mut self, imputation: NumericImputation) -> Self {
        self.numeric_imputation = imputation;
        self
    }

    pub fn with_categorical_imputation(mut self, imputation: CategoricalImputation) -> Self {
        self.categorical_imputation = imputation;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier <= 0.0 {
            return Err(EdaError::InvalidConfig(format!(
                "iqr_multiplier must be a positive number, got {}",
                self.iqr_multiplier
            )));
        }
        if !(0.0..=1.0).contains(&self.missing_threshold) {
            return Err(EdaError::InvalidConfig(format!(
                "missing_threshold must be between 0.0 and 1.0, got {}",
                self.missing_threshold
            )));
        }
        Ok(())
    }

    fn is_target(&self, name: &str) -> bool {
        self.target.as_deref() == Some(name)
    }
}

/// Why a column was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    AllMissing,
    AboveMissingThreshold,
    UnsupportedType,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::AllMissing => write!(f, "all missing"),
            DropReason::AboveMissingThreshold => write!(f, "above missing threshold"),
            DropReason::UnsupportedType => write!(f, "unsupported type"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedColumn {
    pub column: String,
    pub reason: DropReason,
    pub missing_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImputedColumn {
    pub column: String,
    pub count: usize,
    pub fill_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CappedColumn {
    pub column: String,
    pub lower_fence: f64,
    pub upper_fence: f64,
    pub count: usize,
}

/// Rows per outcome after mapping a labelled target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetLabelCounts {
    pub events: usize,
    pub non_events: usize,
    /// Rows whose label matched neither value (dropped)
    pub ignored: usize,
}

/// What the cleaner did
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleaningReport {
    pub input_rows: usize,
    pub output_rows: usize,
    /// Set when string labels were mapped to 0/1
    pub target_labels: Option<TargetLabelCounts>,
    pub target_rows_dropped: usize,
    pub dropped_columns: Vec<DroppedColumn>,
    pub imputed: Vec<ImputedColumn>,
    pub capped: Vec<CappedColumn>,
    pub outlier_rows_removed: usize,
    pub encoded_columns: Vec<String>,
}

impl CleaningReport {
    fn new(input_rows: usize) -> Self {
        Self {
            input_rows,
            output_rows: input_rows,
            ..Default::default()
        }
    }

    /// True when no row, column or cell was changed (encoding aside)
    pub fn is_noop(&self) -> bool {
        self.target_rows_dropped == 0
            && self.dropped_columns.is_empty()
            && self.imputed.is_empty()
            && self.capped.is_empty()
            && self.outlier_rows_removed == 0
    }

    pub fn imputed_cells(&self) -> usize {
        self.imputed.iter().map(|c| c.count).sum()
    }

    pub fn capped_cells(&self) -> usize {
        self.capped.iter().map(|c| c.count).sum()
    }
}

/// A cleaned table with its report
#[derive(Debug, Clone)]
pub struct CleanedTable {
    pub df: DataFrame,
    pub report: CleaningReport,
}

/// Clean a table according to the policy. The input is never modified.
pub fn clean(df: &DataFrame, config: &CleaningConfig) -> Result<CleanedTable> {
    config.validate()?;

    let mut report = CleaningReport::new(df.height());
    let mut out = df.clone();

    if out.height() == 0 {
        return Ok(CleanedTable { df: out, report });
    }

    if let Some(target) = config.target.as_deref() {
        if has_column(&out, target) {
            out = prepare_target(out, target, config.target_mapping.as_ref(), &mut report)?;
        } else {
            debug!(target, "target column absent, cleaning without it");
        }
    }

    if out.height() > 0 {
        out = drop_unusable_columns(out, config, &mut report)?;
        impute_missing(&mut out, config, &mut report)?;
        cast_numeric_features(&mut out, config)?;
        out = treat_outliers(out, config, &mut report)?;
        encode_categoricals(&mut out, config, &mut report)?;
    }

    report.output_rows = out.height();
    info!(
        input_rows = report.input_rows,
        output_rows = report.output_rows,
        imputed = report.imputed_cells(),
        capped = report.capped_cells(),
        "cleaning complete"
    );

    Ok(CleanedTable { df: out, report })
}

fn filter_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    Ok(df.filter(&mask)?)
}

/// Drop rows without a label and map string labels to 0/1
fn prepare_target(
    mut df: DataFrame,
    target: &str,
    mapping: Option<&TargetMapping>,
    report: &mut CleaningReport,
) -> Result<DataFrame> {
    let all_missing = {
        let target_col = df.column(target)?;
        missing_count(target_col)? == target_col.len()
    };
    if all_missing {
        warn!(column = target, "target column is entirely missing, dropping it");
        report.dropped_columns.push(DroppedColumn {
            column: target.to_string(),
            reason: DropReason::AllMissing,
            missing_ratio: 1.0,
        });
        return Ok(df.drop(target)?);
    }

    let keep: Vec<bool> = match (analyze_target_column(&df, target)?, mapping) {
        (TargetAnalysis::NeedsMapping { .. }, Some(mapping)) => {
            let (events, non_events, ignored) = count_mapped_records(&df, target, mapping)?;
            info!(
                column = target,
                event_value = %mapping.event_value,
                non_event_value = %mapping.non_event_value,
                events,
                non_events,
                ignored,
                "mapped target labels"
            );
            report.target_labels = Some(TargetLabelCounts {
                events,
                non_events,
                ignored,
            });
            let mask = create_target_mask(&df, target, mapping)?;
            let keep = mask.iter().map(Option::is_some).collect();
            df.with_column(Column::new(target.into(), mask))?;
            keep
        }
        _ => {
            let target_col = df.column(target)?;
            if target_col.dtype().is_primitive_numeric() {
                float_values(target_col)?.iter().map(Option::is_some).collect()
            } else {
                string_values(target_col)?.iter().map(Option::is_some).collect()
            }
        }
    };

    let dropped = keep.iter().filter(|k| !**k).count();
    if dropped == 0 {
        return Ok(df);
    }

    warn!(column = target, rows = dropped, "dropping rows without a usable target value");
    report.target_rows_dropped = dropped;
    filter_rows(&df, &keep)
}

/// Drop entirely missing columns, columns above the missing threshold, and
/// columns of unsupported types that still hold missing values
fn drop_unusable_columns(
    df: DataFrame,
    config: &CleaningConfig,
    report: &mut CleaningReport,
) -> Result<DataFrame> {
    let ratios = analyze_missing_values(&df)?;
    let target = config.target.as_deref().unwrap_or("");

    let fully_missing: HashSet<String> = get_fully_missing_columns(&ratios).into_iter().collect();
    let above: HashSet<String> = get_features_above_threshold(&ratios, config.missing_threshold, target)
        .into_iter()
        .collect();

    let mut to_drop = Vec::new();
    for col in df.get_columns() {
        let name = col.name().to_string();
        let ratio = ratios
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, r)| *r)
            .unwrap_or(0.0);

        let reason = if fully_missing.contains(&name) {
            Some(DropReason::AllMissing)
        } else if above.contains(&name) {
            Some(DropReason::AboveMissingThreshold)
        } else if ColumnKind::of(col) == ColumnKind::Other && ratio > 0.0 {
            Some(DropReason::UnsupportedType)
        } else {
            None
        };

        if let Some(reason) = reason {
            warn!(column = %name, ?reason, missing_ratio = ratio, "dropping column");
            report.dropped_columns.push(DroppedColumn {
                column: name.clone(),
                reason,
                missing_ratio: ratio,
            });
            to_drop.push(name);
        }
    }

    if to_drop.is_empty() {
        return Ok(df);
    }
    Ok(df.drop_many(to_drop.iter().map(|s| s.as_str())))
}

/// Most frequent category; ties go to the lexicographically smallest
fn mode(values: &[Option<String>]) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for v in values.iter().flatten() {
        *counts.entry(v.as_str()).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (category, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((category, count));
        }
    }
    best.map(|(category, _)| category.to_string())
}

fn numeric_fill(present: &[f64], policy: NumericImputation) -> Option<f64> {
    match policy {
        NumericImputation::Median => super::values::median(present),
        NumericImputation::Mean => super::values::mean(present),
    }
}

fn impute_missing(
    df: &mut DataFrame,
    config: &CleaningConfig,
    report: &mut CleaningReport,
) -> Result<()> {
    let columns: Vec<Column> = df.get_columns().to_vec();

    for col in columns {
        let name = col.name().clone();
        if config.is_target(name.as_str()) {
            continue;
        }

        let missing = missing_count(&col)?;
        if missing == 0 {
            continue;
        }

        match ColumnKind::of(&col) {
            ColumnKind::Numeric => {
                let values = float_values(&col)?;
                let present: Vec<f64> = values.iter().flatten().copied().collect();
                let Some(fill) = numeric_fill(&present, config.numeric_imputation) else {
                    continue;
                };
                let filled: Vec<f64> = values.into_iter().map(|v| v.unwrap_or(fill)).collect();
                df.with_column(Column::new(name.clone(), filled))?;
                debug!(column = %name, missing, fill, "imputed numeric column");
                report.imputed.push(ImputedColumn {
                    column: name.to_string(),
                    count: missing,
                    fill_value: format!("{}", fill),
                });
            }
            ColumnKind::Categorical => {
                let values = string_values(&col)?;
                let fill = match &config.categorical_imputation {
                    CategoricalImputation::Mode => match mode(&values) {
                        Some(m) => m,
                        None => continue,
                    },
                    CategoricalImputation::Placeholder(label) => label.clone(),
                };
                let filled: Vec<String> = values
                    .into_iter()
                    .map(|v| v.unwrap_or_else(|| fill.clone()))
                    .collect();
                df.with_column(Column::new(name.clone(), filled))?;
                debug!(column = %name, missing, fill = %fill, "imputed categorical column");
                report.imputed.push(ImputedColumn {
                    column: name.to_string(),
                    count: missing,
                    fill_value: fill,
                });
            }
            ColumnKind::Other => {}
        }
    }

    Ok(())
}

/// Tukey fences from order-statistic quartiles; `None` when the IQR is zero
pub fn tukey_fences(values: &[f64], multiplier: f64) -> Option<(f64, f64)> {
    let sorted_values = sorted(values);
    let q1 = quantile_nearest(&sorted_values, 0.25)?;
    let q3 = quantile_nearest(&sorted_values, 0.75)?;
    let iqr = q3 - q1;
    if iqr <= 0.0 {
        return None;
    }
    Some((q1 - multiplier * iqr, q3 + multiplier * iqr))
}

/// Names the encoder produces for the table's categorical features
fn encoder_outputs(df: &DataFrame, config: &CleaningConfig) -> Result<HashSet<String>> {
    let mut outputs = HashSet::new();
    for (name, categories) in encodable_columns(df, config)? {
        match config.encoding {
            EncodingStrategy::Ordinal => {
                outputs.insert(format!("{}_code", name));
            }
            EncodingStrategy::OneHot => {
                for category in categories {
                    outputs.insert(format!("{}_{}", name, category));
                }
            }
            EncodingStrategy::None => {}
        }
    }
    Ok(outputs)
}

/// Numeric columns subject to outlier treatment
fn outlier_columns(df: &DataFrame, config: &CleaningConfig) -> Result<Vec<String>> {
    let encoded = encoder_outputs(df, config)?;
    Ok(df
        .get_columns()
        .iter()
        .filter(|col| ColumnKind::of(col) == ColumnKind::Numeric)
        .map(|col| col.name().to_string())
        .filter(|name| !config.is_target(name) && !encoded.contains(name))
        .collect())
}

/// Numeric features leave the cleaner as Float64; the target and encoder
/// outputs keep their integer type
fn cast_numeric_features(df: &mut DataFrame, config: &CleaningConfig) -> Result<()> {
    for name in outlier_columns(df, config)? {
        let col = df.column(&name)?;
        if col.dtype() == &DataType::Float64 {
            continue;
        }
        debug!(column = %name, dtype = %col.dtype(), "casting feature to Float64");
        let cast = col.cast(&DataType::Float64)?;
        df.with_column(cast)?;
    }
    Ok(())
}

fn treat_outliers(
    df: DataFrame,
    config: &CleaningConfig,
    report: &mut CleaningReport,
) -> Result<DataFrame> {
    let columns = outlier_columns(&df, config)?;
    match config.outlier_strategy {
        OutlierStrategy::None => Ok(df),
        OutlierStrategy::Cap => cap_outliers(df, &columns, config.iqr_multiplier, report),
        OutlierStrategy::Remove => remove_outliers(df, &columns, config.iqr_multiplier, report),
    }
}

fn cap_outliers(
    mut df: DataFrame,
    columns: &[String],
    multiplier: f64,
    report: &mut CleaningReport,
) -> Result<DataFrame> {
    for name in columns {
        let values: Vec<f64> = float_values(df.column(name)?)?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();

        let Some((lower, upper)) = tukey_fences(&present, multiplier) else {
            debug!(column = %name, "zero IQR, skipping outlier treatment");
            continue;
        };

        let count = present.iter().filter(|v| **v < lower || **v > upper).count();
        if count == 0 {
            continue;
        }

        let capped: Vec<f64> = values.iter().map(|v| v.clamp(lower, upper)).collect();
        df.with_column(Column::new(name.as_str().into(), capped))?;
        debug!(column = %name, count, lower, upper, "capped outliers");
        report.capped.push(CappedColumn {
            column: name.clone(),
            lower_fence: lower,
            upper_fence: upper,
            count,
        });
    }
    Ok(df)
}

fn remove_outliers(
    mut df: DataFrame,
    columns: &[String],
    multiplier: f64,
    report: &mut CleaningReport,
) -> Result<DataFrame> {
    loop {
        if df.height() == 0 {
            return Ok(df);
        }

        let mut keep = vec![true; df.height()];
        for name in columns {
            let values = float_values(df.column(name)?)?;
            let present: Vec<f64> = values.iter().flatten().copied().collect();
            let Some((lower, upper)) = tukey_fences(&present, multiplier) else {
                continue;
            };
            for (flag, value) in keep.iter_mut().zip(values.iter()) {
                if let Some(v) = value {
                    if *v < lower || *v > upper {
                        *flag = false;
                    }
                }
            }
        }

        let removed = keep.iter().filter(|k| !**k).count();
        if removed == 0 {
            return Ok(df);
        }

        debug!(rows = removed, "removing outlier rows");
        report.outlier_rows_removed += removed;
        df = filter_rows(&df, &keep)?;
    }
}

/// Categorical feature columns to encode, with their sorted categories
fn encodable_columns(df: &DataFrame, config: &CleaningConfig) -> Result<Vec<(String, Vec<String>)>> {
    if config.encoding == EncodingStrategy::None {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for col in df.get_columns() {
        let name = col.name().to_string();
        if config.is_target(&name) || ColumnKind::of(col) != ColumnKind::Categorical {
            continue;
        }
        if let Some(selected) = &config.encode_columns {
            if !selected.contains(&name) {
                continue;
            }
        }
        let categories: BTreeSet<String> = string_values(col)?.into_iter().flatten().collect();
        out.push((name, categories.into_iter().collect()));
    }
    Ok(out)
}

fn encode_categoricals(
    df: &mut DataFrame,
    config: &CleaningConfig,
    report: &mut CleaningReport,
) -> Result<()> {
    for (name, categories) in encodable_columns(df, config)? {
        let values = string_values(df.column(&name)?)?;

        match config.encoding {
            EncodingStrategy::Ordinal => {
                let codes: Vec<Option<i32>> = values
                    .iter()
                    .map(|v| {
                        v.as_ref()
                            .and_then(|s| categories.iter().position(|c| c == s))
                            .map(|i| i as i32)
                    })
                    .collect();
                let code_name = format!("{}_code", name);
                df.with_column(Column::new(code_name.as_str().into(), codes))?;
                report.encoded_columns.push(code_name);
            }
            EncodingStrategy::OneHot => {
                for category in &categories {
                    let indicator: Vec<i32> = values
                        .iter()
                        .map(|v| i32::from(v.as_deref() == Some(category.as_str())))
                        .collect();
                    let dummy_name = format!("{}_{}", name, category);
                    df.with_column(Column::new(dummy_name.as_str().into(), indicator))?;
                    report.encoded_columns.push(dummy_name);
                }
            }
            EncodingStrategy::None => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_tie_breaks_lexicographically() {
        let values = vec![
            Some("B".to_string()),
            Some("A".to_string()),
            None,
            Some("B".to_string()),
            Some("A".to_string()),
        ];
        assert_eq!(mode(&values), Some("A".to_string()));
    }

    #[test]
    fn test_mode_of_empty_is_none() {
        assert_eq!(mode(&[None, None]), None);
    }

    #[test]
    fn test_tukey_fences() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let (lower, upper) = tukey_fences(&values, 1.5).unwrap();
        // q1 = 3, q3 = 7
        assert_eq!(lower, 3.0 - 6.0);
        assert_eq!(upper, 7.0 + 6.0);
    }

    #[test]
    fn test_tukey_fences_zero_iqr() {
        assert!(tukey_fences(&[0.0, 0.0, 0.0, 0.0, 1.0], 1.5).is_none());
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("CAP".parse::<OutlierStrategy>().unwrap(), OutlierStrategy::Cap);
        assert_eq!("one-hot".parse::<EncodingStrategy>().unwrap(), EncodingStrategy::OneHot);
        assert_eq!("mean".parse::<NumericImputation>().unwrap(), NumericImputation::Mean);
        assert!("zscore".parse::<OutlierStrategy>().is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CleaningConfig {
            iqr_multiplier: 0.0,
            ..Default::default()
        };
        let df = df! { "a" => [1.0f64] }.unwrap();
        assert!(matches!(clean(&df, &config), Err(EdaError::InvalidConfig(_))));
    }
}
