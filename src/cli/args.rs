//! Command-line argument definitions using clap

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use crate::pipeline::{
    CleaningConfig, EncodingStrategy, NumericImputation, OutlierStrategy, TargetMapping, DEFAULT_IQR_MULTIPLIER,
};
use crate::workflow::{RunConfig, DEFAULT_FIGURES_DIR, DEFAULT_INPUT, DEFAULT_OUTPUT, DEFAULT_TARGET};

/// credit-eda - Clean a credit dataset and explore candidate default predictors
#[derive(Parser, Debug)]
#[command(name = "credit-eda")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Cleaned dataset output path (CSV or Parquet, determined by extension)
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Directory for the PNG charts
    #[arg(long, default_value = DEFAULT_FIGURES_DIR)]
    pub figures_dir: PathBuf,

    /// Write the full analysis as JSON to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Binary target column (e.g. loan default indicator)
    #[arg(short, long, default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Value in target column that represents EVENT (maps to 1).
    /// Required with --non-event-value when target is not binary 0/1.
    #[arg(long)]
    pub event_value: Option<String>,

    /// Value in target column that represents NON-EVENT (maps to 0).
    /// Required with --event-value when target is not binary 0/1.
    #[arg(long)]
    pub non_event_value: Option<String>,

    /// Columns whose distribution is plotted (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "loan_amnt,int_rate,age")]
    pub plot_columns: Vec<String>,

    /// Categorical columns tested against the target (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "grade")]
    pub category_columns: Vec<String>,

    /// Sensitive attributes checked for dependence on the target (comma-separated).
    /// Numeric attributes are cut into quantile bands first.
    #[arg(long, value_delimiter = ',', default_value = "age")]
    pub sensitive_columns: Vec<String>,

    /// Number of quantile bands for numeric sensitive attributes
    #[arg(long, default_value = "4", value_parser = clap::value_parser!(u16).range(1..))]
    pub sensitive_bands: u16,

    /// Outlier treatment: "cap" (winsorize to Tukey fences), "remove" or "none"
    #[arg(long, default_value = "cap")]
    pub outlier_strategy: OutlierStrategy,

    /// Fill value for missing numeric cells: "median" or "mean"
    #[arg(long, default_value = "median")]
    pub numeric_imputation: NumericImputation,

    /// Categorical encoding: "ordinal", "onehot" or "none"
    #[arg(long, default_value = "ordinal")]
    pub encoding: EncodingStrategy,

    /// Tukey fence multiplier k in Q1 - k*IQR, Q3 + k*IQR
    #[arg(long, default_value_t = DEFAULT_IQR_MULTIPLIER, value_parser = validate_iqr_multiplier)]
    pub iqr_multiplier: f64,

    /// Drop columns whose missing ratio exceeds this value (1.0 drops only fully missing columns)
    #[arg(long, default_value = "1.0", value_parser = validate_ratio)]
    pub missing_threshold: f64,

    /// List feature pairs whose absolute correlation exceeds this value
    #[arg(long, default_value = "0.8", value_parser = validate_ratio)]
    pub pair_threshold: f64,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Skip chart rendering
    #[arg(long, default_value = "false")]
    pub no_plots: bool,
}

impl Cli {
    /// Target label mapping, when both labels are given
    pub fn target_mapping(&self) -> Result<Option<TargetMapping>> {
        match (&self.event_value, &self.non_event_value) {
            (Some(event), Some(non_event)) => {
                if event == non_event {
                    bail!("--event-value and --non-event-value must differ");
                }
                Ok(Some(TargetMapping::new(event.clone(), non_event.clone())))
            }
            (None, None) => Ok(None),
            _ => bail!("--event-value and --non-event-value must be given together"),
        }
    }

    /// Build the run configuration from the parsed arguments
    pub fn run_config(&self) -> Result<RunConfig> {
        let mut cleaning = CleaningConfig::for_target(&self.target)
            .with_outlier_strategy(self.outlier_strategy)
            .with_numeric_imputation(self.numeric_imputation)
            .with_encoding(self.encoding);
        cleaning.iqr_multiplier = self.iqr_multiplier;
        cleaning.missing_threshold = self.missing_threshold;
        if let Some(mapping) = self.target_mapping()? {
            cleaning = cleaning.with_target_mapping(mapping);
        }

        Ok(RunConfig {
            input: self.input.clone(),
            output: self.output.clone(),
            figures_dir: if self.no_plots {
                None
            } else {
                Some(self.figures_dir.clone())
            },
            report: self.report.clone(),
            infer_schema_length: self.infer_schema_length,
            cleaning,
            plot_columns: non_empty(&self.plot_columns),
            category_columns: non_empty(&self.category_columns),
            sensitive_columns: non_empty(&self.sensitive_columns),
            sensitive_bands: self.sensitive_bands as usize,
            pair_threshold: self.pair_threshold,
        })
    }
}

fn non_empty(columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(|c| c.to_string())
        .collect()
}

/// Validator for iqr_multiplier parameter
fn validate_iqr_multiplier(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !value.is_finite() || value <= 0.0 {
        Err(format!("iqr_multiplier must be a positive number, got {}", value))
    } else {
        Ok(value)
    }
}

/// Validator for ratio parameters in [0, 1]
fn validate_ratio(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=1.0).contains(&value) {
        Err(format!("value must be between 0.0 and 1.0, got {}", value))
    } else {
        Ok(value)
    }
}
