//! JSON export of a complete analysis run

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::workflow::{RunConfig, RunOutcome};

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct ReportMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    pub version: String,
    pub input_file: String,
    pub output_file: String,
    pub target_column: String,
    pub numeric_imputation: String,
    pub outlier_strategy: String,
    pub iqr_multiplier: f64,
    pub encoding: String,
}

impl ReportMetadata {
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: config.input.display().to_string(),
            output_file: config.output.display().to_string(),
            target_column: config.target().to_string(),
            numeric_imputation: config.cleaning.numeric_imputation.to_string(),
            outlier_strategy: config.cleaning.outlier_strategy.to_string(),
            iqr_multiplier: config.cleaning.iqr_multiplier,
            encoding: config.cleaning.encoding.to_string(),
        }
    }
}

/// Complete analysis export with metadata
#[derive(Serialize)]
pub struct AnalysisReport<'a> {
    pub metadata: ReportMetadata,
    #[serde(flatten)]
    pub outcome: &'a RunOutcome,
}

/// Write the run's results as pretty-printed JSON, creating parent directories
pub fn export_analysis_report(outcome: &RunOutcome, config: &RunConfig, output_path: &Path) -> Result<()> {
    let report = AnalysisReport {
        metadata: ReportMetadata::from_config(config),
        outcome,
    };

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize analysis report to JSON")?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write analysis report to {}", output_path.display()))?;

    Ok(())
}
