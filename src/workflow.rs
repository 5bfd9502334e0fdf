//! End-to-end analysis run
//!
//! Sequences loading, schema checks, cleaning, summaries, association tests
//! and charts. A missing input file stops the run; an absent column or a
//! degenerate test skips only the step that needed it.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::pipeline::{
    band_numeric_column, chi_square_test, clean, correlation_analysis, correlation_matrix, display_dataset_stats,
    find_correlated_pairs, has_column, load_dataset_with_progress, save_dataset_with_progress, summarize, target_rate_by_category,
    CategoryRate, ChiSquareResult, CleaningConfig, CleaningReport, ColumnKind, CorrelatedPair, CorrelationMatrix,
    CreditSchema, DatasetSummary, SchemaReport, TargetCorrelation,
};
use crate::plot::Visualizer;
use crate::report::{
    display_chi_square, display_correlations, display_schema_report, display_target_rates, export_analysis_report,
};
use crate::utils::{
    create_progress_bar, finish_with_success, finish_with_warning, print_count, print_info, print_notice, print_step_header,
    print_step_time, print_success,
};

pub const DEFAULT_INPUT: &str = "data/raw/credit_data.csv";
pub const DEFAULT_OUTPUT: &str = "data/processed/credit_data_clean.csv";
pub const DEFAULT_FIGURES_DIR: &str = "reports/figures";
pub const DEFAULT_TARGET: &str = "default";

/// Everything a run needs to know
#[derive(Debug, Clone, Serialize)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// `None` disables chart rendering
    pub figures_dir: Option<PathBuf>,
    /// Optional JSON export of the full analysis
    pub report: Option<PathBuf>,
    /// Rows scanned for CSV type inference (0 = all)
    pub infer_schema_length: usize,
    pub cleaning: CleaningConfig,
    /// Columns whose distribution is plotted
    pub plot_columns: Vec<String>,
    /// Categorical columns tested against the target
    pub category_columns: Vec<String>,
    /// Sensitive attributes checked for dependence on the target; numeric
    /// ones are cut into quantile bands first
    pub sensitive_columns: Vec<String>,
    pub sensitive_bands: usize,
    /// |r| above which a feature pair is listed as highly correlated
    pub pair_threshold: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            figures_dir: Some(PathBuf::from(DEFAULT_FIGURES_DIR)),
            report: None,
            infer_schema_length: 10000,
            cleaning: CleaningConfig::for_target(DEFAULT_TARGET),
            plot_columns: vec!["loan_amnt".into(), "int_rate".into(), "age".into()],
            category_columns: vec!["grade".into()],
            sensitive_columns: vec!["age".into()],
            sensitive_bands: 4,
            pair_threshold: 0.8,
        }
    }
}

impl RunConfig {
    pub fn target(&self) -> &str {
        self.cleaning.target.as_deref().unwrap_or(DEFAULT_TARGET)
    }
}

/// What happened to one step of the run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Completed { step: String },
    Skipped { step: String, reason: String },
}

impl StepOutcome {
    pub fn step(&self) -> &str {
        match self {
            StepOutcome::Completed { step } | StepOutcome::Skipped { step, .. } => step,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, StepOutcome::Skipped { .. })
    }
}

/// Target rates of one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetRates {
    pub column: String,
    pub rates: Vec<CategoryRate>,
}

/// Results of a run
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    #[serde(skip)]
    pub cleaned: DataFrame,
    pub schema: SchemaReport,
    pub raw_summary: DatasetSummary,
    pub cleaning: CleaningReport,
    pub cleaned_summary: DatasetSummary,
    pub correlations: Vec<TargetCorrelation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_matrix: Option<CorrelationMatrix>,
    pub correlated_pairs: Vec<CorrelatedPair>,
    pub chi_square: Vec<ChiSquareResult>,
    pub target_rates: Vec<TargetRates>,
    pub figures: Vec<PathBuf>,
    pub steps: Vec<StepOutcome>,
}

impl RunOutcome {
    pub fn skipped(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|s| s.is_skipped())
    }

    /// Look up a step by name
    pub fn step(&self, name: &str) -> Option<&StepOutcome> {
        self.steps.iter().find(|s| s.step() == name)
    }
}

struct StepLog {
    steps: Vec<StepOutcome>,
}

impl StepLog {
    fn completed(&mut self, step: &str) {
        self.steps.push(StepOutcome::Completed { step: step.to_string() });
    }

    fn skipped(&mut self, step: &str, reason: String) {
        print_notice(&format!("Skipping {}: {}", step, reason));
        warn!(step, reason = %reason, "step skipped");
        self.steps.push(StepOutcome::Skipped {
            step: step.to_string(),
            reason,
        });
    }

    /// Record a library result: recoverable errors skip the step, others are fatal
    fn record<T>(&mut self, step: &str, result: crate::error::Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => {
                self.completed(step);
                Ok(Some(value))
            }
            Err(err) if err.is_recoverable() => {
                self.skipped(step, err.to_string());
                Ok(None)
            }
            Err(err) => Err(anyhow::Error::new(err).context(format!("Step '{}' failed", step))),
        }
    }

    /// Skip the step unless every named column is present
    fn require(&mut self, df: &DataFrame, step: &str, columns: &[&str]) -> bool {
        match columns.iter().find(|c| !has_column(df, c)) {
            Some(missing) => {
                self.skipped(step, format!("column '{}' not found", missing));
                false
            }
            None => true,
        }
    }
}

/// Two-column table of a banded numeric attribute and the target, or the
/// attribute itself when it is already categorical
fn sensitive_view(df: &DataFrame, column: &str, target: &str, bands: usize) -> crate::error::Result<(DataFrame, String)> {
    let col = df.column(column)?;
    if ColumnKind::of(col) != ColumnKind::Numeric {
        return Ok((df.select([column, target])?, column.to_string()));
    }
    let banded = band_numeric_column(df, column, bands)?;
    let name = banded.name().to_string();
    let view = DataFrame::new(vec![banded, df.column(target)?.clone()])?;
    Ok((view, name))
}

/// Run the full analysis, rendering charts through `visualizer`.
pub fn run_analysis(config: &RunConfig, visualizer: &dyn Visualizer) -> Result<RunOutcome> {
    let target = config.target().to_string();
    let mut log = StepLog { steps: Vec::new() };

    // Step 1: load
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let raw = load_dataset_with_progress(&config.input, config.infer_schema_length)
        .with_context(|| format!("Failed to load dataset from {}", config.input.display()))?;
    print_success("Dataset loaded");
    display_dataset_stats(&raw);
    print_step_time(step_start.elapsed());
    log.completed("load");

    let mut schema_def = CreditSchema::for_target(&target);
    for name in config.category_columns.iter() {
        schema_def = schema_def.with_column(crate::pipeline::ColumnSpec::optional(name, ColumnKind::Categorical));
    }
    let schema = schema_def.validate(&raw);
    display_schema_report(&schema);
    for column in &schema.missing_required {
        warn!(column = %column, "required column missing");
    }

    // Step 2: raw data quality
    print_step_header(2, "Data Quality Review");
    let raw_summary = summarize(&raw).context("Failed to summarize raw dataset")?;
    raw_summary.display("RAW DATASET");
    log.completed("raw_summary");

    // Step 3: clean and persist
    print_step_header(3, "Cleaning");
    let step_start = Instant::now();
    let cleaned_table = clean(&raw, &config.cleaning).context("Cleaning failed")?;
    let cleaned = cleaned_table.df;
    let cleaning = cleaned_table.report;
    cleaning.display();
    log.completed("clean");

    save_dataset_with_progress(&cleaned, &config.output)
        .with_context(|| format!("Failed to write cleaned dataset to {}", config.output.display()))?;
    log.completed("save");
    print_step_time(step_start.elapsed());

    let cleaned_summary = summarize(&cleaned).context("Failed to summarize cleaned dataset")?;
    cleaned_summary.display("CLEANED DATASET");

    let mut outcome = RunOutcome {
        cleaned: DataFrame::empty(),
        schema,
        raw_summary,
        cleaning,
        cleaned_summary,
        correlations: Vec::new(),
        correlation_matrix: None,
        correlated_pairs: Vec::new(),
        chi_square: Vec::new(),
        target_rates: Vec::new(),
        figures: Vec::new(),
        steps: Vec::new(),
    };

    if cleaned.height() == 0 {
        log.skipped("analysis", "no rows left after cleaning".to_string());
        outcome.cleaned = cleaned;
        outcome.steps = log.steps;
        return finish(config, outcome);
    }

    // Step 4: correlation
    print_step_header(4, "Correlation Analysis");
    if log.require(&cleaned, "correlation", &[target.as_str()]) {
        if let Some(correlations) = log.record("correlation", correlation_analysis(&cleaned, &target))? {
            display_correlations(&correlations, &target);
            outcome.correlations = correlations;
        }
    }

    if let Some(matrix) = log.record("correlation_matrix", correlation_matrix(&cleaned))? {
        outcome.correlated_pairs = find_correlated_pairs(&matrix, config.pair_threshold);
        print_count(
            "highly correlated feature pairs",
            outcome.correlated_pairs.len(),
            Some(&format!("(|r| > {:.2})", config.pair_threshold)),
        );
        for pair in &outcome.correlated_pairs {
            print_info(&format!("{} ~ {}: {:+.4}", pair.feature1, pair.feature2, pair.correlation));
        }
        outcome.correlation_matrix = Some(matrix);
    }

    // Step 5: association with the target
    print_step_header(5, "Association Tests");
    for column in &config.category_columns {
        let step = format!("chi_square:{}", column);
        if !log.require(&cleaned, &step, &[column.as_str(), target.as_str()]) {
            continue;
        }
        if let Some(result) = log.record(&step, chi_square_test(&cleaned, column, &target))? {
            outcome.chi_square.push(result);
        }

        let step = format!("target_rate:{}", column);
        if let Some(rates) = log.record(&step, target_rate_by_category(&cleaned, column, &target))? {
            display_target_rates(column, &rates);
            outcome.target_rates.push(TargetRates {
                column: column.clone(),
                rates,
            });
        }
    }

    let mut sensitive_views = Vec::new();
    for column in &config.sensitive_columns {
        let step = format!("chi_square:{}", column);
        if !log.require(&cleaned, &step, &[column.as_str(), target.as_str()]) {
            continue;
        }
        let Some((view, tested)) = log.record(
            &format!("band:{}", column),
            sensitive_view(&cleaned, column, &target, config.sensitive_bands),
        )?
        else {
            continue;
        };
        if let Some(result) = log.record(&step, chi_square_test(&view, &tested, &target))? {
            outcome.chi_square.push(result);
        }
        if let Some(rates) = log.record(
            &format!("target_rate:{}", column),
            target_rate_by_category(&view, &tested, &target),
        )? {
            display_target_rates(&tested, &rates);
            outcome.target_rates.push(TargetRates {
                column: tested.clone(),
                rates,
            });
        }
        sensitive_views.push((view, tested));
    }
    display_chi_square(&outcome.chi_square, &target);

    // Step 6: charts
    if let Some(figures_dir) = &config.figures_dir {
        print_step_header(6, "Charts");
        let planned = config.plot_columns.len() + 1 + config.category_columns.len() + sensitive_views.len();
        let pb = create_progress_bar(planned as u64, "Rendering charts");

        for column in &config.plot_columns {
            let step = format!("plot_distribution:{}", column);
            if log.require(&cleaned, &step, &[column.as_str()]) {
                if let Some(path) = log.record(&step, visualizer.plot_distribution(&cleaned, column, figures_dir))? {
                    outcome.figures.push(path);
                }
            }
            pb.inc(1);
        }

        let heatmap_ready = outcome.correlation_matrix.as_ref().is_some_and(|m| m.len() >= 2);
        if heatmap_ready {
            if let Some(path) = log.record(
                "correlation_heatmap",
                visualizer.plot_correlation_heatmap(&cleaned, figures_dir),
            )? {
                outcome.figures.push(path);
            }
        } else {
            log.skipped("correlation_heatmap", "fewer than two numeric columns".to_string());
        }
        pb.inc(1);

        for column in &config.category_columns {
            let step = format!("plot_target_rate:{}", column);
            if log.require(&cleaned, &step, &[column.as_str(), target.as_str()]) {
                if let Some(path) = log.record(
                    &step,
                    visualizer.plot_target_rate(&cleaned, column, &target, figures_dir),
                )? {
                    outcome.figures.push(path);
                }
            }
            pb.inc(1);
        }

        for (view, tested) in &sensitive_views {
            let step = format!("plot_target_rate:{}", tested);
            if let Some(path) = log.record(&step, visualizer.plot_target_rate(view, tested, &target, figures_dir))? {
                outcome.figures.push(path);
            }
            pb.inc(1);
        }

        let message = format!("{} charts written to {}", outcome.figures.len(), figures_dir.display());
        if outcome.figures.len() < planned {
            finish_with_warning(&pb, &message);
        } else {
            finish_with_success(&pb, &message);
        }
    }

    outcome.cleaned = cleaned;
    outcome.steps = log.steps;
    finish(config, outcome)
}

fn finish(config: &RunConfig, outcome: RunOutcome) -> Result<RunOutcome> {
    if let Some(path) = &config.report {
        export_analysis_report(&outcome, config, path)?;
        print_success(&format!("Analysis report written to {}", path.display()));
    }

    let skipped = outcome.skipped().count();
    info!(
        steps = outcome.steps.len(),
        skipped,
        figures = outcome.figures.len(),
        "analysis finished"
    );
    Ok(outcome)
}
