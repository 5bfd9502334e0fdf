//! Terminal tables for summaries, cleaning, correlations and tests

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{
    CategoryRate, ChiSquareResult, CleaningReport, ColumnKind, DatasetSummary, SchemaReport, TargetCorrelation,
};

/// Significance level used to colour p-values
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

fn section_header(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|n| Cell::new(n).add_attribute(Attribute::Bold))
        .collect()
}

fn new_table(columns: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(columns));
    table
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{:.4}", v)).unwrap_or_else(|| "-".to_string())
}

/// Per-column summary table
pub fn dataset_summary_table(summary: &DatasetSummary) -> Table {
    let mut table = new_table(&[
        "Column", "Kind", "Missing", "Distinct", "Count", "Mean", "Std", "Min", "Q25", "Median", "Q75", "Max",
    ]);

    for col in &summary.columns {
        let missing_color = if col.missing == 0 { Color::White } else { Color::Yellow };
        let kind_color = match col.kind {
            ColumnKind::Numeric => Color::Cyan,
            ColumnKind::Categorical => Color::Magenta,
            ColumnKind::Other => Color::DarkGrey,
        };
        let stats = col.stats.as_ref();
        table.add_row(vec![
            Cell::new(&col.name),
            Cell::new(col.kind).fg(kind_color),
            Cell::new(format!("{} ({:.1}%)", col.missing, col.missing_ratio * 100.0)).fg(missing_color),
            Cell::new(col.distinct),
            Cell::new(stats.map(|s| s.count.to_string()).unwrap_or_else(|| "-".to_string())),
            Cell::new(fmt_opt(stats.map(|s| s.mean))),
            Cell::new(fmt_opt(stats.and_then(|s| s.std))),
            Cell::new(fmt_opt(stats.map(|s| s.min))),
            Cell::new(fmt_opt(stats.map(|s| s.q25))),
            Cell::new(fmt_opt(stats.map(|s| s.median))),
            Cell::new(fmt_opt(stats.map(|s| s.q75))),
            Cell::new(fmt_opt(stats.map(|s| s.max))),
        ]);
    }

    table
}

impl DatasetSummary {
    /// Print the summary as a table under a titled header
    pub fn display(&self, title: &str) {
        section_header("📋", title);
        println!(
            "      {} rows, {} columns, {} missing cells",
            style(self.rows).yellow().bold(),
            style(self.columns.len()).yellow().bold(),
            style(self.total_missing()).yellow().bold()
        );
        println!();
        print_indented(&dataset_summary_table(self));
    }
}

/// Cleaning metrics table
pub fn cleaning_report_table(report: &CleaningReport) -> Table {
    let mut table = new_table(&["Metric", "Value"]);

    let warn_if = |n: usize| if n == 0 { Color::White } else { Color::Yellow };

    table.add_row(vec![Cell::new("📁 Input rows"), Cell::new(report.input_rows)]);
    if let Some(labels) = &report.target_labels {
        table.add_row(vec![
            Cell::new("🏷️  Mapped labels (event / non-event / other)"),
            Cell::new(format!("{} / {} / {}", labels.events, labels.non_events, labels.ignored)),
        ]);
    }
    table.add_row(vec![
        Cell::new("🎯 Rows without target"),
        Cell::new(report.target_rows_dropped).fg(warn_if(report.target_rows_dropped)),
    ]);
    table.add_row(vec![
        Cell::new("🗑️  Dropped columns"),
        Cell::new(report.dropped_columns.len()).fg(warn_if(report.dropped_columns.len())),
    ]);
    table.add_row(vec![
        Cell::new("🩹 Imputed cells"),
        Cell::new(report.imputed_cells()).fg(warn_if(report.imputed_cells())),
    ]);
    table.add_row(vec![
        Cell::new("📏 Capped cells"),
        Cell::new(report.capped_cells()).fg(warn_if(report.capped_cells())),
    ]);
    table.add_row(vec![
        Cell::new("✂️  Outlier rows removed"),
        Cell::new(report.outlier_rows_removed).fg(warn_if(report.outlier_rows_removed)),
    ]);
    table.add_row(vec![
        Cell::new("🔤 Encoded columns"),
        Cell::new(report.encoded_columns.len()),
    ]);
    table.add_row(vec![
        Cell::new("✅ Output rows"),
        Cell::new(report.output_rows)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);

    table
}

impl CleaningReport {
    pub fn display(&self) {
        section_header("🧹", "CLEANING REPORT");
        print_indented(&cleaning_report_table(self));

        if !self.dropped_columns.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Dropped Columns").yellow(),
                style(format!("({})", self.dropped_columns.len())).dim()
            );
            for dropped in &self.dropped_columns {
                println!(
                    "        {} {} {}",
                    style("•").dim(),
                    dropped.column,
                    style(format!("({}, {:.1}% missing)", dropped.reason, dropped.missing_ratio * 100.0)).dim()
                );
            }
        }

        if !self.imputed.is_empty() {
            println!();
            println!("      {}:", style("Imputed").yellow());
            for imputed in &self.imputed {
                println!(
                    "        {} {} {}",
                    style("•").dim(),
                    imputed.column,
                    style(format!("({} cells <- {})", imputed.count, imputed.fill_value)).dim()
                );
            }
        }
    }
}

/// Target correlation table, strongest first
pub fn correlation_table(correlations: &[TargetCorrelation]) -> Table {
    let mut table = new_table(&["#", "Feature", "Pearson r", "N"]);

    for (i, corr) in correlations.iter().enumerate() {
        let strength = corr.correlation.abs();
        let color = if strength >= 0.5 {
            Color::Green
        } else if strength >= 0.2 {
            Color::Yellow
        } else {
            Color::White
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&corr.feature),
            Cell::new(format!("{:+.4}", corr.correlation)).fg(color),
            Cell::new(corr.observations),
        ]);
    }

    table
}

pub fn display_correlations(correlations: &[TargetCorrelation], target: &str) {
    section_header("🔗", &format!("CORRELATION WITH '{}'", target.to_uppercase()));
    if correlations.is_empty() {
        println!("      {}", style("No numeric feature has a defined correlation").dim());
        return;
    }
    print_indented(&correlation_table(correlations));
}

/// Chi-square test results table
pub fn chi_square_table(results: &[ChiSquareResult]) -> Table {
    let mut table = new_table(&["Column", "Chi²", "DoF", "p-value", "Cramér's V", "N"]);

    for result in results {
        let p_color = if result.is_significant(SIGNIFICANCE_LEVEL) {
            Color::Red
        } else {
            Color::Green
        };
        table.add_row(vec![
            Cell::new(&result.column),
            Cell::new(format!("{:.4}", result.statistic)),
            Cell::new(result.dof),
            Cell::new(format!("{:.4e}", result.p_value))
                .fg(p_color)
                .add_attribute(Attribute::Bold),
            Cell::new(format!("{:.4}", result.cramers_v)),
            Cell::new(result.observations),
        ]);
    }

    table
}

pub fn display_chi_square(results: &[ChiSquareResult], target: &str) {
    section_header("🧪", &format!("CHI-SQUARE TESTS AGAINST '{}'", target.to_uppercase()));
    if results.is_empty() {
        println!("      {}", style("No test could be run").dim());
        return;
    }
    print_indented(&chi_square_table(results));
    println!();
    println!(
        "      {}",
        style(format!("p < {} marks a dependence on the target", SIGNIFICANCE_LEVEL)).dim()
    );
}

/// Event rate per category table
pub fn category_rate_table(rates: &[CategoryRate]) -> Table {
    let mut table = new_table(&["Category", "Count", "Events", "Rate"]);
    for rate in rates {
        table.add_row(vec![
            Cell::new(&rate.category),
            Cell::new(rate.count),
            Cell::new(rate.events),
            Cell::new(format!("{:.2}%", rate.rate * 100.0)),
        ]);
    }
    table
}

pub fn display_target_rates(column: &str, rates: &[CategoryRate]) {
    println!();
    println!("      {}", style(format!("Target rate by {}", column)).cyan());
    print_indented(&category_rate_table(rates));
}

/// Print notices for missing or mistyped schema columns
pub fn display_schema_report(report: &SchemaReport) {
    for column in &report.missing_required {
        println!(
            "    {} {}",
            style("✗").red().bold(),
            style(format!("Required column '{}' is missing", column)).red()
        );
    }
    for column in &report.missing_optional {
        println!(
            "    {} {}",
            style("•").dim(),
            style(format!("Expected column '{}' not present", column)).dim()
        );
    }
    for mismatch in &report.kind_mismatches {
        println!(
            "    {} {}",
            style("!").yellow().bold(),
            style(format!(
                "Column '{}' expected {}, found {}",
                mismatch.column, mismatch.expected, mismatch.found
            ))
            .yellow()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_table_lists_features() {
        let correlations = vec![
            TargetCorrelation {
                feature: "int_rate".into(),
                correlation: 0.61,
                observations: 100,
            },
            TargetCorrelation {
                feature: "loan_amnt".into(),
                correlation: -0.12,
                observations: 98,
            },
        ];
        let rendered = correlation_table(&correlations).to_string();
        assert!(rendered.contains("int_rate"));
        assert!(rendered.contains("+0.6100"));
        assert!(rendered.contains("-0.1200"));
    }

    #[test]
    fn test_summary_table_shows_quartiles() {
        let df = polars::df! {
            "int_rate" => [6.0f64, 8.0, 10.0, 12.0, 14.0],
            "grade" => ["A", "B", "A", "C", "B"],
        }
        .unwrap();
        let summary = crate::pipeline::summarize(&df).unwrap();

        let rendered = dataset_summary_table(&summary).to_string();

        for heading in ["Count", "Q25", "Q75"] {
            assert!(rendered.contains(heading), "missing {}", heading);
        }
        assert!(rendered.contains("8.0000"));
        assert!(rendered.contains("12.0000"));
    }

    #[test]
    fn test_cleaning_table_shows_rows() {
        let report = CleaningReport {
            input_rows: 10,
            output_rows: 8,
            ..Default::default()
        };
        let rendered = cleaning_report_table(&report).to_string();
        assert!(rendered.contains("Output rows"));
        assert!(rendered.contains('8'));
        assert!(!rendered.contains("Mapped labels"));
    }

    #[test]
    fn test_cleaning_table_shows_mapped_labels() {
        let report = CleaningReport {
            input_rows: 10,
            output_rows: 8,
            target_labels: Some(crate::pipeline::TargetLabelCounts {
                events: 3,
                non_events: 5,
                ignored: 2,
            }),
            target_rows_dropped: 2,
            ..Default::default()
        };
        let rendered = cleaning_report_table(&report).to_string();
        assert!(rendered.contains("Mapped labels"));
        assert!(rendered.contains("3 / 5 / 2"));
    }
}
