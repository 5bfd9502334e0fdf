//! Integration tests for descriptive statistics and missing-value analysis

use credit_eda::pipeline::{
    analyze_missing_values, get_features_above_threshold, get_fully_missing_columns, infer_column_types,
    missing_counts, summarize, ColumnKind,
};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_summary_of_raw_walkthrough_table() {
    let df = common::create_walkthrough_dataframe();
    let summary = summarize(&df).unwrap();

    assert_eq!(summary.rows, 3);
    assert_eq!(summary.columns.len(), 3);

    let loan = summary.column("loan_amnt").unwrap();
    assert_eq!(loan.kind, ColumnKind::Numeric);
    assert_eq!(loan.missing, 1);
    common::assert_close(loan.missing_ratio, 1.0 / 3.0, 1e-12);

    let stats = loan.stats.as_ref().unwrap();
    assert_eq!(stats.count, 2);
    assert_eq!(stats.mean, 3000.0);
    assert_eq!(stats.min, 1000.0);
    assert_eq!(stats.max, 5000.0);
    assert_eq!(stats.median, 3000.0);

    let grade = summary.column("grade").unwrap();
    assert_eq!(grade.kind, ColumnKind::Categorical);
    assert_eq!(grade.distinct, 2);
    assert!(grade.stats.is_none());
}

#[test]
fn test_summary_quartiles_and_std() {
    let df = df! {
        "int_rate" => [6.0f64, 8.0, 10.0, 12.0, 14.0],
    }
    .unwrap();
    let summary = summarize(&df).unwrap();
    let stats = summary.column("int_rate").unwrap().stats.clone().unwrap();

    assert_eq!(stats.q25, 8.0);
    assert_eq!(stats.median, 10.0);
    assert_eq!(stats.q75, 12.0);
    common::assert_close(stats.std.unwrap(), 10.0f64.sqrt(), 1e-12);
}

#[test]
fn test_nan_counts_as_missing() {
    let df = df! {
        "x" => [Some(1.0f64), Some(f64::NAN), None, Some(4.0)],
    }
    .unwrap();

    let summary = summarize(&df).unwrap();
    let x = summary.column("x").unwrap();
    assert_eq!(x.missing, 2);
    assert_eq!(x.stats.as_ref().unwrap().count, 2);
    assert_eq!(missing_counts(&df).unwrap(), vec![("x".to_string(), 2)]);
}

#[test]
fn test_summary_of_empty_table() {
    let df = df! {
        "loan_amnt" => Vec::<f64>::new(),
        "grade" => Vec::<&str>::new(),
    }
    .unwrap();

    let summary = summarize(&df).unwrap();

    assert_eq!(summary.rows, 0);
    assert_eq!(summary.columns.len(), 2);
    assert_eq!(summary.total_missing(), 0);
    assert!(summary.column("loan_amnt").unwrap().stats.is_none());
}

#[test]
fn test_infer_column_types() {
    let df = common::create_credit_dataframe();
    let profiles = infer_column_types(&df).unwrap();

    let kinds: Vec<(&str, ColumnKind, usize)> =
        profiles.iter().map(|p| (p.name.as_str(), p.kind, p.missing)).collect();
    assert_eq!(
        kinds,
        vec![
            ("loan_amnt", ColumnKind::Numeric, 1),
            ("int_rate", ColumnKind::Numeric, 0),
            ("grade", ColumnKind::Categorical, 1),
            ("age", ColumnKind::Numeric, 0),
            ("notes", ColumnKind::Categorical, 10),
            ("default", ColumnKind::Numeric, 0),
        ]
    );
}

#[test]
fn test_missing_ratios_sorted_descending() {
    let df = common::create_credit_dataframe();
    let ratios = analyze_missing_values(&df).unwrap();

    assert_eq!(ratios[0], ("notes".to_string(), 1.0));
    for pair in ratios.windows(2) {
        assert!(pair[0].1 >= pair[1].1);
    }
    // ties keep column order
    assert_eq!(ratios[1].0, "loan_amnt");
    assert_eq!(ratios[2].0, "grade");
}

#[test]
fn test_threshold_selection_protects_target() {
    let ratios = vec![
        ("default".to_string(), 0.9),
        ("notes".to_string(), 1.0),
        ("loan_amnt".to_string(), 0.1),
    ];

    let above = get_features_above_threshold(&ratios, 0.5, "default");
    assert_eq!(above, vec!["notes".to_string()]);
    assert_eq!(get_fully_missing_columns(&ratios), vec!["notes".to_string()]);
}

#[test]
fn test_pre_and_post_clean_missing_counts() {
    use credit_eda::pipeline::{clean, CleaningConfig};

    let raw = common::create_walkthrough_dataframe();
    let before = summarize(&raw).unwrap();
    let cleaned = clean(&raw, &CleaningConfig::for_target("default")).unwrap();
    let after = summarize(&cleaned.df).unwrap();

    assert_eq!(before.column("loan_amnt").unwrap().missing, 1);
    assert_eq!(after.column("loan_amnt").unwrap().missing, 0);
    assert_eq!(after.total_missing(), 0);
}
