//! Integration tests for chi-square association and target rates

use credit_eda::pipeline::{band_numeric_column, chi_square_test, target_rate_by_category};
use credit_eda::EdaError;
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_independent_columns_give_p_near_one() {
    // observed counts equal expected counts in every cell
    let df = df! {
        "grade" => ["A", "A", "A", "A", "B", "B", "B", "B"],
        "default" => [0i32, 0, 1, 1, 0, 0, 1, 1],
    }
    .unwrap();

    let result = chi_square_test(&df, "grade", "default").unwrap();

    assert_eq!(result.dof, 1);
    assert!(result.yates_corrected);
    common::assert_close(result.statistic, 0.0, 1e-12);
    common::assert_close(result.p_value, 1.0, 1e-9);
    common::assert_close(result.cramers_v, 0.0, 1e-12);
    assert!(!result.is_significant(0.05));
}

#[test]
fn test_perfect_association_gives_p_near_zero() {
    let grades: Vec<&str> = (0..100).map(|i| if i < 50 { "A" } else { "B" }).collect();
    let defaults: Vec<i32> = (0..100).map(|i| i32::from(i >= 50)).collect();
    let df = df! {
        "grade" => grades,
        "default" => defaults,
    }
    .unwrap();

    let result = chi_square_test(&df, "grade", "default").unwrap();

    assert!(result.p_value < 1e-10, "p = {}", result.p_value);
    common::assert_close(result.cramers_v, 1.0, 1e-12);
    assert!(result.is_significant(0.05));
    assert_eq!(result.observations, 100);
}

#[test]
fn test_multi_category_table_has_no_correction() {
    let df = df! {
        "grade" => ["A", "A", "B", "B", "C", "C", "A", "B", "C"],
        "default" => [0i32, 0, 0, 1, 1, 1, 0, 1, 1],
    }
    .unwrap();

    let result = chi_square_test(&df, "grade", "default").unwrap();

    assert_eq!(result.dof, 2);
    assert!(!result.yates_corrected);
    assert_eq!(result.contingency.row_categories, vec!["A", "B", "C"]);
    assert_eq!(result.contingency.col_categories, vec!["0", "1"]);
    assert!((0.0..=1.0).contains(&result.p_value));
    assert!((0.0..=1.0).contains(&result.cramers_v));
}

#[test]
fn test_statistic_matches_hand_computation() {
    // 2x2 [[10, 20], [30, 40]] with continuity correction
    let mut grades = Vec::new();
    let mut defaults = Vec::new();
    for (grade, default, n) in [("A", 0i32, 10), ("A", 1, 20), ("B", 0, 30), ("B", 1, 40)] {
        for _ in 0..n {
            grades.push(grade);
            defaults.push(default);
        }
    }
    let df = df! {
        "grade" => grades,
        "default" => defaults,
    }
    .unwrap();

    let result = chi_square_test(&df, "grade", "default").unwrap();

    common::assert_close(result.statistic, 0.4464, 1e-3);
    common::assert_close(result.p_value, 0.504, 1e-3);
}

#[test]
fn test_missing_values_are_ignored() {
    let df = df! {
        "grade" => [Some("A"), None, Some("B"), Some("A"), Some("B")],
        "default" => [Some(0i32), Some(1), Some(1), None, Some(0)],
    }
    .unwrap();

    let result = chi_square_test(&df, "grade", "default").unwrap();
    assert_eq!(result.observations, 3);
}

#[test]
fn test_single_category_is_degenerate() {
    let df = df! {
        "grade" => ["A", "A", "A", "A"],
        "default" => [0i32, 1, 0, 1],
    }
    .unwrap();

    let err = chi_square_test(&df, "grade", "default").unwrap_err();

    match &err {
        EdaError::DegenerateTest { column, categories } => {
            assert_eq!(column, "grade");
            assert_eq!(*categories, 1);
        }
        other => panic!("Expected DegenerateTest, got {:?}", other),
    }
    assert!(err.is_recoverable());
}

#[test]
fn test_constant_target_is_degenerate() {
    let df = df! {
        "grade" => ["A", "B", "A", "B"],
        "default" => [0i32, 0, 0, 0],
    }
    .unwrap();

    let err = chi_square_test(&df, "grade", "default").unwrap_err();
    assert!(matches!(err, EdaError::DegenerateTest { ref column, .. } if column == "default"));
}

#[test]
fn test_missing_column_is_reported() {
    let df = common::create_credit_dataframe();

    let err = chi_square_test(&df, "home_ownership", "default").unwrap_err();

    assert!(matches!(err, EdaError::MissingColumn { ref column, .. } if column == "home_ownership"));
    assert!(err.to_string().contains("home_ownership"));
}

#[test]
fn test_synthetic_grade_is_associated_with_default() {
    let df = common::create_synthetic_credit_dataframe(2000, 5);

    let result = chi_square_test(&df, "grade", "default").unwrap();

    assert_eq!(result.dof, 3);
    assert!(result.is_significant(0.05), "p = {}", result.p_value);
}

#[test]
fn test_target_rate_by_category() {
    let df = common::create_credit_dataframe();

    let rates = target_rate_by_category(&df, "grade", "default").unwrap();

    let summary: Vec<(&str, usize, usize)> = rates
        .iter()
        .map(|r| (r.category.as_str(), r.count, r.events))
        .collect();
    // the row with a missing grade is not counted
    assert_eq!(summary, vec![("A", 3, 0), ("B", 1, 0), ("C", 2, 2), ("D", 3, 3)]);
    assert_eq!(rates[0].rate, 0.0);
    assert_eq!(rates[3].rate, 1.0);
}

#[test]
fn test_target_rate_rejects_non_binary_target() {
    let df = df! {
        "grade" => ["A", "B", "A"],
        "loan_status" => ["Fully Paid", "Charged Off", "Current"],
    }
    .unwrap();

    let err = target_rate_by_category(&df, "grade", "loan_status").unwrap_err();

    assert!(matches!(err, EdaError::NonBinaryTarget { ref values, .. } if values.len() == 3));
    assert!(err.is_recoverable());
}

#[test]
fn test_band_numeric_column_quantiles() {
    let df = common::create_credit_dataframe();

    let banded = band_numeric_column(&df, "age", 4).unwrap();

    assert_eq!(banded.name().as_str(), "age_band");
    assert_eq!(banded.len(), df.height());
    assert_eq!(banded.null_count(), 0);

    let labels: Vec<&str> = banded.str().unwrap().into_no_null_iter().collect();
    // age 23 is the minimum, 61 the maximum
    assert_eq!(labels[5], "[23, 30.25)");
    assert_eq!(labels[6], "[44, 61]");

    let mut distinct = labels.clone();
    distinct.sort();
    distinct.dedup();
    assert_eq!(distinct.len(), 4);
}

#[test]
fn test_band_keeps_missing_values() {
    let df = df! {
        "age" => [Some(25.0f64), None, Some(40.0), Some(f64::NAN), Some(55.0)],
    }
    .unwrap();

    let banded = band_numeric_column(&df, "age", 2).unwrap();

    assert_eq!(banded.null_count(), 2);
}

#[test]
fn test_band_constant_column_collapses() {
    let df = df! { "age" => [30i64, 30, 30] }.unwrap();

    let banded = band_numeric_column(&df, "age", 4).unwrap();
    let labels: Vec<&str> = banded.str().unwrap().into_no_null_iter().collect();

    assert_eq!(labels, vec!["[30, 30]"; 3]);
}

#[test]
fn test_band_rejects_bad_input() {
    let df = common::create_credit_dataframe();

    assert!(matches!(band_numeric_column(&df, "age", 0), Err(EdaError::InvalidConfig(_))));
    assert!(matches!(band_numeric_column(&df, "grade", 4), Err(EdaError::NonNumeric { .. })));
    assert!(matches!(band_numeric_column(&df, "income", 4), Err(EdaError::MissingColumn { .. })));
}

#[test]
fn test_banded_sensitive_attribute_can_be_tested() {
    let df = common::create_synthetic_credit_dataframe(500, 3);
    let banded = band_numeric_column(&df, "age", 4).unwrap();
    let mut with_band = df.clone();
    with_band.with_column(banded).unwrap();

    let result = chi_square_test(&with_band, "age_band", "default").unwrap();

    assert_eq!(result.contingency.row_categories.len(), 4);
    assert_eq!(result.dof, 3);
    assert!((0.0..=1.0).contains(&result.p_value));
}

#[test]
fn test_fractional_bands_keep_distinct_labels() {
    let df = df! {
        "utilization" => [0.001f64, 0.002, 0.003, 0.004, 0.005, 0.006, 0.007, 0.008],
    }
    .unwrap();

    let banded = band_numeric_column(&df, "utilization", 4).unwrap();
    let labels: Vec<&str> = banded.str().unwrap().into_no_null_iter().collect();

    let mut distinct = labels.clone();
    distinct.dedup();
    assert_eq!(distinct.len(), 4, "labels: {:?}", labels);
    assert!(labels[0].starts_with("[0.001, "), "labels: {:?}", labels);
    assert!(labels[7].ends_with(", 0.008]"), "labels: {:?}", labels);
}

fn lower_edge(label: &str) -> f64 {
    label[1..label.find(',').unwrap()].trim().parse().unwrap()
}

#[test]
fn test_bands_are_ordered_by_value() {
    let df = df! {
        "loan_amnt" => [500.0f64, 800.0, 1200.0, 2000.0, 3500.0, 5000.0, 8000.0, 12000.0, 20000.0, 50000.0],
        "default" => [0i32, 0, 1, 0, 0, 1, 0, 1, 1, 1],
    }
    .unwrap();
    let mut with_band = df.clone();
    with_band
        .with_column(band_numeric_column(&df, "loan_amnt", 4).unwrap())
        .unwrap();

    let rates = target_rate_by_category(&with_band, "loan_amnt_band", "default").unwrap();
    let rate_edges: Vec<f64> = rates.iter().map(|r| lower_edge(&r.category)).collect();
    assert_eq!(rates.len(), 4);
    assert!(rate_edges.windows(2).all(|w| w[0] < w[1]), "order: {:?}", rate_edges);
    assert_eq!(rate_edges[0], 500.0);

    let result = chi_square_test(&with_band, "loan_amnt_band", "default").unwrap();
    let row_edges: Vec<f64> = result
        .contingency
        .row_categories
        .iter()
        .map(|c| lower_edge(c))
        .collect();
    assert_eq!(row_edges, rate_edges);
    assert_eq!(result.contingency.col_categories, vec!["0", "1"]);
}
