//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

/// The three-row loan table from the cleaning walkthrough:
/// one missing `loan_amnt` between 1000 and 5000
pub fn create_walkthrough_dataframe() -> DataFrame {
    df! {
        "loan_amnt" => [Some(1000.0f64), None, Some(5000.0)],
        "grade" => ["A", "B", "A"],
        "default" => [0i32, 1, 0],
    }
    .unwrap()
}

/// A small loan book with the usual credit columns
///
/// - `loan_amnt`: one missing value, one large outlier (250000)
/// - `int_rate`: rises with default
/// - `grade`: one missing value
/// - `age`: complete
/// - `notes`: entirely missing (should be dropped)
/// - `default`: binary target
pub fn create_credit_dataframe() -> DataFrame {
    df! {
        "loan_amnt" => [Some(5000.0f64), Some(12000.0), None, Some(8000.0), Some(15000.0),
                        Some(7000.0), Some(9000.0), Some(250000.0), Some(11000.0), Some(6000.0)],
        "int_rate" => [7.5f64, 13.2, 6.1, 14.8, 8.3, 15.9, 7.9, 12.5, 6.8, 16.4],
        "grade" => [Some("A"), Some("C"), Some("A"), Some("D"), None,
                    Some("D"), Some("A"), Some("C"), Some("B"), Some("D")],
        "age" => [34i64, 45, 29, 52, 38, 23, 61, 41, 36, 27],
        "notes" => [None::<&str>, None, None, None, None, None, None, None, None, None],
        "default" => [0i32, 1, 0, 1, 0, 1, 0, 1, 0, 1],
    }
    .unwrap()
}

/// Synthetic loan book with a seeded generator.
///
/// Default probability increases with `int_rate` and with worse grades;
/// `age` is independent of default.
pub fn create_synthetic_credit_dataframe(rows: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let grades = ["A", "B", "C", "D"];

    let mut loan_amnt = Vec::with_capacity(rows);
    let mut int_rate = Vec::with_capacity(rows);
    let mut grade = Vec::with_capacity(rows);
    let mut age = Vec::with_capacity(rows);
    let mut default = Vec::with_capacity(rows);

    for _ in 0..rows {
        let g = rng.gen_range(0..grades.len());
        let rate = 5.0 + 3.0 * g as f64 + rng.gen::<f64>() * 4.0;
        let p_default = (0.05 + 0.15 * g as f64).min(0.9);

        loan_amnt.push(if rng.gen::<f64>() < 0.05 {
            None
        } else {
            Some(1000.0 + rng.gen::<f64>() * 30000.0)
        });
        int_rate.push(rate);
        grade.push(grades[g]);
        age.push(rng.gen_range(21i64..70));
        default.push(i32::from(rng.gen::<f64>() < p_default));
    }

    df! {
        "loan_amnt" => loan_amnt,
        "int_rate" => int_rate,
        "grade" => grade,
        "age" => age,
        "default" => default,
    }
    .unwrap()
}

/// Create a larger random numeric DataFrame for benchmarks and stress tests
pub fn create_large_test_dataframe(rows: usize, cols: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut columns: Vec<Column> = Vec::with_capacity(cols + 1);
    let target: Vec<i32> = (0..rows).map(|_| rng.gen_range(0..2)).collect();
    columns.push(Column::new("default".into(), target));

    for i in 0..cols {
        let values: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>()).collect();
        columns.push(Column::new(format!("feature_{}", i).into(), values));
    }

    DataFrame::new(columns).unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("credit_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("credit_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert two floats agree within `tol`
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {} to be within {} of {}",
        actual,
        tol,
        expected
    );
}
