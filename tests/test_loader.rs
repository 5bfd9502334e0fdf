//! Integration tests for dataset loading and saving

use credit_eda::pipeline::{
    estimated_memory_mb, get_column_names, load_dataset, load_dataset_with_progress, save_dataset,
};
use credit_eda::EdaError;
use polars::prelude::*;
use std::io::Write;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_load_csv_file() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "loan_amnt,grade,default").unwrap();
    writeln!(file, "1000,A,0").unwrap();
    writeln!(file, "5000,B,1").unwrap();
    drop(file);

    let df = load_dataset_with_progress(&csv_path, 100).unwrap();

    assert_eq!(df.shape(), (2, 3), "Should have 2 data rows and 3 columns");
    assert_eq!(df.get_column_names(), &["loan_amnt", "grade", "default"]);
    assert!(estimated_memory_mb(&df) >= 0.0, "Memory estimate should be non-negative");
}

#[test]
fn test_load_parquet_file() {
    let mut df = common::create_credit_dataframe();
    let (_temp_dir, parquet_path) = common::create_temp_parquet(&mut df);

    let loaded = load_dataset(&parquet_path, 100).unwrap();

    assert_eq!(loaded.shape(), df.shape());
    assert_eq!(loaded.get_column_names(), df.get_column_names());
}

#[test]
fn test_get_column_names_csv() {
    let mut df = common::create_walkthrough_dataframe();
    let (_temp_dir, csv_path) = common::create_temp_csv(&mut df);

    let columns = get_column_names(&csv_path).unwrap();

    assert_eq!(columns, vec!["loan_amnt", "grade", "default"]);
}

#[test]
fn test_unsupported_format() {
    let temp_dir = TempDir::new().unwrap();
    let bad_path = temp_dir.path().join("credit.xlsx");
    std::fs::File::create(&bad_path).unwrap();

    let err = load_dataset(&bad_path, 100).unwrap_err();

    assert!(matches!(err, EdaError::UnsupportedFormat(_)));
    assert!(err.to_string().contains("Unsupported"), "got: {}", err);
}

#[test]
fn test_nonexistent_file_is_fatal_error() {
    let path = std::path::Path::new("/nonexistent/path/to/credit_data.csv");

    let err = load_dataset(path, 100).unwrap_err();

    assert!(matches!(err, EdaError::FileNotFound(_)));
    assert!(!err.is_recoverable());
}

#[test]
fn test_csv_missing_tokens_become_null() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("missing.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "loan_amnt,grade,default").unwrap();
    writeln!(file, "1000,A,0").unwrap();
    writeln!(file, "NA,,1").unwrap();
    writeln!(file, "5000,N/A,0").unwrap();
    drop(file);

    let df = load_dataset(&csv_path, 100).unwrap();

    assert_eq!(df.height(), 3);
    assert_eq!(df.column("loan_amnt").unwrap().null_count(), 1);
    assert_eq!(df.column("grade").unwrap().null_count(), 2);
    assert!(df.column("loan_amnt").unwrap().dtype().is_primitive_numeric());
}

#[test]
fn test_types_are_inferred() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("mixed.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "age,int_rate,grade").unwrap();
    writeln!(file, "34,7.5,A").unwrap();
    writeln!(file, "45,13.2,C").unwrap();
    drop(file);

    let df = load_dataset(&csv_path, 100).unwrap();

    assert_eq!(df.column("age").unwrap().dtype(), &DataType::Int64);
    assert_eq!(df.column("int_rate").unwrap().dtype(), &DataType::Float64);
    assert_eq!(df.column("grade").unwrap().dtype(), &DataType::String);
}

#[test]
fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let out_path = temp_dir.path().join("data").join("processed").join("clean.csv");
    let df = common::create_walkthrough_dataframe();

    save_dataset(&df, &out_path).unwrap();

    assert!(out_path.exists());
    let reloaded = load_dataset(&out_path, 100).unwrap();
    assert_eq!(reloaded.height(), 3);
    assert_eq!(reloaded.column("loan_amnt").unwrap().null_count(), 1);
}

#[test]
fn test_save_parquet() {
    let temp_dir = TempDir::new().unwrap();
    let out_path = temp_dir.path().join("clean.parquet");
    let df = common::create_credit_dataframe();

    save_dataset(&df, &out_path).unwrap();

    let reloaded = load_dataset(&out_path, 0).unwrap();
    assert_eq!(reloaded.shape(), df.shape());
}

#[test]
fn test_save_rejects_unknown_extension() {
    let temp_dir = TempDir::new().unwrap();
    let df = common::create_walkthrough_dataframe();

    let result = save_dataset(&df, &temp_dir.path().join("clean.json"));

    assert!(matches!(result, Err(EdaError::UnsupportedFormat(_))));
}

#[test]
fn test_large_file_memory_estimate() {
    let mut df = common::create_large_test_dataframe(1000, 50, 7);
    let (temp_dir, parquet_path) = common::create_temp_parquet(&mut df);

    let loaded = load_dataset_with_progress(&parquet_path, 100).unwrap();

    assert_eq!(loaded.shape(), (1000, 51));
    let mem_mb = estimated_memory_mb(&loaded);
    assert!(mem_mb > 0.0, "Large DataFrame should have positive memory estimate");
    assert!(mem_mb >= estimated_memory_mb(&loaded.head(Some(10))));

    drop(temp_dir);
}
