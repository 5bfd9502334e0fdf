//! Dataset loader and writer for CSV and Parquet files

use std::path::Path;

use polars::prelude::*;
use tracing::{debug, info};

use crate::error::{EdaError, Result};
use crate::utils::{create_spinner, finish_with_success};

/// Tokens read as missing values in delimited files
const NULL_TOKENS: [&str; 5] = ["NA", "N/A", "NaN", "nan", "null"];

/// Supported on-disk formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Parquet,
}

impl FileFormat {
    /// Determine the format from a path's extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "parquet" => Ok(FileFormat::Parquet),
            _ => Err(EdaError::UnsupportedFormat(extension)),
        }
    }
}

fn lazy_frame(path: &Path, infer_schema_length: usize) -> Result<LazyFrame> {
    if !path.exists() {
        return Err(EdaError::FileNotFound(path.to_path_buf()));
    }

    // 0 means full table scan
    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match FileFormat::from_path(path)? {
        FileFormat::Csv => {
            let null_values = NullValues::AllColumns(NULL_TOKENS.iter().map(|s| (*s).into()).collect());
            LazyCsvReader::new(path)
                .with_has_header(true)
                .with_infer_schema_length(schema_length)
                .with_null_values(Some(null_values))
                .finish()?
        }
        FileFormat::Parquet => LazyFrame::scan_parquet(path, Default::default())?,
    };

    Ok(lf)
}

/// Load a dataset from a file (CSV or Parquet based on extension).
///
/// Column types are inferred from the header and contents; no other
/// transformation is applied.
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let df = lazy_frame(path, infer_schema_length)?.collect()?;
    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "dataset loaded"
    );
    Ok(df)
}

/// Load a dataset behind a spinner
pub fn load_dataset_with_progress(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let spinner = create_spinner(&format!("Loading {}...", path.display()));
    let result = load_dataset(path, infer_schema_length);
    spinner.finish_and_clear();
    result
}

/// Estimated in-memory size of a table in megabytes
pub fn estimated_memory_mb(df: &DataFrame) -> f64 {
    df.estimated_size() as f64 / (1024.0 * 1024.0)
}

/// Column names from the file header (schema only, no data collection)
pub fn get_column_names(path: &Path) -> Result<Vec<String>> {
    let schema = lazy_frame(path, 100)?.collect_schema()?;
    Ok(schema.iter_names().map(|s| s.to_string()).collect())
}

/// Save dataset to file (CSV or Parquet based on extension).
///
/// Parent directories are created when missing.
pub fn save_dataset(df: &DataFrame, path: &Path) -> Result<()> {
    let format = FileFormat::from_path(path)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut out = df.clone();
    let mut file = std::fs::File::create(path)?;
    match format {
        FileFormat::Csv => {
            CsvWriter::new(&mut file).finish(&mut out)?;
        }
        FileFormat::Parquet => {
            ParquetWriter::new(file).finish(&mut out)?;
        }
    }

    debug!(path = %path.display(), rows = out.height(), "dataset written");
    Ok(())
}

/// Save with a spinner and a success line
pub fn save_dataset_with_progress(df: &DataFrame, path: &Path) -> Result<()> {
    let spinner = create_spinner("Writing output file...");
    let result = save_dataset(df, path);
    match &result {
        Ok(()) => finish_with_success(&spinner, &format!("Saved to {}", path.display())),
        Err(_) => spinner.finish_and_clear(),
    }
    result
}

/// Display initial statistics about the dataset
pub fn display_dataset_stats(df: &DataFrame) {
    let (rows, cols) = df.shape();
    let memory_mb = estimated_memory_mb(df);

    println!("\n📊 Dataset Statistics:");
    println!("   Rows: {}", rows);
    println!("   Columns: {}", cols);
    println!("   Estimated memory: {:.2} MB", memory_mb);
}
