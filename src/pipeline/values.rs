//! Column value extraction and order statistics
//!
//! Every stage treats a polars null and a float `NaN` as the same missing
//! marker. The helpers here are the single place that rule lives.

use polars::prelude::*;

/// Extract a column as `f64` values, mapping nulls and NaN to `None`
pub fn float_values(col: &Column) -> PolarsResult<Vec<Option<f64>>> {
    let cast = col.cast(&DataType::Float64)?;
    Ok(cast
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Present (non-missing) values of a numeric column
pub fn present_floats(col: &Column) -> PolarsResult<Vec<f64>> {
    Ok(float_values(col)?.into_iter().flatten().collect())
}

/// Convert a column to a Vec of Option<String> for category comparison
pub fn string_values(col: &Column) -> PolarsResult<Vec<Option<String>>> {
    let values: Vec<Option<String>> = match col.dtype() {
        DataType::String => col
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect(),
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let cast = col.cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            let cast = col.cast(&DataType::UInt64)?;
            cast.u64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::Float32 | DataType::Float64 => float_values(col)?
            .into_iter()
            .map(|v| v.map(|n| format!("{}", n)))
            .collect(),
        DataType::Boolean => col
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| b.to_string()))
            .collect(),
        _ => {
            let cast = col.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect()
        }
    };

    Ok(values)
}

/// Number of missing cells in a column (nulls, plus NaN for float columns)
pub fn missing_count(col: &Column) -> PolarsResult<usize> {
    match col.dtype() {
        DataType::Float32 | DataType::Float64 => {
            Ok(float_values(col)?.iter().filter(|v| v.is_none()).count())
        }
        _ => Ok(col.null_count()),
    }
}

/// Sort a slice of floats ascending (NaN-free input)
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    out
}

/// Quantile with linear interpolation between order statistics.
///
/// Matches the default used by most dataframe libraries for `describe`.
pub fn quantile_linear(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Quantile taken as a single order statistic (nearest rank, no interpolation).
///
/// Used for outlier fences: a monotone transform of the data that leaves the
/// order statistic untouched leaves the quantile untouched too.
pub fn quantile_nearest(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = (q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64).round() as usize;
    Some(sorted[pos])
}

/// Median of unsorted values
pub fn median(values: &[f64]) -> Option<f64> {
    quantile_linear(&sorted(values), 0.5)
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n - 1 denominator)
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|x| (x - m) * (x - m)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_is_missing() {
        let col = Column::new("x".into(), [Some(1.0f64), Some(f64::NAN), None]);
        let values = float_values(&col).unwrap();
        assert_eq!(values, vec![Some(1.0), None, None]);
        assert_eq!(missing_count(&col).unwrap(), 2);
    }

    #[test]
    fn test_quantile_linear() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_linear(&data, 0.5), Some(2.5));
        assert_eq!(quantile_linear(&data, 0.25), Some(1.75));
        assert_eq!(quantile_linear(&data, 0.0), Some(1.0));
        assert_eq!(quantile_linear(&data, 1.0), Some(4.0));
        assert_eq!(quantile_linear(&[], 0.5), None);
    }

    #[test]
    fn test_quantile_nearest_is_order_statistic() {
        let data = [1.0, 2.0, 3.0, 4.0, 100.0];
        let q1 = quantile_nearest(&data, 0.25).unwrap();
        let q3 = quantile_nearest(&data, 0.75).unwrap();
        assert!(data.contains(&q1));
        assert!(data.contains(&q3));
        assert_eq!(q1, 2.0);
        assert_eq!(q3, 4.0);
    }

    #[test]
    fn test_median_and_std() {
        assert_eq!(median(&[5000.0, 1000.0]), Some(3000.0));
        let std = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((std - 2.138).abs() < 0.001);
        assert_eq!(sample_std(&[1.0]), None);
    }

    #[test]
    fn test_string_values_for_integers() {
        let col = Column::new("t".into(), [Some(0i32), Some(1), None]);
        let values = string_values(&col).unwrap();
        assert_eq!(values, vec![Some("0".to_string()), Some("1".to_string()), None]);
    }
}
