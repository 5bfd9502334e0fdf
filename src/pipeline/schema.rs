//! Expected-column schema for credit datasets
//!
//! Column names are referenced by string throughout the analysis, so the
//! expected columns are declared once here and checked right after loading.
//! Missing or mistyped columns are reported at the boundary instead of
//! surfacing deep inside an analysis step.

use polars::prelude::*;
use serde::Serialize;

/// Inferred kind of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Other,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
            ColumnKind::Other => write!(f, "other"),
        }
    }
}

impl ColumnKind {
    /// Classify a polars dtype
    pub fn from_dtype(dtype: &DataType) -> Self {
        if dtype.is_primitive_numeric() {
            ColumnKind::Numeric
        } else if matches!(
            dtype,
            DataType::String | DataType::Categorical(_, _) | DataType::Boolean
        ) {
            ColumnKind::Categorical
        } else {
            ColumnKind::Other
        }
    }

    /// Classify a column of a DataFrame
    pub fn of(column: &Column) -> Self {
        Self::from_dtype(column.dtype())
    }
}

/// One expected column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
    pub required: bool,
}

impl ColumnSpec {
    pub fn required(name: &str, kind: ColumnKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: true,
        }
    }

    pub fn optional(name: &str, kind: ColumnKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: false,
        }
    }
}

/// A column whose loaded kind differs from the declared one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindMismatch {
    pub column: String,
    pub expected: ColumnKind,
    pub found: ColumnKind,
}

/// Outcome of checking a table against a schema
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchemaReport {
    pub missing_required: Vec<String>,
    pub missing_optional: Vec<String>,
    pub kind_mismatches: Vec<KindMismatch>,
}

impl SchemaReport {
    /// True when every required column is present with the declared kind
    pub fn is_valid(&self) -> bool {
        self.missing_required.is_empty() && self.kind_mismatches.is_empty()
    }
}

/// Declared columns of a credit dataset
#[derive(Debug, Clone)]
pub struct CreditSchema {
    pub columns: Vec<ColumnSpec>,
}

impl Default for CreditSchema {
    fn default() -> Self {
        Self::for_target("default")
    }
}

impl CreditSchema {
    /// Standard loan-book columns with the given binary target
    pub fn for_target(target: &str) -> Self {
        Self {
            columns: vec![
                ColumnSpec::required(target, ColumnKind::Numeric),
                ColumnSpec::optional("loan_amnt", ColumnKind::Numeric),
                ColumnSpec::optional("int_rate", ColumnKind::Numeric),
                ColumnSpec::optional("grade", ColumnKind::Categorical),
                ColumnSpec::optional("age", ColumnKind::Numeric),
            ],
        }
    }

    pub fn with_column(mut self, spec: ColumnSpec) -> Self {
        self.columns.retain(|c| c.name != spec.name);
        self.columns.push(spec);
        self
    }

    /// Check the table against the declared columns.
    ///
    /// A string-typed target is not reported as a kind mismatch, it can be
    /// mapped to 0/1 by the cleaner.
    pub fn validate(&self, df: &DataFrame) -> SchemaReport {
        let mut report = SchemaReport::default();

        for spec in &self.columns {
            match df.column(&spec.name) {
                Err(_) => {
                    if spec.required {
                        report.missing_required.push(spec.name.clone());
                    } else {
                        report.missing_optional.push(spec.name.clone());
                    }
                }
                Ok(col) => {
                    let found = ColumnKind::of(col);
                    let tolerated = spec.required && found == ColumnKind::Categorical;
                    if found != spec.kind && !tolerated {
                        report.kind_mismatches.push(KindMismatch {
                            column: spec.name.clone(),
                            expected: spec.kind,
                            found,
                        });
                    }
                }
            }
        }

        report
    }
}

/// True if the table has a column with this name
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}
