//! credit-eda: exploratory analysis of credit-risk datasets
//!
//! Loads a tabular loan dataset, cleans it with a fixed and reproducible
//! policy, summarizes it, and looks for candidate predictors of default and
//! dependence of the target on sensitive attributes through correlation and
//! chi-square tests. Charts are rendered to PNG files.

pub mod cli;
pub mod error;
pub mod pipeline;
pub mod plot;
pub mod report;
pub mod utils;
pub mod workflow;

pub use error::{EdaError, Result};
