//! Regression error metrics over a held-out partition.
//!
//! Evaluation transforms test rows with the pipeline's stored bounds
//! (nothing here refits normalization), then accumulates the standard
//! error metrics from (predicted, actual) pairs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::StockRecord;
use crate::trainer::FittedPipeline;

/// Errors from evaluation.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("test set is empty")]
    EmptyTestSet,
}

/// Aggregate regression metrics for one evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mean_absolute_error: f64,
    pub mean_squared_error: f64,
    pub root_mean_squared_error: f64,
    /// `None` when the test closes are constant: total variance is zero and
    /// the coefficient of determination is undefined.
    pub r_squared: Option<f64>,
    pub sample_count: usize,
}

/// Score `pipeline` on `test_rows`.
pub fn evaluate(
    pipeline: &FittedPipeline,
    test_rows: &[StockRecord],
) -> Result<RegressionMetrics, EvalError> {
    if test_rows.is_empty() {
        return Err(EvalError::EmptyTestSet);
    }

    let pairs: Vec<(f64, f64)> = test_rows
        .iter()
        .map(|row| (pipeline.predict(row), row.close))
        .collect();

    Ok(from_pairs(&pairs))
}

/// Compute metrics from (predicted, actual) pairs.
///
/// MAE = mean(|pred − actual|); MSE = mean((pred − actual)²);
/// RMSE = √MSE; R² = 1 − SS_res / SS_tot against the actual mean.
pub fn from_pairs(pairs: &[(f64, f64)]) -> RegressionMetrics {
    let n = pairs.len() as f64;

    let mean_absolute_error = pairs.iter().map(|&(p, a)| (p - a).abs()).sum::<f64>() / n;
    let mean_squared_error = pairs.iter().map(|&(p, a)| (p - a).powi(2)).sum::<f64>() / n;
    let root_mean_squared_error = mean_squared_error.sqrt();

    let actual_mean = pairs.iter().map(|&(_, a)| a).sum::<f64>() / n;
    let ss_tot = pairs
        .iter()
        .map(|&(_, a)| (a - actual_mean).powi(2))
        .sum::<f64>();
    let ss_res = pairs.iter().map(|&(p, a)| (a - p).powi(2)).sum::<f64>();

    let r_squared = if ss_tot == 0.0 {
        None
    } else {
        Some(1.0 - ss_res / ss_tot)
    };

    RegressionMetrics {
        mean_absolute_error,
        mean_squared_error,
        root_mean_squared_error,
        r_squared,
        sample_count: pairs.len(),
    }
}
