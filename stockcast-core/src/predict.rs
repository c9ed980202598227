//! Batch inference over caller-supplied rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::schema::StockRecord;
use crate::trainer::FittedPipeline;

/// One predicted close, paired with the actual close when the input row
/// carried one. Prediction inputs may omit the target column entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub date: NaiveDate,
    pub predicted_close: f64,
    pub actual_close: Option<f64>,
}

impl PredictionResult {
    /// predicted − actual, when the actual close is known.
    pub fn difference(&self) -> Option<f64> {
        self.actual_close
            .map(|actual| self.predicted_close - actual)
    }
}

/// Apply a fitted pipeline to each row.
///
/// Rows whose raw values fall outside the training bounds are scored like
/// any other; their normalized components simply leave [0, 1]. Pure: the
/// pipeline is only read.
pub fn predict_records(pipeline: &FittedPipeline, rows: &[StockRecord]) -> Vec<PredictionResult> {
    rows.iter()
        .map(|row| PredictionResult {
            date: row.date,
            predicted_close: pipeline.predict(row),
            actual_close: (!row.close.is_nan()).then_some(row.close),
        })
        .collect()
}
