//! Model training — fits normalization bounds and regression weights into
//! an immutable [`FittedPipeline`].

use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::dataset_fingerprint;
use crate::features::{FeatureError, NormalizationParams};
use crate::schema::{Column, StockRecord};
use crate::solver::{solve_ridge, SolverError};

/// Errors from training.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("training set has a single distinct close value; the fit is degenerate")]
    DegenerateTarget,

    #[error(transparent)]
    Features(#[from] FeatureError),

    #[error("solver failed: {0}")]
    Solver(#[from] SolverError),
}

/// Trainer knobs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// L2 penalty applied to the feature weights (never the bias).
    pub l2_penalty: f64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self { l2_penalty: 1e-6 }
    }
}

/// Provenance recorded alongside a fitted model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provenance {
    /// BLAKE3 fingerprint of the training rows.
    pub dataset_fingerprint: String,
    pub train_rows: usize,
    pub trained_at: DateTime<Utc>,
}

/// Immutable result of a training run.
///
/// Holds everything inference needs: the feature columns, their training
/// bounds, and the fitted weights. Produced once by [`train`]; every later
/// stage (evaluation, persistence, prediction) only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedPipeline {
    normalization: NormalizationParams,
    weights: Vec<f64>,
    bias: f64,
    provenance: Provenance,
}

impl FittedPipeline {
    /// Reassemble a pipeline from stored parts (artifact load path).
    pub(crate) fn from_parts(
        normalization: NormalizationParams,
        weights: Vec<f64>,
        bias: f64,
        provenance: Provenance,
    ) -> Self {
        Self {
            normalization,
            weights,
            bias,
            provenance,
        }
    }

    pub fn feature_columns(&self) -> &[Column] {
        self.normalization.columns()
    }

    pub fn normalization(&self) -> &NormalizationParams {
        &self.normalization
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Predicted close for one record: `bias + Σ wᵢ · normalized featureᵢ`.
    ///
    /// Rows outside the training range normalize past [0, 1] and are scored
    /// like any other.
    pub fn predict(&self, record: &StockRecord) -> f64 {
        let features = self.normalization.transform(record);
        self.bias
            + self
                .weights
                .iter()
                .zip(&features)
                .map(|(weight, feature)| weight * feature)
                .sum::<f64>()
    }
}

/// Fit normalization bounds and regression weights on `rows`.
///
/// Deterministic: identical rows, columns, and config produce identical
/// weights.
pub fn train(
    rows: &[StockRecord],
    columns: &[Column],
    config: &TrainerConfig,
) -> Result<FittedPipeline, TrainError> {
    if rows.is_empty() {
        return Err(TrainError::EmptyTrainingSet);
    }
    if !has_target_variation(rows) {
        return Err(TrainError::DegenerateTarget);
    }

    let normalization = NormalizationParams::fit(rows, columns)?;

    let mut design = Array2::<f64>::zeros((rows.len(), columns.len()));
    let mut targets = Array1::<f64>::zeros(rows.len());
    for (i, row) in rows.iter().enumerate() {
        for (j, value) in normalization.transform(row).into_iter().enumerate() {
            design[[i, j]] = value;
        }
        targets[i] = row.close;
    }

    let fit = solve_ridge(&design, &targets, config.l2_penalty)?;

    Ok(FittedPipeline {
        normalization,
        weights: fit.weights,
        bias: fit.bias,
        provenance: Provenance {
            dataset_fingerprint: dataset_fingerprint(rows),
            train_rows: rows.len(),
            trained_at: Utc::now(),
        },
    })
}

/// At least two distinct close values are required for a meaningful fit.
fn has_target_variation(rows: &[StockRecord]) -> bool {
    let first = rows[0].close;
    rows.iter().any(|row| row.close != first)
}
