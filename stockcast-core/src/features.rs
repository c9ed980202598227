//! Feature assembly and min-max normalization.
//!
//! Bounds are learned from the training partition only; test and future
//! rows reuse them verbatim, so out-of-range inputs can leave [0, 1].
//! That is accepted, never an error. A constant column normalizes to 0.0
//! instead of dividing by zero.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::{Column, StockRecord};

/// Errors from feature construction.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("feature column list is empty")]
    NoFeatureColumns,

    #[error("close is the regression target and cannot be a feature column")]
    TargetAsFeature,

    #[error("cannot fit normalization bounds on zero rows")]
    NoRows,
}

/// Observed [min, max] of one feature column over the training rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureBounds {
    pub min: f64,
    pub max: f64,
}

impl FeatureBounds {
    /// Rescale one raw value into the unit range of these bounds.
    ///
    /// Constant columns (min == max) map everything to 0.0.
    pub fn rescale(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range == 0.0 {
            0.0
        } else {
            (value - self.min) / range
        }
    }
}

/// Per-column normalization learned from a training partition.
///
/// Column order here is the feature-vector order everywhere downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationParams {
    columns: Vec<Column>,
    bounds: Vec<FeatureBounds>,
}

impl NormalizationParams {
    /// Learn min/max bounds for `columns` over `rows`.
    pub fn fit(rows: &[StockRecord], columns: &[Column]) -> Result<Self, FeatureError> {
        if columns.is_empty() {
            return Err(FeatureError::NoFeatureColumns);
        }
        if columns.contains(&Column::Close) {
            return Err(FeatureError::TargetAsFeature);
        }
        if rows.is_empty() {
            return Err(FeatureError::NoRows);
        }

        let bounds = columns
            .iter()
            .map(|column| {
                let mut min = f64::INFINITY;
                let mut max = f64::NEG_INFINITY;
                for row in rows {
                    let value = column.value(row);
                    if value < min {
                        min = value;
                    }
                    if value > max {
                        max = value;
                    }
                }
                FeatureBounds { min, max }
            })
            .collect();

        Ok(Self {
            columns: columns.to_vec(),
            bounds,
        })
    }

    /// Reassemble params from stored parts. The store validates that the
    /// two vectors agree in length before calling this.
    pub(crate) fn from_parts(columns: Vec<Column>, bounds: Vec<FeatureBounds>) -> Self {
        Self { columns, bounds }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn bounds(&self) -> &[FeatureBounds] {
        &self.bounds
    }

    /// Build the normalized feature vector for one record, in column order.
    pub fn transform(&self, record: &StockRecord) -> Vec<f64> {
        self.columns
            .iter()
            .zip(&self.bounds)
            .map(|(column, bounds)| bounds.rescale(column.value(record)))
            .collect()
    }
}
