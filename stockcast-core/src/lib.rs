//! Stockcast core — single-asset close-price regression pipeline.
//!
//! Stages, in run order:
//! - CSV loading with missing-value tolerance and hard parse failures
//! - Sanitation (drop rows missing required columns) and a seeded,
//!   reproducible train/test split
//! - Min-max feature normalization fitted on the training partition only
//! - Ridge least-squares training into an immutable [`FittedPipeline`]
//! - Held-out evaluation (MAE / MSE / RMSE / R²)
//! - Versioned JSON model artifacts that reload into an equivalent pipeline
//! - Batch prediction over new feature rows

pub mod data;
pub mod features;
pub mod metrics;
pub mod predict;
pub mod schema;
pub mod solver;
pub mod store;
pub mod trainer;

pub use metrics::{evaluate, RegressionMetrics};
pub use predict::{predict_records, PredictionResult};
pub use schema::{Column, StockRecord, DEFAULT_FEATURE_COLUMNS};
pub use store::ModelStore;
pub use trainer::{train, FittedPipeline, TrainerConfig};
