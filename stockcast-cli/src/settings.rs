//! Training settings: TOML file plus flag overrides.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use stockcast_core::data::DEFAULT_SEED;
use stockcast_core::schema::Column;
use stockcast_core::{TrainerConfig, DEFAULT_FEATURE_COLUMNS};

/// Settings for a training run.
///
/// Every field has a default, so an empty file (or no file at all) is a
/// valid configuration. CLI flags override whatever the file says.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainSettings {
    /// Feature columns, in model order. The close column is the target and
    /// the trainer rejects it here.
    pub features: Vec<Column>,
    /// Fraction of sanitized rows held out for evaluation.
    pub test_fraction: f64,
    /// Seed for the reproducible split.
    pub seed: u64,
    /// L2 penalty on the regression weights.
    pub l2_penalty: f64,
}

impl Default for TrainSettings {
    fn default() -> Self {
        Self {
            features: DEFAULT_FEATURE_COLUMNS.to_vec(),
            test_fraction: 0.2,
            seed: DEFAULT_SEED,
            l2_penalty: TrainerConfig::default().l2_penalty,
        }
    }
}

impl TrainSettings {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("invalid settings file {}", path.display()))
    }

    pub fn trainer_config(&self) -> TrainerConfig {
        TrainerConfig {
            l2_penalty: self.l2_penalty,
        }
    }
}
