//! Durable model artifacts.
//!
//! One versioned JSON file per store directory. Saving replaces whatever
//! artifact was there before: stale files are removed first, then the new
//! one is written, so old and new can never sit side by side. Loading
//! validates the schema version and the internal consistency of the stored
//! pipeline before handing it back.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::{FeatureBounds, NormalizationParams};
use crate::schema::Column;
use crate::trainer::{FittedPipeline, Provenance};

/// Current artifact schema version. Bump on breaking layout changes.
pub const SCHEMA_VERSION: u32 = 1;

const ARTIFACT_FILE: &str = "model.json";

/// Errors from the model store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no model artifact at {0}")]
    Missing(PathBuf),

    #[error("failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode artifact: {0}")]
    Encode(serde_json::Error),

    #[error("artifact at {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("artifact schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("unsupported artifact schema version {found} (max supported: {SCHEMA_VERSION})")]
    UnsupportedVersion { found: u32 },
}

/// Serialized form of a fitted pipeline.
#[derive(Debug, Serialize, Deserialize)]
struct ModelArtifact {
    schema_version: u32,
    feature_columns: Vec<Column>,
    bounds: Vec<FeatureBounds>,
    weights: Vec<f64>,
    bias: f64,
    provenance: Provenance,
}

/// Filesystem store for a single trained model.
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path the artifact lives at.
    pub fn artifact_path(&self) -> PathBuf {
        self.dir.join(ARTIFACT_FILE)
    }

    /// Persist `pipeline`, replacing any previous artifact.
    ///
    /// Creates the store directory if absent. Returns the artifact path.
    pub fn save(&self, pipeline: &FittedPipeline) -> Result<PathBuf, StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            action: "create",
            path: self.dir.clone(),
            source,
        })?;
        self.remove_existing_artifacts()?;

        let artifact = ModelArtifact {
            schema_version: SCHEMA_VERSION,
            feature_columns: pipeline.feature_columns().to_vec(),
            bounds: pipeline.normalization().bounds().to_vec(),
            weights: pipeline.weights().to_vec(),
            bias: pipeline.bias(),
            provenance: pipeline.provenance().clone(),
        };

        let json = serde_json::to_string_pretty(&artifact).map_err(StoreError::Encode)?;
        let path = self.artifact_path();
        std::fs::write(&path, json).map_err(|source| StoreError::Io {
            action: "write",
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }

    /// Reload a pipeline saved by [`ModelStore::save`].
    ///
    /// The reconstructed pipeline produces identical predictions to the one
    /// that was saved.
    pub fn load(&self) -> Result<FittedPipeline, StoreError> {
        let path = self.artifact_path();
        if !path.exists() {
            return Err(StoreError::Missing(path));
        }

        let json = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
            action: "read",
            path: path.clone(),
            source,
        })?;

        let artifact: ModelArtifact =
            serde_json::from_str(&json).map_err(|e| StoreError::Corrupt {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        validate(&artifact)?;

        Ok(FittedPipeline::from_parts(
            NormalizationParams::from_parts(artifact.feature_columns, artifact.bounds),
            artifact.weights,
            artifact.bias,
            artifact.provenance,
        ))
    }

    /// Remove every JSON artifact currently in the store directory.
    fn remove_existing_artifacts(&self) -> Result<(), StoreError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|source| StoreError::Io {
            action: "scan",
            path: self.dir.clone(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                action: "scan",
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
                std::fs::remove_file(&path).map_err(|source| StoreError::Io {
                    action: "remove",
                    path: path.clone(),
                    source,
                })?;
            }
        }

        Ok(())
    }
}

/// Structural checks before an artifact becomes a usable pipeline.
fn validate(artifact: &ModelArtifact) -> Result<(), StoreError> {
    if artifact.schema_version > SCHEMA_VERSION {
        return Err(StoreError::UnsupportedVersion {
            found: artifact.schema_version,
        });
    }

    let columns = artifact.feature_columns.len();
    if columns == 0 {
        return Err(StoreError::SchemaMismatch(
            "artifact has no feature columns".into(),
        ));
    }
    if artifact.bounds.len() != columns {
        return Err(StoreError::SchemaMismatch(format!(
            "{} feature columns but {} bounds",
            columns,
            artifact.bounds.len()
        )));
    }
    if artifact.weights.len() != columns {
        return Err(StoreError::SchemaMismatch(format!(
            "{} feature columns but {} weights",
            columns,
            artifact.weights.len()
        )));
    }

    let finite = artifact.bias.is_finite()
        && artifact.weights.iter().all(|w| w.is_finite())
        && artifact
            .bounds
            .iter()
            .all(|b| b.min.is_finite() && b.max.is_finite());
    if !finite {
        return Err(StoreError::SchemaMismatch(
            "artifact contains non-finite values".into(),
        ));
    }

    Ok(())
}
