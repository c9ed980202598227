//! Data layer: CSV loading, missing-value sanitation, and the train/test split.

pub mod loader;
pub mod sanitize;
pub mod split;

pub use loader::{load_csv, LoadError};
pub use sanitize::{sanitize, Sanitized};
pub use split::{split, SplitError, DEFAULT_SEED};

use crate::schema::StockRecord;

/// Deterministic BLAKE3 fingerprint over an ordered record sequence.
///
/// Covers dates and all numeric values in file order, so the same input
/// always yields the same artifact provenance regardless of where or when
/// the run happened.
pub fn dataset_fingerprint(records: &[StockRecord]) -> String {
    let mut hasher = blake3::Hasher::new();
    for record in records {
        hasher.update(record.date.to_string().as_bytes());
        hasher.update(&record.open.to_le_bytes());
        hasher.update(&record.high.to_le_bytes());
        hasher.update(&record.low.to_le_bytes());
        hasher.update(&record.close.to_le_bytes());
        hasher.update(&record.adj_close.to_le_bytes());
        hasher.update(&record.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
