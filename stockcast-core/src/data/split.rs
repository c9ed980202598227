//! Reproducible train/test partitioning.
//!
//! Assignment is a seeded index shuffle, so the same seed and input produce
//! the same partition on every run and on every machine. Both partitions
//! keep the original relative record order.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use thiserror::Error;

use crate::schema::StockRecord;

/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: u64 = 42;

/// Errors from the splitting layer.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("test fraction must be in (0, 1), got {0}")]
    InvalidFraction(f64),
}

/// Partition `records` into `(train, test)` by seeded random assignment.
///
/// `test_fraction` of the rows (within rounding) land in the test
/// partition; no row appears in both, and together the partitions cover
/// the input.
pub fn split(
    records: Vec<StockRecord>,
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<StockRecord>, Vec<StockRecord>), SplitError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(SplitError::InvalidFraction(test_fraction));
    }

    let n = records.len();
    let test_count = (n as f64 * test_fraction).round() as usize;

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));

    let mut in_test = vec![false; n];
    for &index in indices.iter().take(test_count) {
        in_test[index] = true;
    }

    let mut train = Vec::with_capacity(n - test_count);
    let mut test = Vec::with_capacity(test_count);
    for (index, record) in records.into_iter().enumerate() {
        if in_test[index] {
            test.push(record);
        } else {
            train.push(record);
        }
    }

    Ok((train, test))
}
