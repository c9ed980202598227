//! End-to-end pipeline tests: CSV on disk through sanitation, splitting,
//! training, evaluation, persistence, reload, and batch prediction.

use std::fmt::Write as _;

use chrono::NaiveDate;
use stockcast_core::data::{load_csv, sanitize, split, DEFAULT_SEED};
use stockcast_core::schema::Column;
use stockcast_core::{evaluate, predict_records, train, ModelStore, StockRecord, TrainerConfig};

const FEATURES: [Column; 5] = [
    Column::Open,
    Column::High,
    Column::Low,
    Column::AdjClose,
    Column::Volume,
];

/// Columns that must be present for a training row: features plus target.
fn training_required() -> Vec<Column> {
    let mut required = FEATURES.to_vec();
    required.push(Column::Close);
    required
}

/// Write a CSV where close tracks a fixed linear combination of the
/// features, with a small deterministic wobble so the fit is good but not
/// exact.
fn write_sample_csv(dir: &std::path::Path, rows: usize, missing_every: Option<usize>) -> std::path::PathBuf {
    let mut content = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
    let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();

    for i in 0..rows {
        let date = start + chrono::Duration::days(i as i64);
        let open = 40.0 + 0.3 * i as f64;
        let high = open + 1.2;
        let low = open - 0.9;
        let adj_close = open - 2.0;
        let volume = 1_000_000.0 + 5_000.0 * i as f64 + 20_000.0 * ((i % 11) as f64);
        let wobble = 0.05 * ((i % 7) as f64 - 3.0);
        let close = 1.0 + 0.5 * open + 0.2 * high + 0.1 * low + 0.15 * adj_close + wobble;

        if missing_every.map(|k| i % k == 0) == Some(true) {
            // Drop the volume field to simulate a gap in the source data.
            writeln!(content, "{date},{open},{high},{low},{close},{adj_close},").unwrap();
        } else {
            writeln!(content, "{date},{open},{high},{low},{close},{adj_close},{volume}").unwrap();
        }
    }

    let path = dir.join("prices.csv");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn full_pipeline_train_evaluate_save_reload_predict() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = write_sample_csv(dir.path(), 120, None);

    let records = load_csv(&csv_path).unwrap();
    assert_eq!(records.len(), 120);

    let sanitized = sanitize(records, &training_required());
    assert_eq!(sanitized.dropped, 0);

    let (train_rows, test_rows) = split(sanitized.records, 0.2, DEFAULT_SEED).unwrap();
    assert_eq!(test_rows.len(), 24);
    assert_eq!(train_rows.len(), 96);

    let pipeline = train(&train_rows, &FEATURES, &TrainerConfig::default()).unwrap();
    let metrics = evaluate(&pipeline, &test_rows).unwrap();

    assert!(metrics.mean_absolute_error.is_finite());
    assert!(metrics.root_mean_squared_error >= 0.0);
    let r2 = metrics.r_squared.unwrap();
    assert!(r2 <= 1.0);
    assert!(r2 > 0.99, "linear data should fit well, got R² = {r2}");

    // Persist and reload.
    let store = ModelStore::new(dir.path().join("model"));
    store.save(&pipeline).unwrap();
    let reloaded = store.load().unwrap();

    // Identical predictions before and after the save/load cycle.
    let before = predict_records(&pipeline, &test_rows);
    let after = predict_records(&reloaded, &test_rows);
    for (a, b) in before.iter().zip(&after) {
        assert!((a.predicted_close - b.predicted_close).abs() < 1e-9);
    }
}

#[test]
fn rows_with_missing_values_are_dropped_before_training() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = write_sample_csv(dir.path(), 60, Some(10));

    let records = load_csv(&csv_path).unwrap();
    assert_eq!(records.len(), 60);

    let sanitized = sanitize(records, &training_required());
    assert_eq!(sanitized.dropped, 6);
    assert!(sanitized
        .records
        .iter()
        .all(|r| !r.volume.is_nan()));
}

#[test]
fn retraining_on_identical_input_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = write_sample_csv(dir.path(), 80, None);

    let run = || {
        let records = load_csv(&csv_path).unwrap();
        let sanitized = sanitize(records, &training_required());
        let (train_rows, _) = split(sanitized.records, 0.25, 11).unwrap();
        train(&train_rows, &FEATURES, &TrainerConfig::default()).unwrap()
    };

    let first = run();
    let second = run();
    assert_eq!(first.weights(), second.weights());
    assert_eq!(first.bias(), second.bias());
    assert_eq!(
        first.provenance().dataset_fingerprint,
        second.provenance().dataset_fingerprint
    );
}

#[test]
fn four_row_scenario_fits_and_extrapolates() {
    // The reference scenario: four similarly-shaped daily rows.
    let base = NaiveDate::from_ymd_opt(2021, 5, 3).unwrap();
    let mk = |day: i64, open: f64, high: f64, low: f64, adj: f64, vol: f64, close: f64| StockRecord {
        date: base + chrono::Duration::days(day),
        open,
        high,
        low,
        close,
        adj_close: adj,
        volume: vol,
    };
    let rows = vec![
        mk(0, 25.70, 25.78, 25.43, 21.73, 17_841_800.0, 25.45),
        mk(1, 25.50, 25.91, 25.44, 22.06, 21_888_100.0, 25.84),
        mk(2, 25.81, 26.05, 25.63, 22.19, 19_112_400.0, 25.99),
        mk(3, 26.00, 26.10, 25.71, 21.95, 16_404_700.0, 25.71),
    ];

    let (train_rows, test_rows) = rows.split_at(3);
    let pipeline = train(train_rows, &FEATURES, &TrainerConfig::default()).unwrap();
    let metrics = evaluate(&pipeline, test_rows).unwrap();

    // Single constant test row: error metrics finite, R² undefined.
    assert!(metrics.mean_absolute_error.is_finite());
    assert!(metrics.mean_squared_error.is_finite());
    if let Some(r2) = metrics.r_squared {
        assert!(r2 <= 1.0);
    }

    // Out-of-range row (zero adjusted close and volume) still scores.
    let outlier = mk(10, 25.70, 25.78, 25.43, 0.0, 0.0, f64::NAN);
    let results = predict_records(&pipeline, &[outlier]);
    assert!(results[0].predicted_close.is_finite());
    assert_eq!(results[0].actual_close, None);
}

#[test]
fn saving_twice_leaves_a_single_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = write_sample_csv(dir.path(), 40, None);

    let records = load_csv(&csv_path).unwrap();
    let sanitized = sanitize(records, &training_required());
    let (train_rows, _) = split(sanitized.records, 0.2, DEFAULT_SEED).unwrap();
    let pipeline = train(&train_rows, &FEATURES, &TrainerConfig::default()).unwrap();

    let model_dir = dir.path().join("model");
    let store = ModelStore::new(&model_dir);
    store.save(&pipeline).unwrap();
    store.save(&pipeline).unwrap();

    let json_files = std::fs::read_dir(&model_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("json"))
        .count();
    assert_eq!(json_files, 1);
}
