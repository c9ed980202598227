//! Stockcast CLI — train a close-price model from daily OHLCV data and run
//! batch predictions with the stored model.
//!
//! Commands:
//! - `train` — load a CSV, sanitize, split, fit, evaluate, persist
//! - `predict` — reload the stored model and score new rows

mod report;
mod settings;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use stockcast_core::data::{load_csv, sanitize, split};
use stockcast_core::schema::Column;
use stockcast_core::{evaluate, predict_records, train, ModelStore};

use crate::settings::TrainSettings;

#[derive(Parser)]
#[command(
    name = "stockcast",
    about = "Stockcast CLI — close-price regression over daily OHLCV data"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a model from a CSV of daily records and persist it.
    Train {
        /// Input CSV: date,open,high,low,close,adj_close,volume with header.
        #[arg(long)]
        data: PathBuf,

        /// Directory for the model artifact.
        #[arg(long, default_value = "model")]
        model_dir: PathBuf,

        /// Optional TOML settings file.
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Held-out fraction in (0, 1). Overrides the settings file.
        #[arg(long)]
        test_fraction: Option<f64>,

        /// Split seed. Overrides the settings file.
        #[arg(long)]
        seed: Option<u64>,

        /// Comma-separated feature columns (e.g. open,high,low,adj_close,volume).
        #[arg(long, value_delimiter = ',')]
        features: Option<Vec<Column>>,

        /// L2 penalty on the regression weights. Overrides the settings file.
        #[arg(long)]
        l2: Option<f64>,
    },
    /// Score rows from a CSV with the stored model.
    Predict {
        /// Input CSV of rows to score. The close column may be empty.
        #[arg(long)]
        data: PathBuf,

        /// Directory holding the model artifact.
        #[arg(long, default_value = "model")]
        model_dir: PathBuf,

        /// Print at most this many rows.
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            data,
            model_dir,
            settings,
            test_fraction,
            seed,
            features,
            l2,
        } => run_train(data, model_dir, settings, test_fraction, seed, features, l2),
        Commands::Predict {
            data,
            model_dir,
            limit,
        } => run_predict(data, model_dir, limit),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_train(
    data: PathBuf,
    model_dir: PathBuf,
    settings_file: Option<PathBuf>,
    test_fraction: Option<f64>,
    seed: Option<u64>,
    features: Option<Vec<Column>>,
    l2: Option<f64>,
) -> Result<()> {
    let mut settings = match settings_file {
        Some(path) => TrainSettings::from_file(&path)?,
        None => TrainSettings::default(),
    };
    if let Some(fraction) = test_fraction {
        settings.test_fraction = fraction;
    }
    if let Some(seed) = seed {
        settings.seed = seed;
    }
    if let Some(features) = features {
        settings.features = features;
    }
    if let Some(l2) = l2 {
        settings.l2_penalty = l2;
    }

    let records = load_csv(&data).context("loading training data")?;
    println!("Loaded {} rows from {}", records.len(), data.display());

    // Training needs the target too, so close joins the required set.
    let mut required = settings.features.clone();
    if !required.contains(&Column::Close) {
        required.push(Column::Close);
    }
    let sanitized = sanitize(records, &required);
    if sanitized.dropped > 0 {
        println!("Dropped {} rows with missing values", sanitized.dropped);
    }

    let (train_rows, test_rows) =
        split(sanitized.records, settings.test_fraction, settings.seed)?;
    println!(
        "Split: {} train rows, {} test rows (test fraction {})",
        train_rows.len(),
        test_rows.len(),
        settings.test_fraction
    );

    let pipeline = train(&train_rows, &settings.features, &settings.trainer_config())?;
    let metrics = evaluate(&pipeline, &test_rows)?;
    print!("{}", report::metrics_report(&metrics));

    let store = ModelStore::new(&model_dir);
    let path = store.save(&pipeline)?;
    println!("Model saved to {}", path.display());

    Ok(())
}

fn run_predict(data: PathBuf, model_dir: PathBuf, limit: Option<usize>) -> Result<()> {
    let store = ModelStore::new(&model_dir);
    let pipeline = store.load().context("loading model artifact")?;

    let records = load_csv(&data).context("loading prediction rows")?;
    let sanitized = sanitize(records, pipeline.feature_columns());
    if sanitized.records.is_empty() {
        bail!("no usable rows: every input row is missing a feature value");
    }
    if sanitized.dropped > 0 {
        eprintln!(
            "WARNING: skipped {} rows with missing feature values",
            sanitized.dropped
        );
    }

    let mut results = predict_records(&pipeline, &sanitized.records);
    if let Some(limit) = limit {
        results.truncate(limit);
    }
    print!("{}", report::prediction_report(&results));

    Ok(())
}
