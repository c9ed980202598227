//! Console report formatting — pure string builders, printed by main.

use stockcast_core::{PredictionResult, RegressionMetrics};

/// Metrics banner printed after evaluation.
pub fn metrics_report(metrics: &RegressionMetrics) -> String {
    let mut out = String::with_capacity(512);

    out.push_str("-------------------- Metrics --------------------\n");
    out.push_str(&format!(
        "Mean Absolute Error:      {:.6}\n",
        metrics.mean_absolute_error
    ));
    out.push_str(&format!(
        "Mean Squared Error:       {:.6}\n",
        metrics.mean_squared_error
    ));
    out.push_str(&format!(
        "Root Mean Squared Error:  {:.6}\n",
        metrics.root_mean_squared_error
    ));
    match metrics.r_squared {
        Some(r2) => out.push_str(&format!("R Squared:                {r2:.6}\n")),
        None => out.push_str("R Squared:                undefined (constant test closes)\n"),
    }
    out.push_str(&format!(
        "Test rows:                {}\n",
        metrics.sample_count
    ));
    out.push_str("--------------------------------------------------\n");

    out
}

/// Predicted/actual/difference table for a batch prediction run.
pub fn prediction_report(results: &[PredictionResult]) -> String {
    let mut out = String::with_capacity(64 * (results.len() + 1));

    out.push_str("date         predicted      actual        diff\n");
    for result in results {
        match (result.actual_close, result.difference()) {
            (Some(actual), Some(diff)) => out.push_str(&format!(
                "{}  {:>10.4}  {:>10.4}  {:>+10.4}\n",
                result.date, result.predicted_close, actual, diff
            )),
            _ => out.push_str(&format!(
                "{}  {:>10.4}           -           -\n",
                result.date, result.predicted_close
            )),
        }
    }

    out
}
