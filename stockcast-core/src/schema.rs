//! StockRecord — the fundamental input unit — and the typed column projection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One trading day's observation for a single equity.
///
/// All numeric columns are `f64` so a missing input field can be carried as
/// NaN until the sanitation pass drops the row. Records are immutable once
/// parsed; the pipeline only reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRecord {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: f64,
}

impl StockRecord {
    /// Returns true if any of `columns` is NaN for this record.
    pub fn has_missing(&self, columns: &[Column]) -> bool {
        columns.iter().any(|c| c.value(self).is_nan())
    }
}

/// Numeric columns of a [`StockRecord`], in file order.
///
/// The feature column list fed to the trainer is built from these; `Close`
/// is the regression target and is projected out separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Open,
    High,
    Low,
    Close,
    AdjClose,
    Volume,
}

impl Column {
    /// Project this column's value out of a record.
    pub fn value(&self, record: &StockRecord) -> f64 {
        match self {
            Column::Open => record.open,
            Column::High => record.high,
            Column::Low => record.low,
            Column::Close => record.close,
            Column::AdjClose => record.adj_close,
            Column::Volume => record.volume,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Column::Open => "open",
            Column::High => "high",
            Column::Low => "low",
            Column::Close => "close",
            Column::AdjClose => "adj_close",
            Column::Volume => "volume",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown column '{0}' (expected one of: open, high, low, close, adj_close, volume)")]
pub struct UnknownColumn(pub String);

impl FromStr for Column {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "open" => Ok(Column::Open),
            "high" => Ok(Column::High),
            "low" => Ok(Column::Low),
            "close" => Ok(Column::Close),
            "adj_close" => Ok(Column::AdjClose),
            "volume" => Ok(Column::Volume),
            other => Err(UnknownColumn(other.to_string())),
        }
    }
}

/// Feature set of the reference training run. Overridable via settings;
/// `Close` never appears here because it is the target.
pub const DEFAULT_FEATURE_COLUMNS: [Column; 5] = [
    Column::Open,
    Column::High,
    Column::Low,
    Column::AdjClose,
    Column::Volume,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> StockRecord {
        StockRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 25.70,
            high: 25.78,
            low: 25.43,
            close: 25.45,
            adj_close: 21.73,
            volume: 17_841_800.0,
        }
    }

    #[test]
    fn column_projects_matching_field() {
        let record = sample_record();
        assert_eq!(Column::Open.value(&record), 25.70);
        assert_eq!(Column::Close.value(&record), 25.45);
        assert_eq!(Column::AdjClose.value(&record), 21.73);
        assert_eq!(Column::Volume.value(&record), 17_841_800.0);
    }

    #[test]
    fn has_missing_detects_nan_in_required_columns() {
        let mut record = sample_record();
        assert!(!record.has_missing(&[Column::Open, Column::Volume]));

        record.volume = f64::NAN;
        assert!(record.has_missing(&[Column::Open, Column::Volume]));
        assert!(!record.has_missing(&[Column::Open, Column::High]));
    }

    #[test]
    fn column_parse_display_roundtrip() {
        for column in [
            Column::Open,
            Column::High,
            Column::Low,
            Column::Close,
            Column::AdjClose,
            Column::Volume,
        ] {
            let parsed: Column = column.to_string().parse().unwrap();
            assert_eq!(parsed, column);
        }
    }

    #[test]
    fn column_parse_rejects_unknown() {
        let err = "adjusted".parse::<Column>().unwrap_err();
        assert!(err.to_string().contains("adjusted"));
    }

    #[test]
    fn record_serialization_roundtrip() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();
        let deser: StockRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record.date, deser.date);
        assert_eq!(record.close, deser.close);
        assert_eq!(record.volume, deser.volume);
    }

    #[test]
    fn default_features_exclude_the_target() {
        assert!(!DEFAULT_FEATURE_COLUMNS.contains(&Column::Close));
        assert_eq!(DEFAULT_FEATURE_COLUMNS.len(), 5);
    }
}
