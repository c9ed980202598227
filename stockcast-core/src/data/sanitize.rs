//! Missing-value sanitation.
//!
//! Rows that survive keep their original relative order; nothing is ever
//! imputed. Which columns are required is the caller's decision: training
//! includes the target, batch prediction does not.

use crate::schema::{Column, StockRecord};

/// Outcome of a sanitation pass.
#[derive(Debug, Clone)]
pub struct Sanitized {
    /// Surviving records, in input order.
    pub records: Vec<StockRecord>,
    /// How many rows were removed.
    pub dropped: usize,
}

/// Drop every record with a NaN in any of `required`.
pub fn sanitize(records: Vec<StockRecord>, required: &[Column]) -> Sanitized {
    let before = records.len();
    let records: Vec<StockRecord> = records
        .into_iter()
        .filter(|record| !record.has_missing(required))
        .collect();
    let dropped = before - records.len();
    Sanitized { records, dropped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(day: u32, open: f64, volume: f64) -> StockRecord {
        StockRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open,
            high: open + 1.0,
            low: open - 1.0,
            close: open + 0.5,
            adj_close: open + 0.5,
            volume,
        }
    }

    #[test]
    fn drops_rows_missing_required_columns() {
        let records = vec![
            record(2, 100.0, 1000.0),
            record(3, f64::NAN, 1100.0),
            record(4, 102.0, f64::NAN),
            record(5, 103.0, 1300.0),
        ];

        let out = sanitize(records, &[Column::Open, Column::Volume]);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.dropped, 2);
        assert_eq!(out.records[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(out.records[1].date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn keeps_rows_missing_only_unrequired_columns() {
        let records = vec![record(2, 100.0, f64::NAN)];
        let out = sanitize(records, &[Column::Open, Column::High]);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.dropped, 0);
    }

    #[test]
    fn preserves_input_order() {
        let records = vec![
            record(2, 100.0, 1000.0),
            record(3, 101.0, 1100.0),
            record(4, 102.0, 1200.0),
        ];
        let out = sanitize(records, &[Column::Open]);
        let days: Vec<u32> = out
            .records
            .iter()
            .map(|r| chrono::Datelike::day(&r.date))
            .collect();
        assert_eq!(days, vec![2, 3, 4]);
    }

    #[test]
    fn empty_input_is_fine() {
        let out = sanitize(Vec::new(), &[Column::Open]);
        assert!(out.records.is_empty());
        assert_eq!(out.dropped, 0);
    }
}
