//! Debit/credit resolution and deduplication of statement output.

use std::collections::HashSet;

use tally_core::{CategoryRules, Kind, TransactionRecord};
use tally_ingest::StatementRow;
use tracing::debug;

/// Keep debit rows and turn them into categorized records.
pub fn debit_records(rows: Vec<StatementRow>, categories: &CategoryRules) -> Vec<TransactionRecord> {
    rows.into_iter()
        .filter(|row| row.kind == Kind::Debit)
        .map(|row| {
            let category = categories.classify(&row.description);
            TransactionRecord::new(row.description, row.amount, Some(row.date), category, Kind::Debit)
        })
        .collect()
}

/// Drop records repeated on `(date, cents, description)`; first occurrence
/// wins and order is kept.
pub fn dedupe(records: Vec<TransactionRecord>) -> Vec<TransactionRecord> {
    let before = records.len();
    let mut seen = HashSet::new();

    let kept: Vec<TransactionRecord> = records
        .into_iter()
        .filter(|record| seen.insert(record.dedup_key()))
        .collect();

    if kept.len() < before {
        debug!(dropped = before - kept.len(), "duplicate records dropped");
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tally_core::Category;

    fn row(description: &str, amount: f64, kind: Kind) -> StatementRow {
        StatementRow {
            date: Utc.with_ymd_and_hms(2026, 1, 3, 0, 0, 0).unwrap(),
            description: description.to_string(),
            amount,
            balance: None,
            kind,
        }
    }

    #[test]
    fn test_credits_are_excluded() {
        let rows = vec![
            row("Grocery Store", 1200.0, Kind::Debit),
            row("Salary", 50000.0, Kind::Credit),
        ];
        let records = debit_records(rows, &CategoryRules::standard().unwrap());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, Category::Groceries);
        assert!(records[0].is_debit());
    }

    #[test]
    fn test_same_row_twice_is_one_record() {
        let rows = vec![
            row("Metro Card", 200.0, Kind::Debit),
            row("Cafe", 80.0, Kind::Debit),
            row("Metro Card", 200.0, Kind::Debit),
        ];
        let records = dedupe(debit_records(rows, &CategoryRules::standard().unwrap()));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].description, "Metro Card");
        assert_eq!(records[1].description, "Cafe");
    }

    #[test]
    fn test_different_amounts_are_kept() {
        let records = vec![
            TransactionRecord::new("ATM", 500.0, None, Category::Other, Kind::Debit),
            TransactionRecord::new("ATM", 500.5, None, Category::Other, Kind::Debit),
        ];
        assert_eq!(dedupe(records).len(), 2);
    }
}
