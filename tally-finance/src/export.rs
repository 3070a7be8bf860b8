//! CSV and JSON record interchange.

use std::io::{Read, Write};

use serde::Serialize;
use tally_core::time::to_rfc3339_utc;
use tally_core::{Kind, ReceiptExtract, Result, TransactionRecord};

#[derive(Serialize)]
struct CsvRow<'a> {
    date: String,
    description: &'a str,
    amount: String,
    category: &'static str,
    kind: &'static str,
}

/// Write records as CSV with a header row. Missing dates are empty cells.
pub fn write_csv<W: Write>(records: &[TransactionRecord], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(CsvRow {
            date: record.date.map(to_rfc3339_utc).unwrap_or_default(),
            description: &record.description,
            amount: format!("{:.2}", record.amount),
            category: record.category.as_str(),
            kind: record.kind.as_str(),
        })
        .map_err(std::io::Error::from)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write one receipt extract as CSV; an unknown total is an empty cell.
pub fn write_receipt_csv<W: Write>(extract: &ReceiptExtract, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.serialize(CsvRow {
        date: extract.date.map(to_rfc3339_utc).unwrap_or_default(),
        description: &extract.description,
        amount: extract.amount.map(|a| format!("{a:.2}")).unwrap_or_default(),
        category: extract.category.as_str(),
        kind: Kind::Debit.as_str(),
    })
    .map_err(std::io::Error::from)?;
    wtr.flush()?;
    Ok(())
}

/// Read a JSON array of records, as written by the `--format json` output.
pub fn read_json<R: Read>(reader: R) -> Result<Vec<TransactionRecord>> {
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tally_core::{Category, Kind};

    #[test]
    fn test_csv_layout() {
        let records = vec![
            TransactionRecord::new(
                "Grocery Store",
                1200.0,
                Some(Utc.with_ymd_and_hms(2026, 1, 3, 0, 0, 0).unwrap()),
                Category::Groceries,
                Kind::Debit,
            ),
            TransactionRecord::new("Tea, Snacks", 45.5, None, Category::Food, Kind::Debit),
        ];

        let mut out = Vec::new();
        write_csv(&records, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "date,description,amount,category,kind\n\
             2026-01-03T00:00:00Z,Grocery Store,1200.00,groceries,debit\n\
             ,\"Tea, Snacks\",45.50,food,debit\n"
        );
    }

    #[test]
    fn test_receipt_without_total() {
        let extract = ReceiptExtract {
            description: "Expense".to_string(),
            amount: None,
            date: None,
            category: Category::Other,
        };
        let mut out = Vec::new();
        write_receipt_csv(&extract, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "date,description,amount,category,kind\n,Expense,,other,debit\n"
        );
    }

    #[test]
    fn test_read_json_records() {
        let json = r#"[{"description":"Cab","amount":180.0,"date":"2026-01-02T00:00:00Z","category":"travel","kind":"debit"}]"#;
        let records = read_json(json.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, Category::Travel);
    }
}
