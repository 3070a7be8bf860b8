//! Record types produced by the receipt and statement paths

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder description for receipts with no usable merchant line.
pub const RECEIPT_PLACEHOLDER: &str = "Expense";

/// Placeholder description for statement rows with no usable text.
pub const ROW_PLACEHOLDER: &str = "Transaction";

/// Spending categories (closed set)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    #[serde(rename = "food")]
    Food,
    #[serde(rename = "medical")]
    Medical,
    #[serde(rename = "travel")]
    Travel,
    #[serde(rename = "groceries")]
    Groceries,
    #[serde(rename = "clothing")]
    Clothing,
    #[serde(rename = "shopping")]
    Shopping,
    #[default]
    #[serde(rename = "other")]
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Medical,
        Category::Travel,
        Category::Groceries,
        Category::Clothing,
        Category::Shopping,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Medical => "medical",
            Category::Travel => "travel",
            Category::Groceries => "groceries",
            Category::Clothing => "clothing",
            Category::Shopping => "shopping",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| crate::Error::InvalidInput(format!("unknown category: {s}")))
    }
}

/// Direction of money movement for a row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Kind {
    #[serde(rename = "debit")]
    Debit,
    #[serde(rename = "credit")]
    Credit,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Debit => "debit",
            Kind::Credit => "credit",
        }
    }
}

/// A structured transaction extracted from OCR text.
///
/// Pure value object; identity is assigned by whatever persists it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    /// Merchant or row description, never empty
    pub description: String,
    /// Plausibility-checked amount
    pub amount: f64,
    /// Calendar date at UTC midnight, if one was found
    pub date: Option<DateTime<Utc>>,
    pub category: Category,
    pub kind: Kind,
}

impl TransactionRecord {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        date: Option<DateTime<Utc>>,
        category: Category,
        kind: Kind,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            date,
            category,
            kind,
        }
    }

    pub fn is_debit(&self) -> bool {
        self.kind == Kind::Debit
    }

    /// Composite key used to drop rows duplicated by overlapping page scans.
    pub fn dedup_key(&self) -> (Option<DateTime<Utc>>, i64, String) {
        (
            self.date,
            (self.amount * 100.0).round() as i64,
            self.description.clone(),
        )
    }
}

/// Output of the receipt path. Amount and date may be unknown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReceiptExtract {
    pub description: String,
    pub amount: Option<f64>,
    pub date: Option<DateTime<Utc>>,
    pub category: Category,
}

impl ReceiptExtract {
    /// A receipt becomes a debit record only once its total is known.
    pub fn into_record(self) -> Option<TransactionRecord> {
        let amount = self.amount?;
        Some(TransactionRecord::new(
            self.description,
            amount,
            self.date,
            self.category,
            Kind::Debit,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_category_round_trips_through_str() {
        for c in Category::ALL {
            assert_eq!(c.as_str().parse::<Category>().unwrap(), c);
        }
        assert_eq!(" Groceries ".parse::<Category>().unwrap(), Category::Groceries);
        assert!("tuition".parse::<Category>().is_err());
    }

    #[test]
    fn test_record_serializes_lowercase() {
        let date = Utc.with_ymd_and_hms(2026, 1, 3, 0, 0, 0).unwrap();
        let record = TransactionRecord::new("Grocery Store", 1200.0, Some(date), Category::Groceries, Kind::Debit);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["category"], "groceries");
        assert_eq!(json["kind"], "debit");
        assert_eq!(json["date"], "2026-01-03T00:00:00Z");
    }

    #[test]
    fn test_receipt_without_amount_is_not_a_record() {
        let receipt = ReceiptExtract {
            description: "Cafe Mocha".to_string(),
            amount: None,
            date: None,
            category: Category::Food,
        };
        assert!(receipt.clone().into_record().is_none());

        let paid = ReceiptExtract { amount: Some(240.0), ..receipt };
        let record = paid.into_record().unwrap();
        assert!(record.is_debit());
        assert_eq!(record.amount, 240.0);
    }

    #[test]
    fn test_dedup_key_uses_cents() {
        let a = TransactionRecord::new("ATM", 500.001, None, Category::Other, Kind::Debit);
        let b = TransactionRecord::new("ATM", 500.0, None, Category::Other, Kind::Debit);
        assert_eq!(a.dedup_key(), b.dedup_key());
    }
}
