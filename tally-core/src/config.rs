//! Engine configuration: keyword lists, plausibility ranges and rule sets.
//!
//! Everything the extractors match against lives here as plain data so rule
//! sets can be overridden from a config file and unit-tested in isolation.
//! Every section is `#[serde(default)]`, so a partial TOML table only replaces
//! the keys it names.

use serde::{Deserialize, Serialize};

use crate::categorizer::CategoryRule;
use crate::error::{Error, Result};

/// Numeric bounds used to reject OCR noise masquerading as money.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Plausibility {
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub inclusive_min: bool,
    #[serde(default)]
    pub inclusive_max: bool,
}

impl Plausibility {
    /// `0 < n < 1,000,000`
    pub const RECEIPT: Plausibility = Plausibility {
        min: 0.0,
        max: 1_000_000.0,
        inclusive_min: false,
        inclusive_max: false,
    };

    /// `10 <= n < 1,000,000`; keeps item counts out of the whole-text scan.
    pub const RECEIPT_FALLBACK: Plausibility = Plausibility {
        min: 10.0,
        max: 1_000_000.0,
        inclusive_min: true,
        inclusive_max: false,
    };

    /// `0 < n <= 5,000,000`
    pub const STATEMENT: Plausibility = Plausibility {
        min: 0.0,
        max: 5_000_000.0,
        inclusive_min: false,
        inclusive_max: true,
    };

    pub fn contains(&self, n: f64) -> bool {
        if !n.is_finite() {
            return false;
        }
        let above = if self.inclusive_min { n >= self.min } else { n > self.min };
        let below = if self.inclusive_max { n <= self.max } else { n < self.max };
        above && below
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min >= self.max {
            return Err(Error::Config(format!(
                "{name}: range [{}, {}] is empty",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Digit runs at least this long are account/GSTIN/phone numbers, not money.
    pub long_digit_run: usize,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self { long_digit_run: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReceiptConfig {
    /// Total-indicating keywords, most specific first.
    pub total_keywords: Vec<String>,
    /// Lines after a keyword line that join its search window.
    pub window_lines: usize,
    pub amount_range: Plausibility,
    pub fallback_range: Plausibility,
    /// Leading non-blank lines considered for the merchant name.
    pub name_scan_lines: usize,
    /// Header/footer tokens that disqualify a line as merchant name.
    pub name_boilerplate: Vec<String>,
    /// Labels that anchor the preferred date ("invoice date: 05/01/2026").
    pub date_labels: Vec<String>,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            total_keywords: strings(&[
                "net payable",
                "amount payable",
                "grand total",
                "total amount",
                "total",
                "balance due",
                "amount due",
                "payable",
                "subtotal",
                "sub total",
            ]),
            window_lines: 2,
            amount_range: Plausibility::RECEIPT,
            fallback_range: Plausibility::RECEIPT_FALLBACK,
            name_scan_lines: 12,
            name_boilerplate: strings(&[
                "tax invoice",
                "invoice",
                "cash memo",
                "bill",
                "gstin",
                "phone",
                "mobile",
                "total",
                "subtotal",
                "amount",
                "date",
            ]),
            date_labels: strings(&["bill date", "invoice date", "date"]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StatementConfig {
    pub amount_range: Plausibility,
    /// Substrings marking money received rather than spent.
    pub credit_keywords: Vec<String>,
    /// A line containing any of these is statement metadata, not a row.
    pub boilerplate: Vec<String>,
    /// A line containing every word of any set is a column header.
    pub header_sets: Vec<Vec<String>>,
    /// Text from the first footer marker on is discarded.
    pub footer_markers: Vec<String>,
    /// Column words removed from descriptions.
    pub stopwords: Vec<String>,
    /// Descriptions shorter than this fall back to the row placeholder.
    pub min_description_len: usize,
}

impl Default for StatementConfig {
    fn default() -> Self {
        Self {
            amount_range: Plausibility::STATEMENT,
            credit_keywords: strings(&[
                "salary",
                "credit",
                "refund",
                "reversal",
                "cashback",
                "interest",
                "received",
                "deposit",
                "freelance",
                "payment received",
            ]),
            boilerplate: strings(&[
                "account holder",
                "account number",
                "statement date",
                "statement period",
                "opening balance",
                "closing balance",
            ]),
            header_sets: vec![
                strings(&["date", "description", "debit"]),
                strings(&["debit", "credit", "balance"]),
            ],
            footer_markers: strings(&["this is a system generated", "computer generated"]),
            stopwords: strings(&["debit", "credit", "dr", "cr", "balance"]),
            min_description_len: 3,
        }
    }
}

/// Complete rule set for one engine instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub normalize: NormalizeConfig,
    pub receipt: ReceiptConfig,
    pub statement: StatementConfig,
    /// Ordered category rules; first match wins.
    pub categories: Vec<CategoryRule>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            normalize: NormalizeConfig::default(),
            receipt: ReceiptConfig::default(),
            statement: StatementConfig::default(),
            categories: CategoryRule::standard(),
        }
    }
}

impl EngineConfig {
    /// Reject configurations that would silently disable an extractor.
    pub fn validate(&self) -> Result<()> {
        self.receipt.amount_range.validate("receipt.amount_range")?;
        self.receipt.fallback_range.validate("receipt.fallback_range")?;
        self.statement.amount_range.validate("statement.amount_range")?;

        if self.normalize.long_digit_run < 2 {
            return Err(Error::Config(
                "normalize.long_digit_run must be at least 2".to_string(),
            ));
        }
        if self.receipt.total_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(Error::Config("receipt.total_keywords is empty".to_string()));
        }
        for rule in &self.categories {
            if rule.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(Error::Config(format!(
                    "category rule '{}' has no keywords",
                    rule.category
                )));
            }
        }
        Ok(())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
