//! Merchant name guess for receipts.
//!
//! Merchant names are almost always the first "mostly letters" line once
//! header boilerplate (tax invoice, GSTIN, phone, ...) is skipped.

use tally_core::{ReceiptConfig, RECEIPT_PLACEHOLDER};

#[derive(Debug, Clone)]
pub struct NameExtractor {
    scan_lines: usize,
    boilerplate: Vec<String>,
}

impl NameExtractor {
    pub fn new(config: &ReceiptConfig) -> Self {
        Self {
            scan_lines: config.name_scan_lines,
            boilerplate: config
                .name_boilerplate
                .iter()
                .map(|b| b.trim().to_lowercase())
                .filter(|b| !b.is_empty())
                .collect(),
        }
    }

    /// First qualifying line of the raw text, or the receipt placeholder.
    pub fn extract(&self, text: &str) -> String {
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .take(self.scan_lines)
            .find(|l| self.qualifies(l))
            .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
            .unwrap_or_else(|| RECEIPT_PLACEHOLDER.to_string())
    }

    fn qualifies(&self, line: &str) -> bool {
        let low = line.to_lowercase();
        if self.boilerplate.iter().any(|b| low.contains(b.as_str())) {
            return false;
        }

        let letters = line.chars().filter(|c| c.is_ascii_alphabetic()).count();
        let digits = line.chars().filter(|c| c.is_ascii_digit()).count();
        letters >= 4 && digits <= 3 && line.chars().count() >= 4
    }
}
