//! Row field resolution for segmented statement chunks.
//!
//! A chunk is a date followed by everything up to the next date. After the
//! date is stripped, the last two numbers are read as amount and running
//! balance; the words left over form the description.

use regex::{Captures, Regex};
use tally_core::{Kind, Plausibility, Result, StatementConfig, ROW_PLACEHOLDER};
use tracing::debug;

use crate::parsers::segmenter::StatementDates;
use crate::types::{RowChunk, StatementRow};

#[derive(Debug, Clone)]
pub struct RowResolver {
    range: Plausibility,
    credit_keywords: Vec<String>,
    boilerplate: Vec<String>,
    header_sets: Vec<Vec<String>>,
    footer_markers: Vec<String>,
    min_description_len: usize,
    stopwords: Option<Regex>,
    dates: StatementDates,
    /// `1.200` / `12.345.678`: dots used as thousands separators
    thousands_dot: Regex,
    number: Regex,
    currency: Regex,
}

impl RowResolver {
    pub fn new(config: &StatementConfig) -> Result<Self> {
        let stop: Vec<String> = lowered(&config.stopwords)
            .iter()
            .map(|w| regex::escape(w))
            .collect();
        let stopwords = if stop.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(r"(?i)\b(?:{})\b", stop.join("|")))?)
        };

        Ok(Self {
            range: config.amount_range,
            credit_keywords: lowered(&config.credit_keywords),
            boilerplate: lowered(&config.boilerplate),
            header_sets: config
                .header_sets
                .iter()
                .map(|set| lowered(set))
                .filter(|set| !set.is_empty())
                .collect(),
            footer_markers: lowered(&config.footer_markers),
            min_description_len: config.min_description_len,
            stopwords,
            dates: StatementDates::new()?,
            thousands_dot: Regex::new(r"\b\d{1,3}(?:\.\d{3})+\b")?,
            number: Regex::new(r"\b\d+(?:\.\d{1,2})?\b")?,
            currency: Regex::new(r"[₹$€£]|\b(?i:rs|inr)\b\.?")?,
        })
    }

    pub fn range(&self) -> Plausibility {
        self.range
    }

    /// Resolve one chunk into a row, or `None` when the chunk is not a
    /// transaction (metadata, header, too few numbers, implausible amount).
    pub fn resolve(&self, chunk: &RowChunk<'_>) -> Option<StatementRow> {
        let text = self.truncate_footer(chunk.text);

        // labels printed before the date ("Statement Date: ...") count too
        let first_line = text.lines().next().unwrap_or("");
        let source_line = format!("{}{}", chunk.line_prefix, first_line);
        if self.is_boilerplate_line(&source_line) {
            debug!(offset = chunk.offset, "statement chunk is boilerplate");
            return None;
        }

        let body = text.get(chunk.date_len..).unwrap_or("");
        let body = body
            .lines()
            .enumerate()
            .filter(|(i, line)| *i == 0 || !self.is_boilerplate_line(line))
            .map(|(_, line)| line)
            .collect::<Vec<_>>()
            .join(" ");

        let undated = self.dates.strip(&body);
        let repaired = self.repair_thousands(&undated);

        let numbers = self.numbers(&repaired);
        if numbers.len() < 2 {
            debug!(offset = chunk.offset, numbers = numbers.len(), "statement chunk has too few numbers");
            return None;
        }
        let amount = numbers[numbers.len() - 2];
        let balance = numbers[numbers.len() - 1];

        if !self.range.contains(amount) || amount == balance {
            debug!(offset = chunk.offset, amount, balance, "statement chunk amount rejected");
            return None;
        }

        Some(StatementRow {
            date: chunk.date,
            description: self.describe(&repaired),
            amount,
            balance: Some(balance),
            kind: self.kind_of(&undated),
        })
    }

    /// `text` up to (not including) the first footer marker.
    pub fn truncate_footer<'a>(&self, text: &'a str) -> &'a str {
        // ASCII lowercasing keeps byte offsets aligned with `text`.
        let lower = text.to_ascii_lowercase();
        let cut = self
            .footer_markers
            .iter()
            .filter_map(|marker| lower.find(marker.as_str()))
            .min();

        match cut {
            Some(idx) => &text[..idx],
            None => text,
        }
    }

    /// Statement metadata or a column header line.
    pub fn is_boilerplate_line(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        if self.boilerplate.iter().any(|b| lower.contains(b.as_str())) {
            return true;
        }

        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        self.header_sets
            .iter()
            .any(|set| set.iter().all(|h| words.contains(&h.as_str())))
    }

    pub fn kind_of(&self, text: &str) -> Kind {
        if self.is_credit(text) {
            Kind::Credit
        } else {
            Kind::Debit
        }
    }

    pub fn is_credit(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.credit_keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    /// Remove dots used as thousands separators.
    pub fn repair_thousands(&self, text: &str) -> String {
        self.thousands_dot
            .replace_all(text, |caps: &Captures| caps[0].replace('.', ""))
            .into_owned()
    }

    /// Numeric tokens in reading order.
    pub fn numbers(&self, text: &str) -> Vec<f64> {
        self.number
            .find_iter(text)
            .filter_map(|m| m.as_str().parse::<f64>().ok())
            .collect()
    }

    /// Description left after dates, numbers, currency marks and column
    /// words are removed.
    pub fn describe(&self, text: &str) -> String {
        let text = self.dates.strip(text);
        let text = self.number.replace_all(&text, " ");
        let text = self.currency.replace_all(&text, " ");
        let text = match &self.stopwords {
            Some(re) => re.replace_all(&text, " ").into_owned(),
            None => text.into_owned(),
        };

        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let trimmed = collapsed.trim_matches(|c: char| {
            c.is_whitespace() || matches!(c, '-' | '/' | '|' | ':' | ',' | '.' | ';' | '*' | '#')
        });

        if trimmed.chars().count() < self.min_description_len {
            ROW_PLACEHOLDER.to_string()
        } else {
            trimmed.to_string()
        }
    }
}

fn lowered(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::segmenter::RowSegmenter;
    use chrono::{TimeZone, Utc};
    use tally_core::NormalizeConfig;

    fn resolver() -> RowResolver {
        RowResolver::new(&StatementConfig::default()).unwrap()
    }

    fn resolve_all(raw: &str) -> Vec<StatementRow> {
        let segmenter = RowSegmenter::new(&NormalizeConfig::default()).unwrap();
        let prepared = segmenter.prepare(raw);
        let resolver = resolver();
        segmenter
            .segment(&prepared)
            .iter()
            .filter_map(|c| resolver.resolve(c))
            .collect()
    }

    #[test]
    fn test_amount_and_balance_are_last_two_numbers() {
        let rows = resolve_all("03-01-2026 Grocery Store 1200 45000\n04-01-2026 Salary Credit 50000 95000");
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].date, Utc.with_ymd_and_hms(2026, 1, 3, 0, 0, 0).unwrap());
        assert_eq!(rows[0].description, "Grocery Store");
        assert_eq!(rows[0].amount, 1200.0);
        assert_eq!(rows[0].balance, Some(45000.0));
        assert_eq!(rows[0].kind, Kind::Debit);

        assert_eq!(rows[1].amount, 50000.0);
        assert_eq!(rows[1].kind, Kind::Credit);
        assert_eq!(rows[1].description, "Salary");
    }

    #[test]
    fn test_thousands_dots_repaired() {
        let rows = resolve_all("05/01/2026 Rent Transfer 15.000 30.000,50");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 15000.0);
        assert_eq!(rows[0].balance, Some(30000.50));
    }

    #[test]
    fn test_multiline_description_and_inner_dates() {
        // an inner date opens its own chunk; the numberless head is dropped
        let rows = resolve_all("06-01-2026 UPI Swiggy\nOrder ref 06/01/26 paid 350 11650");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "paid");

        let rows = resolve_all("06-01-2026 UPI Swiggy\nFood order 350.50 11650");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "UPI Swiggy Food order");
        assert_eq!(rows[0].amount, 350.50);
    }

    #[test]
    fn test_boilerplate_chunks_rejected() {
        let raw = "01-01-2026 Opening Balance 46200\n02-01-2026 Date Description Debit Credit Balance\n03-01-2026 Tea Stall 40 46160";
        let rows = resolve_all(raw);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Tea Stall");
    }

    #[test]
    fn test_metadata_label_before_date_rejected() {
        let rows = resolve_all("Statement Date: 31-01-2026 Page 1 of 2\n03-01-2026 Grocery Store 1200 45000");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Grocery Store");
        assert_eq!(rows[0].amount, 1200.0);
    }

    #[test]
    fn test_same_line_rows_keep_their_own_boilerplate_check() {
        let rows = resolve_all("01-01-2026 Opening Balance 46200 02-01-2026 Tea Stall 40 46160");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Tea Stall");
    }

    #[test]
    fn test_boilerplate_line_inside_chunk_dropped() {
        let raw = "03-01-2026 Metro Card 200 9800\nClosing Balance 9800";
        let rows = resolve_all(raw);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 200.0);
        assert_eq!(rows[0].balance, Some(9800.0));
    }

    #[test]
    fn test_footer_truncates_chunk() {
        let raw = "03-01-2026 Cinema 450 9550\nThis is a system generated statement 1 2";
        let rows = resolve_all(raw);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 450.0);
        assert_eq!(rows[0].description, "Cinema");
    }

    #[test]
    fn test_rejects_single_number_and_equal_balance() {
        assert!(resolve_all("03-01-2026 Coffee 250").is_empty());
        assert!(resolve_all("03-01-2026 Adjustment 500 500").is_empty());
        assert!(resolve_all("03-01-2026 Huge 6000000 7000000").is_empty());
    }

    #[test]
    fn test_description_placeholder() {
        let rows = resolve_all("03-01-2026 Dr 75 925");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, ROW_PLACEHOLDER);
    }

    #[test]
    fn test_describe_strips_columns_and_punctuation() {
        let r = resolver();
        assert_eq!(r.describe("- ATM Withdrawal DR Rs. 500 -"), "ATM Withdrawal");
        assert_eq!(r.describe("  NEFT / Payment Received / "), "NEFT / Payment Received");
    }

    #[test]
    fn test_truncate_footer_is_case_insensitive() {
        let r = resolver();
        assert_eq!(r.truncate_footer("row 1\nCOMPUTER GENERATED copy"), "row 1\n");
        assert_eq!(r.truncate_footer("no footer"), "no footer");
    }

    #[test]
    fn test_credit_keywords() {
        let r = resolver();
        assert!(r.is_credit("Interest paid"));
        assert!(r.is_credit("AMAZON REFUND"));
        assert!(!r.is_credit("Amazon order"));
    }
}
