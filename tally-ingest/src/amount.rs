//! Receipt total extraction.
//!
//! Strategy 1 walks the lines top to bottom. A line containing any total
//! keyword opens a window of that line plus the next `window_lines` lines,
//! and the last plausible money token of the first productive window wins:
//! receipts print the payable total after subtotal and tax lines.
//!
//! Strategy 2 (no keyword window produced a value) takes the largest money
//! token of the whole text above the fallback floor.

use regex::Regex;
use tally_core::{Plausibility, ReceiptConfig, Result};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct AmountExtractor {
    keywords: Vec<String>,
    window_lines: usize,
    range: Plausibility,
    fallback_range: Plausibility,
    money: Regex,
    /// Dates and clock times, removed before money tokens are read
    noise: Regex,
}

impl AmountExtractor {
    pub fn new(config: &ReceiptConfig) -> Result<Self> {
        Ok(Self {
            keywords: config
                .total_keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            window_lines: config.window_lines,
            range: config.amount_range,
            fallback_range: config.fallback_range,
            money: Regex::new(r"(?:[₹$€£]\s*|\b)(\d{1,3}(?:,\d{3})+|\d+)(\.\d{2})?\b")?,
            noise: Regex::new(
                r"\b\d{1,4}[-/.]\d{1,2}[-/.]\d{2,4}\b|\b\d{1,2}:\d{2}(?::\d{2})?\b",
            )?,
        })
    }

    /// Extract the document total from normalized text.
    pub fn extract(&self, normalized: &str) -> Option<f64> {
        let lower = normalized.to_lowercase();
        let lines: Vec<&str> = lower
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        for (idx, line) in lines.iter().enumerate() {
            let Some(keyword) = self.keywords.iter().find(|k| line.contains(k.as_str())) else {
                continue;
            };

            let end = (idx + 1 + self.window_lines).min(lines.len());
            let window = lines[idx..end].join(" ");
            let last = self
                .money_values(&window)
                .into_iter()
                .rev()
                .find(|n| self.range.contains(*n));

            if let Some(amount) = last {
                debug!(keyword = %keyword, line = idx, amount, "total from keyword window");
                return Some(amount);
            }
        }

        let max = self
            .money_values(&lower)
            .into_iter()
            .filter(|n| self.fallback_range.contains(*n))
            .fold(None, |acc: Option<f64>, n| Some(acc.map_or(n, |m| m.max(n))));

        if let Some(amount) = max {
            debug!(amount, "total from whole-text maximum");
        }
        max
    }

    /// Money-shaped tokens in reading order, dates and times excluded.
    pub fn money_values(&self, text: &str) -> Vec<f64> {
        let text = self.noise.replace_all(text, " ");
        self.money
            .captures_iter(&text)
            .filter_map(|caps| {
                let int = caps[1].replace(',', "");
                let frac = caps.get(2).map(|m| m.as_str()).unwrap_or("");
                format!("{int}{frac}").parse::<f64>().ok()
            })
            .collect()
    }
}
