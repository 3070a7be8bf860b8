//! Receipt date extraction.
//!
//! Strategies run in order and the first real calendar date wins:
//!
//! 1. label anchored, day first: `Invoice Date: 05/01/2026`
//! 2. ISO order: `2026-01-05`, `2026/1/5`
//! 3. day first: `05-01-2026`, `5/1/2026`
//! 4. day, month name, year: `12 Jan 2026`, `3rd March, 2026`
//!
//! `None` means "unknown date". Substituting today's date is the caller's call.

use chrono::{DateTime, Utc};
use regex::{Captures, Regex};
use tally_core::time::{month_from_name, ymd_to_utc};
use tally_core::{ReceiptConfig, Result};

/// Order of the captured groups in a date pattern.
#[derive(Debug, Clone, Copy)]
enum Order {
    DayMonthYear,
    YearMonthDay,
    DayMonthNameYear,
}

#[derive(Debug, Clone)]
struct Strategy {
    name: &'static str,
    re: Regex,
    order: Order,
}

#[derive(Debug, Clone)]
pub struct DateExtractor {
    strategies: Vec<Strategy>,
}

impl DateExtractor {
    pub fn new(config: &ReceiptConfig) -> Result<Self> {
        let mut labels: Vec<String> = config
            .date_labels
            .iter()
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .map(|l| regex::escape(&l).replace(' ', r"\s*"))
            .collect();
        if labels.is_empty() {
            labels.push("date".to_string());
        }

        let labeled = format!(
            r"(?i)\b(?:{})\b\s*[:.\-]?\s*(\d{{1,2}})[/\-.](\d{{1,2}})[/\-.](\d{{4}}|\d{{2}})\b",
            labels.join("|")
        );

        Ok(Self {
            strategies: vec![
                Strategy {
                    name: "labeled",
                    re: Regex::new(&labeled)?,
                    order: Order::DayMonthYear,
                },
                Strategy {
                    name: "iso",
                    re: Regex::new(r"\b(\d{4})[-/](\d{1,2})[-/](\d{1,2})\b")?,
                    order: Order::YearMonthDay,
                },
                Strategy {
                    name: "day_first",
                    re: Regex::new(r"\b(\d{1,2})[-/](\d{1,2})[-/](\d{4})\b")?,
                    order: Order::DayMonthYear,
                },
                Strategy {
                    name: "month_name",
                    re: Regex::new(
                        r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?[\s\-]*(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?,?[\s\-]*(\d{4})\b",
                    )?,
                    order: Order::DayMonthNameYear,
                },
            ],
        })
    }

    pub fn extract(&self, text: &str) -> Option<DateTime<Utc>> {
        let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");

        self.strategies.iter().find_map(|strategy| {
            let found = strategy
                .re
                .captures_iter(&flat)
                .find_map(|caps| to_date(&caps, strategy.order));
            if found.is_some() {
                tracing::debug!(strategy = strategy.name, "receipt date matched");
            }
            found
        })
    }
}

fn to_date(caps: &Captures, order: Order) -> Option<DateTime<Utc>> {
    let num = |i: usize| caps.get(i)?.as_str().parse::<u32>().ok();

    match order {
        Order::DayMonthYear => ymd_to_utc(num(3)? as i32, num(2)?, num(1)?),
        Order::YearMonthDay => ymd_to_utc(num(1)? as i32, num(2)?, num(3)?),
        Order::DayMonthNameYear => {
            let month = month_from_name(caps.get(2)?.as_str())?;
            ymd_to_utc(num(3)? as i32, month, num(1)?)
        }
    }
}
