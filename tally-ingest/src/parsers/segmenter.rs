//! Date-anchored statement row segmentation.
//!
//! Expected text after OCR (column borders lost, token order kept):
//!   03-01-2026 Grocery Store 1200 45000
//!   04-01-2026 Salary Credit 50000 95000
//!
//! Each date occurrence opens a chunk that runs to the next occurrence or to
//! the end of the text, so N dates give exactly N chunks.

use regex::Regex;
use tally_core::time::ymd_to_utc;
use tally_core::{NormalizeConfig, Result};
use tracing::debug;

use crate::normalize::Normalizer;
use crate::types::{DateOccurrence, RowChunk};

/// `DD[-/]MM[-/]YY` or `DD[-/]MM[-/]YYYY`, day first.
#[derive(Debug, Clone)]
pub struct StatementDates {
    re: Regex,
}

impl StatementDates {
    pub fn new() -> Result<Self> {
        Ok(Self {
            re: Regex::new(r"\b([0-3]?\d)[-/]([01]?\d)[-/](\d{4}|\d{2})\b")?,
        })
    }

    /// Every real calendar date in `text`, in order.
    pub fn find_all(&self, text: &str) -> Vec<DateOccurrence> {
        self.re
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let day: u32 = caps[1].parse().ok()?;
                let month: u32 = caps[2].parse().ok()?;
                let year: i32 = caps[3].parse().ok()?;
                let date = ymd_to_utc(year, month, day)?;
                Some(DateOccurrence {
                    offset: whole.start(),
                    len: whole.len(),
                    date,
                })
            })
            .collect()
    }

    pub fn first(&self, text: &str) -> Option<DateOccurrence> {
        self.find_all(text).into_iter().next()
    }

    /// `text` with every date-shaped token replaced by a space.
    pub fn strip(&self, text: &str) -> String {
        self.re.replace_all(text, " ").into_owned()
    }
}

#[derive(Debug, Clone)]
pub struct RowSegmenter {
    normalizer: Normalizer,
    /// An amount glued onto the following row's date: `4500004-01-2026`
    collision: Regex,
    dates: StatementDates,
}

impl RowSegmenter {
    pub fn new(config: &NormalizeConfig) -> Result<Self> {
        Ok(Self {
            normalizer: Normalizer::statement(config)?,
            collision: Regex::new(r"(\d{3,})([0-3]\d[-/][01]\d[-/](?:\d{4}|\d{2}))\b")?,
            dates: StatementDates::new()?,
        })
    }

    pub fn dates(&self) -> &StatementDates {
        &self.dates
    }

    /// Normalize (statement profile) and split amounts glued onto dates.
    pub fn prepare(&self, raw: &str) -> String {
        let normalized = self.normalizer.normalize(raw);
        self.collision
            .replace_all(&normalized, "${1} ${2}")
            .into_owned()
    }

    /// Cut prepared text into one chunk per date occurrence.
    pub fn segment<'a>(&self, prepared: &'a str) -> Vec<RowChunk<'a>> {
        let found = self.dates.find_all(prepared);

        let chunks: Vec<RowChunk<'a>> = found
            .iter()
            .enumerate()
            .map(|(i, occ)| {
                let end = found.get(i + 1).map_or(prepared.len(), |next| next.offset);
                let line_start = prepared[..occ.offset].rfind('\n').map_or(0, |nl| nl + 1);
                // text after an earlier date on the same line belongs to that row
                let shares_line = i > 0 && found[i - 1].offset >= line_start;
                let line_prefix = if shares_line { "" } else { &prepared[line_start..occ.offset] };
                RowChunk {
                    offset: occ.offset,
                    date: occ.date,
                    date_len: occ.len,
                    text: &prepared[occ.offset..end],
                    line_prefix,
                }
            })
            .collect();

        debug!(chunks = chunks.len(), "statement segmented");
        chunks
    }
}
