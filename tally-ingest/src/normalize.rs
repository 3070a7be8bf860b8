//! OCR text normalizer.
//!
//! Steps, in the order they run:
//!
//! 1. artifacts: non-breaking spaces, tabs, carriage returns and pipes (table
//!    borders) become plain spaces
//! 2. split digits: `"1 2 4 9"` -> `"1249"` (receipt profile only)
//! 3. thousands commas: `"1,249"` -> `"1249"`
//! 4. decimal separators: `"12 , 50"` -> `"12.50"`
//! 5. long digit runs (account, GSTIN and phone numbers) are dropped
//! 6. repeated spaces and blank lines collapse
//!
//! Thousands commas go before decimal unification, otherwise `"1,249.00"`
//! would turn into `"1.249.00"`. The result is a fixed point:
//! `normalize(normalize(x)) == normalize(x)`.

use regex::{Captures, Regex};
use std::borrow::Cow;
use tally_core::{NormalizeConfig, Result};

/// Which document family the text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Free-form receipts; fragmented digits are rejoined.
    Receipt,
    /// Statements; neighbouring numbers are separate columns and stay apart.
    Statement,
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    profile: Profile,
    split_digits: Regex,
    thousands: Regex,
    decimal: Regex,
    long_run: Regex,
}

impl Normalizer {
    pub fn new(profile: Profile, config: &NormalizeConfig) -> Result<Self> {
        // Statement columns are space separated, so only a bare separator counts there.
        let decimal = match profile {
            Profile::Receipt => r"\d(?: *[.,] *\d)+",
            Profile::Statement => r"\d(?:[.,]\d)+",
        };

        Ok(Self {
            profile,
            split_digits: Regex::new(r"\d(?: +\d)+")?,
            // Western (1,249,000) and lakh (1,20,000) grouping both end in ",ddd".
            thousands: Regex::new(r"\b\d{1,3}(?:,\d{2,3})*,\d{3}\b")?,
            decimal: Regex::new(decimal)?,
            long_run: Regex::new(&format!(r"\b\d{{{},}}\b", config.long_digit_run))?,
        })
    }

    pub fn receipt(config: &NormalizeConfig) -> Result<Self> {
        Self::new(Profile::Receipt, config)
    }

    pub fn statement(config: &NormalizeConfig) -> Result<Self> {
        Self::new(Profile::Statement, config)
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn normalize(&self, text: &str) -> String {
        let cleaned = clean_artifacts(text);

        let joined = match self.profile {
            Profile::Receipt => self
                .split_digits
                .replace_all(&cleaned, |caps: &Captures| caps[0].replace(' ', "")),
            Profile::Statement => Cow::Borrowed(cleaned.as_str()),
        };

        let no_thousands = self
            .thousands
            .replace_all(&joined, |caps: &Captures| caps[0].replace(',', ""));

        let decimals = self.decimal.replace_all(&no_thousands, |caps: &Captures| {
            caps[0]
                .chars()
                .filter(|c| *c != ' ')
                .map(|c| if c == ',' { '.' } else { c })
                .collect::<String>()
        });

        let trimmed = self.long_run.replace_all(&decimals, "");

        collapse_whitespace(&trimmed)
    }
}

/// Map OCR layout artifacts to plain spaces, keeping line breaks.
fn clean_artifacts(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\n' => '\n',
            '|' | '¦' => ' ',
            c if c.is_whitespace() => ' ',
            c => c,
        })
        .collect()
}

/// Single spaces within lines, no leading/trailing spaces, no blank lines.
fn collapse_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
