use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_core::Kind;

/// A date token found in prepared statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateOccurrence {
    /// Byte offset of the token in the prepared text
    pub offset: usize,
    /// Byte length of the token
    pub len: usize,
    pub date: DateTime<Utc>,
}

/// Slice of a statement bounded by two consecutive date occurrences.
///
/// Borrows from the prepared text of a single parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowChunk<'a> {
    pub offset: usize,
    pub date: DateTime<Utc>,
    /// Length of the leading date token inside `text`
    pub date_len: usize,
    pub text: &'a str,
    /// Text between the start of the date's source line and the date; empty
    /// when an earlier date shares that line
    pub line_prefix: &'a str,
}

impl<'a> RowChunk<'a> {
    /// Chunk text after the anchoring date token.
    pub fn body(&self) -> &'a str {
        &self.text[self.date_len..]
    }
}

/// Normalized output of the statement row parsers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    pub date: DateTime<Utc>,
    pub description: String,
    pub amount: f64,
    /// Running balance, when the row carried one
    pub balance: Option<f64>,
    pub kind: Kind,
}
