//! Immutable OCR text handed to the parsers.

use std::fmt;

use crate::error::{Error, Result};

/// OCR output for one receipt image or one concatenated statement.
///
/// No structure is assumed beyond line breaks. Construction from a string is
/// infallible; construction from bytes rejects anything that is not UTF-8
/// before any parsing is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawText(String);

impl RawText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        String::from_utf8(bytes)
            .map(Self)
            .map_err(|e| Error::InvalidInput(format!("OCR text is not valid UTF-8: {e}")))
    }

    /// Join per-page OCR output the way statements are fed to the segmenter.
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = String::new();
        for page in pages {
            let page = page.as_ref().trim();
            if page.is_empty() {
                continue;
            }
            out.push('\n');
            out.push_str(page);
        }
        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl AsRef<str> for RawText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RawText {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RawText {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for RawText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
