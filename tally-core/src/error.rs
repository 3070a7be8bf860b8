//! Error types shared by the tally crates

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Input that cannot be treated as OCR text at all (rejected before parsing).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Config error: {0}")]
    Config(String),

    /// The external structured-extraction collaborator failed.
    #[error("Extractor error: {0}")]
    Extractor(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
