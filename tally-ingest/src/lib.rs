//! tally-ingest: OCR text cleanup and field extractors for receipts and
//! statements.
//!
//! Every extractor is built once from configuration and is then a pure
//! function of its input text.

pub mod amount;
pub mod date;
pub mod name;
pub mod normalize;
pub mod parsers;
pub mod types;

pub use amount::AmountExtractor;
pub use date::DateExtractor;
pub use name::NameExtractor;
pub use normalize::{Normalizer, Profile};
pub use parsers::{LineFallback, RowResolver, RowSegmenter, StatementDates};
pub use types::{DateOccurrence, RowChunk, StatementRow};
