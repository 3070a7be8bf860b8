//! Statement parsers.
//!
//! OCR flattens statement tables; the date at the start of each row is the
//! only reliable anchor left. The pipeline is:
//!
//! 1. [`RowSegmenter`] prepares the text and cuts it at every date
//! 2. [`RowResolver`] turns each chunk into a row (amount, balance, description)
//! 3. [`LineFallback`] runs only when step 2 resolved nothing

pub mod line_fallback;
pub mod rows;
pub mod segmenter;

pub use line_fallback::LineFallback;
pub use rows::RowResolver;
pub use segmenter::{RowSegmenter, StatementDates};
