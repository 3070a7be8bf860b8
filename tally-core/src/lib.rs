//! tally-core: record types, configuration and category rules shared by the
//! receipt and statement parsers

pub mod categorizer;
pub mod config;
pub mod error;
pub mod record;
pub mod text;
pub mod time;

pub use categorizer::{CategoryRule, CategoryRules};
pub use config::{EngineConfig, NormalizeConfig, Plausibility, ReceiptConfig, StatementConfig};
pub use error::{Error, Result};
pub use record::{
    Category, Kind, ReceiptExtract, TransactionRecord, RECEIPT_PLACEHOLDER, ROW_PLACEHOLDER,
};
pub use text::RawText;
