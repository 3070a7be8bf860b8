//! tally-finance: receipt and statement pipelines, ledger cleanup, the
//! external-first strategy selector and spending insights

pub mod engine;
pub mod export;
pub mod insights;
pub mod ledger;
pub mod receipt;
pub mod statement;
pub mod strategy;

pub use engine::Engine;
pub use insights::{summarize, Band, CategorySpend, SpendingInsights};
pub use receipt::ReceiptParser;
pub use statement::StatementParser;
pub use strategy::{Pipeline, Scan, Source, StructuredExtractor};
