//! The deterministic interpretation engine.

use tally_core::{CategoryRules, EngineConfig, RawText, ReceiptExtract, Result, TransactionRecord};
use tracing::debug;

use crate::receipt::ReceiptParser;
use crate::statement::StatementParser;

/// Compiled rule set for both document families.
///
/// Built once; every parse is a pure function of its input, so one engine
/// can be shared across threads.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    receipt: ReceiptParser,
    statement: StatementParser,
    categories: CategoryRules,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            receipt: ReceiptParser::new(&config)?,
            statement: StatementParser::new(&config)?,
            categories: CategoryRules::compile(&config.categories)?,
            config,
        })
    }

    pub fn standard() -> Result<Self> {
        Self::new(EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn categories(&self) -> &CategoryRules {
        &self.categories
    }

    pub fn parse_receipt(&self, text: &RawText) -> ReceiptExtract {
        self.receipt.parse(text.as_str())
    }

    /// Debit records of one statement (all pages already concatenated).
    pub fn parse_statement(&self, text: &RawText) -> Vec<TransactionRecord> {
        if text.is_blank() {
            debug!("blank statement text");
            return Vec::new();
        }
        self.statement.parse(text.as_str())
    }

    /// Receipt from undecoded OCR output; non-UTF-8 bytes are `InvalidInput`.
    pub fn parse_receipt_bytes(&self, bytes: Vec<u8>) -> Result<ReceiptExtract> {
        Ok(self.parse_receipt(&RawText::from_bytes(bytes)?))
    }

    /// Statement from undecoded OCR output; non-UTF-8 bytes are `InvalidInput`.
    pub fn parse_statement_bytes(&self, bytes: Vec<u8>) -> Result<Vec<TransactionRecord>> {
        Ok(self.parse_statement(&RawText::from_bytes(bytes)?))
    }
}
