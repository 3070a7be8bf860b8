//! Receipt pipeline: four independent extractors combined into one extract.

use tally_core::{CategoryRules, EngineConfig, ReceiptExtract, Result};
use tally_ingest::{AmountExtractor, DateExtractor, NameExtractor, Normalizer};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ReceiptParser {
    normalizer: Normalizer,
    amount: AmountExtractor,
    date: DateExtractor,
    name: NameExtractor,
    categories: CategoryRules,
}

impl ReceiptParser {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        Ok(Self {
            normalizer: Normalizer::receipt(&config.normalize)?,
            amount: AmountExtractor::new(&config.receipt)?,
            date: DateExtractor::new(&config.receipt)?,
            name: NameExtractor::new(&config.receipt),
            categories: CategoryRules::compile(&config.categories)?,
        })
    }

    /// Amount reads normalized text; date, name and category read the raw
    /// text so month names and merchant casing survive.
    pub fn parse(&self, raw: &str) -> ReceiptExtract {
        let normalized = self.normalizer.normalize(raw);

        let extract = ReceiptExtract {
            description: self.name.extract(raw),
            amount: self.amount.extract(&normalized),
            date: self.date.extract(raw),
            category: self.categories.classify(raw),
        };

        debug!(
            description = %extract.description,
            amount = ?extract.amount,
            has_date = extract.date.is_some(),
            category = %extract.category,
            "receipt parsed"
        );
        extract
    }
}
