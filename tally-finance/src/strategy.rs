//! External-first extraction with the deterministic engine as fallback.
//!
//! A [`StructuredExtractor`] (usually an LLM behind an HTTP API) is tried
//! first when one is configured. Any error falls through to the [`Engine`].
//! External results go through the same checks the engine applies to its
//! own output before they are returned.

use serde::Serialize;
use tally_core::{
    Category, RawText, ReceiptExtract, Result, TransactionRecord, RECEIPT_PLACEHOLDER,
    ROW_PLACEHOLDER,
};
use tracing::{info, warn};

use crate::engine::Engine;
use crate::ledger;

/// Structured extraction performed outside the engine.
pub trait StructuredExtractor: Send + Sync {
    /// Short label used in logs and scan output
    fn name(&self) -> &str;

    fn extract_receipt(&self, text: &str) -> Result<ReceiptExtract>;

    /// Statement rows; credits may be included and are filtered afterwards.
    fn extract_statement(&self, text: &str) -> Result<Vec<TransactionRecord>>;
}

/// Which path produced a scan result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    External,
    Engine,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scan<T> {
    pub source: Source,
    pub value: T,
}

pub struct Pipeline {
    engine: Engine,
    extractor: Option<Box<dyn StructuredExtractor>>,
}

impl Pipeline {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            extractor: None,
        }
    }

    pub fn with_extractor(mut self, extractor: Box<dyn StructuredExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn scan_receipt(&self, text: &RawText) -> Scan<ReceiptExtract> {
        if let Some(extractor) = self.external(text) {
            match extractor.extract_receipt(text.as_str()) {
                Ok(extract) => {
                    info!(extractor = extractor.name(), "receipt extracted externally");
                    return Scan {
                        source: Source::External,
                        value: self.sanitize_receipt(extract),
                    };
                }
                Err(e) => {
                    warn!(extractor = extractor.name(), error = %e, "external receipt extraction failed; using engine");
                }
            }
        }

        Scan {
            source: Source::Engine,
            value: self.engine.parse_receipt(text),
        }
    }

    pub fn scan_statement(&self, text: &RawText) -> Scan<Vec<TransactionRecord>> {
        if let Some(extractor) = self.external(text) {
            match extractor.extract_statement(text.as_str()) {
                Ok(records) => {
                    info!(extractor = extractor.name(), rows = records.len(), "statement extracted externally");
                    return Scan {
                        source: Source::External,
                        value: self.sanitize_statement(records),
                    };
                }
                Err(e) => {
                    warn!(extractor = extractor.name(), error = %e, "external statement extraction failed; using engine");
                }
            }
        }

        Scan {
            source: Source::Engine,
            value: self.engine.parse_statement(text),
        }
    }

    fn external(&self, text: &RawText) -> Option<&dyn StructuredExtractor> {
        if text.is_blank() {
            return None;
        }
        self.extractor.as_deref()
    }

    fn sanitize_receipt(&self, mut extract: ReceiptExtract) -> ReceiptExtract {
        let range = self.engine.config().receipt.amount_range;

        extract.description = fill_blank(&extract.description, RECEIPT_PLACEHOLDER);
        extract.amount = extract.amount.filter(|a| range.contains(*a));
        if extract.category == Category::Other {
            extract.category = self.engine.categories().classify(&extract.description);
        }
        extract
    }

    fn sanitize_statement(&self, records: Vec<TransactionRecord>) -> Vec<TransactionRecord> {
        let range = self.engine.config().statement.amount_range;

        let cleaned = records
            .into_iter()
            .filter(|r| r.is_debit() && range.contains(r.amount))
            .map(|mut r| {
                r.description = fill_blank(&r.description, ROW_PLACEHOLDER);
                if r.category == Category::Other {
                    r.category = self.engine.categories().classify(&r.description);
                }
                r
            })
            .collect();

        ledger::dedupe(cleaned)
    }
}

fn fill_blank(description: &str, placeholder: &str) -> String {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        placeholder.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{Error, Kind};

    struct Failing;

    impl StructuredExtractor for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn extract_receipt(&self, _text: &str) -> Result<ReceiptExtract> {
            Err(Error::Extractor("service unavailable".to_string()))
        }

        fn extract_statement(&self, _text: &str) -> Result<Vec<TransactionRecord>> {
            Err(Error::Extractor("service unavailable".to_string()))
        }
    }

    struct Canned;

    impl StructuredExtractor for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        fn extract_receipt(&self, _text: &str) -> Result<ReceiptExtract> {
            Ok(ReceiptExtract {
                description: "  ".to_string(),
                amount: Some(2_000_000.0),
                date: None,
                category: Category::Other,
            })
        }

        fn extract_statement(&self, _text: &str) -> Result<Vec<TransactionRecord>> {
            Ok(vec![
                TransactionRecord::new("Pizza Hut", 600.0, None, Category::Other, Kind::Debit),
                TransactionRecord::new("Salary", 50000.0, None, Category::Other, Kind::Credit),
                TransactionRecord::new("Pizza Hut", 600.0, None, Category::Other, Kind::Debit),
                TransactionRecord::new("", 10.0, None, Category::Other, Kind::Debit),
                TransactionRecord::new("Bad", -5.0, None, Category::Other, Kind::Debit),
            ])
        }
    }

    const RECEIPT: &str = "Blue Tokai Coffee\nTotal 300";

    #[test]
    fn test_failure_falls_back_to_engine() {
        let pipeline = Pipeline::new(Engine::standard().unwrap()).with_extractor(Box::new(Failing));
        let scan = pipeline.scan_receipt(&RawText::new(RECEIPT));
        assert_eq!(scan.source, Source::Engine);
        assert_eq!(scan.value.amount, Some(300.0));
        assert_eq!(scan.value.category, Category::Food);
    }

    #[test]
    fn test_external_result_is_sanitized() {
        let pipeline = Pipeline::new(Engine::standard().unwrap()).with_extractor(Box::new(Canned));
        let scan = pipeline.scan_receipt(&RawText::new(RECEIPT));
        assert_eq!(scan.source, Source::External);
        assert_eq!(scan.value.description, RECEIPT_PLACEHOLDER);
        assert_eq!(scan.value.amount, None);

        let scan = pipeline.scan_statement(&RawText::new("03-01-2026 anything 1 2"));
        assert_eq!(scan.source, Source::External);
        let records = scan.value;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, Category::Food);
        assert_eq!(records[1].description, ROW_PLACEHOLDER);
    }

    #[test]
    fn test_blank_text_skips_extractor() {
        let pipeline = Pipeline::new(Engine::standard().unwrap()).with_extractor(Box::new(Canned));
        let scan = pipeline.scan_statement(&RawText::new(""));
        assert_eq!(scan.source, Source::Engine);
        assert!(scan.value.is_empty());
    }
}
