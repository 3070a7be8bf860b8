//! Statement pipeline.
//!
//! prepare -> segment -> resolve each chunk -> (line fallback when nothing
//! resolved) -> debit filter -> dedupe

use tally_core::{CategoryRules, EngineConfig, Result, TransactionRecord};
use tally_ingest::{LineFallback, RowResolver, RowSegmenter, StatementRow};
use tracing::{debug, info};

use crate::ledger;

#[derive(Debug, Clone)]
pub struct StatementParser {
    segmenter: RowSegmenter,
    resolver: RowResolver,
    fallback: LineFallback,
    categories: CategoryRules,
}

impl StatementParser {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        Ok(Self {
            segmenter: RowSegmenter::new(&config.normalize)?,
            resolver: RowResolver::new(&config.statement)?,
            fallback: LineFallback::new()?,
            categories: CategoryRules::compile(&config.categories)?,
        })
    }

    /// Every resolved row, credits included, before deduplication.
    pub fn rows(&self, raw: &str) -> Vec<StatementRow> {
        let prepared = self.segmenter.prepare(raw);
        let chunks = self.segmenter.segment(&prepared);

        let rows: Vec<StatementRow> = chunks
            .iter()
            .filter_map(|chunk| self.resolver.resolve(chunk))
            .collect();

        debug!(chunks = chunks.len(), rows = rows.len(), "statement chunks resolved");
        if !rows.is_empty() {
            return rows;
        }

        let rows = self.fallback.parse(&prepared, &self.resolver);
        if !rows.is_empty() {
            info!(rows = rows.len(), "statement parsed by line fallback");
        }
        rows
    }

    /// Debit records, deduplicated, in statement order.
    pub fn parse(&self, raw: &str) -> Vec<TransactionRecord> {
        let rows = self.rows(raw);
        let total = rows.len();

        let records = ledger::dedupe(ledger::debit_records(rows, &self.categories));
        debug!(rows = total, records = records.len(), "statement records emitted");
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{Category, Kind};

    fn parser() -> StatementParser {
        StatementParser::new(&EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_rows_keep_credits() {
        let rows = parser().rows("03-01-2026 Grocery Store 1200 45000\n04-01-2026 Salary Credit 50000 95000");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].kind, Kind::Credit);
    }

    #[test]
    fn test_parse_emits_debits_only() {
        let records = parser().parse("03-01-2026 Grocery Store 1200 45000\n04-01-2026 Salary Credit 50000 95000");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, Category::Groceries);
    }

    #[test]
    fn test_fallback_only_when_nothing_resolves() {
        // one chunk resolves, so the single-amount line is not rescued
        let records = parser().parse("03-01-2026 Uber Trip 320 9680\n04-01-2026 Coffee 250");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "Uber Trip");

        // nothing resolves: every dated line is read on its own
        let records = parser().parse("03-01-2026 Uber Trip 320\n04-01-2026 Coffee 250");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].amount, 250.0);
        assert_eq!(records[1].category, Category::Food);
    }

    #[test]
    fn test_empty_statement() {
        assert!(parser().parse("").is_empty());
        assert!(parser().parse("Statement of account\nno rows").is_empty());
    }
}
