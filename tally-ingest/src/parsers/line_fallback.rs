//! Line-by-line statement parser.
//!
//! Used only when no chunk resolved: statements whose rows carry a single
//! amount column and no running balance. Every line holding a date and at
//! least one plausible amount becomes a row; the last amount wins.

use tally_core::Result;
use tracing::debug;

use crate::parsers::rows::RowResolver;
use crate::parsers::segmenter::StatementDates;
use crate::types::StatementRow;

#[derive(Debug, Clone)]
pub struct LineFallback {
    dates: StatementDates,
}

impl LineFallback {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dates: StatementDates::new()?,
        })
    }

    /// Parse prepared statement text one line at a time.
    pub fn parse(&self, prepared: &str, resolver: &RowResolver) -> Vec<StatementRow> {
        let range = resolver.range();

        let rows: Vec<StatementRow> = resolver
            .truncate_footer(prepared)
            .lines()
            .filter(|line| !resolver.is_boilerplate_line(line))
            .filter_map(|line| {
                let date = self.dates.first(line)?.date;
                let undated = self.dates.strip(line);
                let repaired = resolver.repair_thousands(&undated);
                let amount = resolver
                    .numbers(&repaired)
                    .into_iter()
                    .rev()
                    .find(|n| range.contains(*n))?;

                Some(StatementRow {
                    date,
                    description: resolver.describe(&repaired),
                    amount,
                    balance: None,
                    kind: resolver.kind_of(&undated),
                })
            })
            .collect();

        debug!(rows = rows.len(), "line fallback parsed statement");
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::segmenter::RowSegmenter;
    use chrono::{TimeZone, Utc};
    use tally_core::{Kind, NormalizeConfig, StatementConfig};

    fn parse(raw: &str) -> Vec<StatementRow> {
        let segmenter = RowSegmenter::new(&NormalizeConfig::default()).unwrap();
        let resolver = RowResolver::new(&StatementConfig::default()).unwrap();
        LineFallback::new().unwrap().parse(&segmenter.prepare(raw), &resolver)
    }

    #[test]
    fn test_single_amount_lines() {
        let rows = parse("Card ending 4421\n05-01-2026 Coffee House 250\n06/01/2026 Refund Myntra 999.00");
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].date, Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap());
        assert_eq!(rows[0].description, "Coffee House");
        assert_eq!(rows[0].amount, 250.0);
        assert_eq!(rows[0].balance, None);
        assert_eq!(rows[0].kind, Kind::Debit);

        assert_eq!(rows[1].amount, 999.0);
        assert_eq!(rows[1].kind, Kind::Credit);
    }

    #[test]
    fn test_skips_lines_without_plausible_amount() {
        let rows = parse("05-01-2026 Note only\n07-01-2026 Transfer 0\n08-01-2026 Bus 30");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Bus");
    }

    #[test]
    fn test_respects_boilerplate_and_footer() {
        let raw = "01-01-2026 Statement Date 1\n02-01-2026 Cab 180\nComputer generated\n03-01-2026 Ghost 99";
        let rows = parse(raw);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 180.0);
    }
}
