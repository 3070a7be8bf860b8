use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;
use tally_core::{ReceiptExtract, TransactionRecord};
use tally_finance::export;
use tally_finance::SpendingInsights;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Csv,
}

pub fn print_json<T: Serialize>(value: &T, out: &mut impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("serialize json")?;
    writeln!(out)?;
    Ok(())
}

pub fn print_records(records: &[TransactionRecord], format: Format, out: &mut impl Write) -> Result<()> {
    match format {
        Format::Json => print_json(&records, out),
        Format::Csv => export::write_csv(records, out).context("write csv"),
    }
}

pub fn print_receipt(extract: &ReceiptExtract, format: Format, out: &mut impl Write) -> Result<()> {
    match format {
        Format::Json => print_json(extract, out),
        Format::Csv => export::write_receipt_csv(extract, out).context("write csv"),
    }
}

pub fn print_insights(insights: &SpendingInsights, format: Format, out: &mut impl Write) -> Result<()> {
    match format {
        Format::Json => print_json(insights, out),
        Format::Csv => {
            let mut wtr = csv::Writer::from_writer(out);
            wtr.write_record(["band", "category", "spend", "pct_of_income"])?;
            let bands = [
                ("low", &insights.grouped.low),
                ("medium", &insights.grouped.medium),
                ("high", &insights.grouped.high),
            ];
            for (band, items) in bands {
                for item in items.iter() {
                    wtr.write_record([
                        band.to_string(),
                        item.category.to_string(),
                        format!("{:.2}", item.spend),
                        item.pct_of_income.map(|p| format!("{p:.1}")).unwrap_or_default(),
                    ])?;
                }
            }
            wtr.flush()?;
            Ok(())
        }
    }
}
