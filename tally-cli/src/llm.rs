//! OpenAI-backed structured extractor.
//!
//! The model is asked for a JSON object; the reply is decoded into loose wire
//! structs and converted to engine types. Anything the model leaves out is
//! filled in by the pipeline's sanitizer.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tally_core::time::utc_midnight;
use tally_core::{Category, Kind, ReceiptExtract, TransactionRecord, RECEIPT_PLACEHOLDER, ROW_PLACEHOLDER};
use tally_finance::StructuredExtractor;

use crate::config::LlmSection;

const RECEIPT_PROMPT: &str = "Extract structured data from a receipt OCR.\n\
Rules:\n\
- name: best merchant/store name or short description\n\
- amount: FINAL total paid (not GST, not subtotal), number or null\n\
- date: YYYY-MM-DD if present else null\n\
- category: one of food, shopping, clothing, groceries, travel, medical, other\n\
Return a JSON object with keys name, amount, date, category.";

const STATEMENT_PROMPT: &str = "You are a strict bank statement table parser. Extract rows from OCR text.\n\
- Ignore headers and 'Opening Balance'\n\
- For each row return: date (YYYY-MM-DD), name (description), debit (amount or null), credit (amount or null)\n\
- Amounts must NOT be balance.\n\
Return a JSON object {\"transactions\": [...]}.";

#[derive(Debug, Clone)]
pub struct OpenAiExtractor {
    api_key: String,
    settings: LlmSection,
}

impl OpenAiExtractor {
    pub fn new(api_key: impl Into<String>, settings: LlmSection) -> Self {
        Self {
            api_key: api_key.into(),
            settings,
        }
    }

    /// Extractor keyed from `OPENAI_API_KEY`; `None` when the key is unset.
    pub fn from_env(settings: &LlmSection) -> Option<Self> {
        let key = std::env::var("OPENAI_API_KEY").ok()?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key, settings.clone()))
    }

    fn complete_json(&self, system: &str, text: &str, max_chars: usize) -> Result<String> {
        let text: String = text.chars().take(max_chars).collect();
        let user = format!("OCR TEXT:\n{text}");

        // The CLI runs on #[tokio::main]; a nested runtime would panic.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            tokio::task::block_in_place(|| handle.block_on(self.complete_async(system, &user)))
        } else {
            let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
            rt.block_on(self.complete_async(system, &user))
        }
    }

    async fn complete_async(&self, system: &str, user: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Serialize)]
        struct ResponseFormat {
            #[serde(rename = "type")]
            t: &'static str,
        }

        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            response_format: ResponseFormat,
        }

        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: MsgOut,
        }

        #[derive(Deserialize)]
        struct MsgOut {
            content: Option<String>,
        }

        let body = Req {
            model: &self.settings.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: system,
                },
                Msg {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.settings.temperature,
            response_format: ResponseFormat { t: "json_object" },
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.settings.timeout_secs))
            .build()
            .context("build http client")?;

        let url = format!("{}/v1/chat/completions", self.settings.base_url.trim_end_matches('/'));
        let resp = client
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .context("openai request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("openai error: {status} {txt}");
        }

        let out: Resp = resp.json().await.context("parse openai response")?;
        let content = out
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(content.trim().to_string())
    }
}

impl StructuredExtractor for OpenAiExtractor {
    fn name(&self) -> &str {
        "openai"
    }

    fn extract_receipt(&self, text: &str) -> tally_core::Result<ReceiptExtract> {
        let reply = self
            .complete_json(RECEIPT_PROMPT, text, self.settings.max_receipt_chars)
            .map_err(extractor_error)?;
        receipt_from_json(&reply)
    }

    fn extract_statement(&self, text: &str) -> tally_core::Result<Vec<TransactionRecord>> {
        let reply = self
            .complete_json(STATEMENT_PROMPT, text, self.settings.max_statement_chars)
            .map_err(extractor_error)?;
        statement_from_json(&reply)
    }
}

fn extractor_error(e: anyhow::Error) -> tally_core::Error {
    tally_core::Error::Extractor(format!("{e:#}"))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReceiptWire {
    name: Option<String>,
    amount: Option<f64>,
    date: Option<String>,
    category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StatementWire {
    transactions: Vec<RowWire>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RowWire {
    date: Option<String>,
    name: Option<String>,
    debit: Option<f64>,
    credit: Option<f64>,
}

/// Decode a receipt reply. Unknown categories become `Other` so the
/// pipeline reclassifies them from the description.
pub fn receipt_from_json(reply: &str) -> tally_core::Result<ReceiptExtract> {
    let wire: ReceiptWire = serde_json::from_str(reply)?;

    Ok(ReceiptExtract {
        description: wire
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| RECEIPT_PLACEHOLDER.to_string()),
        amount: wire.amount.filter(|a| a.is_finite()),
        date: wire.date.as_deref().and_then(iso_date),
        category: wire
            .category
            .and_then(|c| c.parse::<Category>().ok())
            .unwrap_or_default(),
    })
}

/// Decode a statement reply. Rows without a positive debit or credit, or
/// without an ISO date, are skipped.
pub fn statement_from_json(reply: &str) -> tally_core::Result<Vec<TransactionRecord>> {
    let wire: StatementWire = serde_json::from_str(reply)?;

    Ok(wire
        .transactions
        .into_iter()
        .filter_map(|row| {
            let positive = |v: Option<f64>| v.filter(|a| a.is_finite() && *a > 0.0);
            let (amount, kind) = match (positive(row.debit), positive(row.credit)) {
                (Some(d), _) => (d, Kind::Debit),
                (None, Some(c)) => (c, Kind::Credit),
                (None, None) => return None,
            };
            let date = iso_date(row.date.as_deref()?)?;
            let description = row
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| ROW_PLACEHOLDER.to_string());

            Some(TransactionRecord::new(description, amount, Some(date), Category::Other, kind))
        })
        .collect())
}

fn iso_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok().map(utc_midnight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_receipt_reply() {
        let r = receipt_from_json(
            r#"{"name":" Third Wave Coffee ","amount":420.0,"date":"2026-02-14","category":"food"}"#,
        )
        .unwrap();
        assert_eq!(r.description, "Third Wave Coffee");
        assert_eq!(r.amount, Some(420.0));
        assert_eq!(r.date, Some(Utc.with_ymd_and_hms(2026, 2, 14, 0, 0, 0).unwrap()));
        assert_eq!(r.category, Category::Food);
    }

    #[test]
    fn test_receipt_reply_with_gaps() {
        let r = receipt_from_json(r#"{"name":"","amount":null,"date":"14/02/2026","category":"snacks"}"#).unwrap();
        assert_eq!(r.description, RECEIPT_PLACEHOLDER);
        assert_eq!(r.amount, None);
        assert_eq!(r.date, None);
        assert_eq!(r.category, Category::Other);
    }

    #[test]
    fn test_statement_reply() {
        let records = statement_from_json(
            r#"{"transactions":[
                {"date":"2026-01-03","name":"Grocery Store","debit":1200,"credit":null},
                {"date":"2026-01-04","name":"Salary","debit":null,"credit":50000},
                {"date":"2026-01-05","name":"Zero","debit":0,"credit":null},
                {"date":"Jan 6","name":"Bad date","debit":10,"credit":null}
            ]}"#,
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, Kind::Debit);
        assert_eq!(records[0].amount, 1200.0);
        assert_eq!(records[1].kind, Kind::Credit);
    }

    #[test]
    fn test_malformed_reply_is_error() {
        assert!(statement_from_json("not json").is_err());
        assert!(statement_from_json("{}").unwrap().is_empty());
    }
}
