use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tally_core::EngineConfig;

use crate::state::ensure_tally_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmSection,
    /// Keyword lists, ranges and category rules for the engine
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// Try the LLM extractor first when an API key is present
    pub enabled: bool,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// OCR text sent for a receipt is cut to this many characters
    pub max_receipt_chars: usize,
    /// OCR text sent for a statement is cut to this many characters
    pub max_statement_chars: usize,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com".to_string(),
            temperature: 0.0,
            timeout_secs: 30,
            max_receipt_chars: 12_000,
            max_statement_chars: 20_000,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_tally_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(s).context("parse config.toml")?;
    cfg.engine.validate().context("invalid [engine] section")?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_sections() {
        let cfg = parse_config(
            r#"
[llm]
enabled = false

[engine.statement]
credit_keywords = ["salary", "upi in"]
"#,
        )
        .unwrap();

        assert!(!cfg.llm.enabled);
        assert_eq!(cfg.llm.model, "gpt-4o-mini");
        assert_eq!(cfg.engine.statement.credit_keywords, vec!["salary", "upi in"]);
        assert_eq!(cfg.engine.statement.min_description_len, 3);
    }

    #[test]
    fn test_default_round_trips() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        assert_eq!(parse_config(&s).unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_engine_rejected() {
        let err = parse_config("[engine.receipt.amount_range]\nmin = 10.0\nmax = 1.0\n").unwrap_err();
        assert!(format!("{err:#}").contains("invalid [engine] section"));
    }
}
