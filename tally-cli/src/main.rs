use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use tally_core::RawText;
use tally_finance::{export, summarize, Engine, Pipeline};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod llm;
mod output;
mod state;

use output::Format;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "tally", version = VERSION, about = "Turn OCR text from receipts and bank statements into transactions")]
struct Cli {
    /// Output format
    #[arg(long, value_enum, global = true, default_value_t = Format::Json)]
    format: Format,

    /// Skip the LLM extractor even when OPENAI_API_KEY is set
    #[arg(long, global = true)]
    no_llm: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract merchant, total, date and category from one receipt's OCR text
    Receipt {
        file: PathBuf,
    },

    /// Extract debit transactions from statement OCR text (one file per page)
    Statement {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Summarize spending from a JSON array of records
    Insights {
        records: PathBuf,

        /// Monthly salary used for the low/medium/high grouping
        #[arg(long)]
        salary: Option<f64>,
    },

    /// Manage ~/.tally/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,

    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::Receipt { file } => {
            let text = state::read_ocr_text(&file)?;
            let pipeline = build_pipeline(cli.no_llm)?;

            let scan = pipeline.scan_receipt(&text);
            info!(source = ?scan.source, file = %file.display(), "receipt scanned");
            output::print_receipt(&scan.value, cli.format, &mut stdout)?;
        }

        Command::Statement { files } => {
            let pages = files
                .iter()
                .map(|f| state::read_ocr_text(f))
                .collect::<Result<Vec<RawText>>>()?;
            let text = RawText::from_pages(&pages);
            let pipeline = build_pipeline(cli.no_llm)?;

            let scan = pipeline.scan_statement(&text);
            info!(source = ?scan.source, pages = pages.len(), records = scan.value.len(), "statement scanned");
            output::print_records(&scan.value, cli.format, &mut stdout)?;
        }

        Command::Insights { records, salary } => {
            let file = File::open(&records).with_context(|| format!("open {}", records.display()))?;
            let list = export::read_json(BufReader::new(file))
                .with_context(|| format!("parse {}", records.display()))?;

            let insights = summarize(&list, salary);
            output::print_insights(&insights, cli.format, &mut stdout)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                let s = toml::to_string_pretty(&cfg).context("serialize config")?;
                write!(stdout, "{s}")?;
            }
        },
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
}

fn build_pipeline(no_llm: bool) -> Result<Pipeline> {
    let cfg = config::load_config()?;
    let engine = Engine::new(cfg.engine.clone()).context("build engine from [engine] config")?;
    let pipeline = Pipeline::new(engine);

    if no_llm || !cfg.llm.enabled {
        debug!("llm extractor disabled");
        return Ok(pipeline);
    }

    match llm::OpenAiExtractor::from_env(&cfg.llm) {
        Some(extractor) => Ok(pipeline.with_extractor(Box::new(extractor))),
        None => {
            debug!("OPENAI_API_KEY not set; engine only");
            Ok(pipeline)
        }
    }
}
