//! CLI binary for pdf2income.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig`, prints the parsed table, and writes the workbook.

use anyhow::{Context, Result};
use clap::Parser;
use pdf2income::{
    export_to_file, extract_from_file, ExtractionConfig, RowOrder, DEFAULT_FILENAME,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic extraction (writes extracted_income_statement.xlsx)
  pdf2income annual_report.pdf

  # Choose the output path
  pdf2income annual_report.pdf -o q4.xlsx

  # Use a different model
  pdf2income --model mistralai/mistral-7b-instruct annual_report.pdf

  # Print the parsed rows as JSON instead of writing a workbook
  pdf2income --json annual_report.pdf

  # Keep duplicated labels at their first position
  pdf2income --row-order first annual_report.pdf

ENVIRONMENT VARIABLES:
  OPENROUTER_API_KEY   API key for the model provider (required;
                       also read from a .env file in the working directory)

SETUP:
  1. Set the API key:  export OPENROUTER_API_KEY=sk-or-...
  2. Extract:          pdf2income annual_report.pdf

Scanned (image-only) PDFs are not supported — the tool performs no OCR.
"#;

/// Extract income-statement line items from an annual-report PDF.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2income",
    version,
    about = "Extract income-statement line items from annual-report PDFs using an LLM",
    long_about = "Extract the income statement from an annual-report PDF: pulls the plain text, \
detects the currency and unit conventions, asks a chat-completion model to transcribe the \
line items, and writes the result as a two-sheet XLSX workbook.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: PathBuf,

    /// Output workbook path.
    #[arg(short, long, env = "PDF2INCOME_OUTPUT", default_value = DEFAULT_FILENAME)]
    output: PathBuf,

    /// Model identifier.
    #[arg(long, env = "PDF2INCOME_MODEL")]
    model: Option<String>,

    /// Chat-completion endpoint URL.
    #[arg(long, env = "PDF2INCOME_ENDPOINT")]
    endpoint: Option<String>,

    /// Characters of extracted text embedded in the prompt.
    #[arg(long, env = "PDF2INCOME_PROMPT_LIMIT", default_value_t = 12_000)]
    prompt_limit: usize,

    /// Model call timeout in seconds.
    #[arg(long, env = "PDF2INCOME_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Retries after a failed model call (transient failures only).
    #[arg(long, env = "PDF2INCOME_MAX_RETRIES", default_value_t = 2)]
    max_retries: u32,

    /// Where a duplicated label ends up: its first or last occurrence.
    #[arg(long, env = "PDF2INCOME_ROW_ORDER", value_enum, default_value = "last")]
    row_order: RowOrderArg,

    /// Print the extraction result as JSON to stdout instead of a table.
    #[arg(long, env = "PDF2INCOME_JSON")]
    json: bool,

    /// Skip writing the workbook.
    #[arg(long)]
    no_xlsx: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2INCOME_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2INCOME_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum RowOrderArg {
    First,
    Last,
}

impl From<RowOrderArg> for RowOrder {
    fn from(v: RowOrderArg) -> Self {
        match v {
            RowOrderArg::First => RowOrder::FirstSeen,
            RowOrderArg::Last => RowOrder::LastSeen,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // .env support mirrors the usual local-dev workflow; real deployments
    // set the variable in the environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Config: fail fast on a missing key, before touching the PDF ──────
    let config = build_config(&cli)?;

    // ── Run the pipeline ─────────────────────────────────────────────────
    let output = extract_from_file(&cli.input, &config)
        .await
        .context("Extraction failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?
        );
    } else if !cli.quiet && !output.table.is_empty() {
        print_table(&output)?;
    }

    // ── Empty result: a distinct user path, not a crash ──────────────────
    if output.table.is_empty() {
        eprintln!(
            "{} no structured income statement data detected in '{}'",
            yellow("⚠"),
            cli.input.display()
        );
        return Ok(ExitCode::FAILURE);
    }

    if !cli.no_xlsx {
        export_to_file(&cli.output, &output.table, &output.metadata)
            .context("Failed to write workbook")?;
        if !cli.quiet {
            eprintln!(
                "{} {} line item(s)  {}ms  →  {}",
                green("✔"),
                bold(&output.table.len().to_string()),
                output.stats.total_duration_ms,
                bold(&cli.output.display().to_string()),
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .api_key(std::env::var(pdf2income::config::API_KEY_ENV).unwrap_or_default())
        .prompt_char_limit(cli.prompt_limit)
        .api_timeout_secs(cli.api_timeout)
        .max_retries(cli.max_retries)
        .row_order(cli.row_order.clone().into());

    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref endpoint) = cli.endpoint {
        builder = builder.endpoint(endpoint.clone());
    }

    Ok(builder.build()?)
}

/// Render the result table to stdout, metadata first.
fn print_table(output: &pdf2income::ExtractionOutput) -> Result<()> {
    let stdout = io::stdout();
    let mut w = stdout.lock();

    writeln!(
        w,
        "{}",
        dim(&format!(
            "currency: {}   units: {}   source: {}",
            output.metadata.currency, output.metadata.units, output.metadata.source_file
        ))
    )?;

    let label_width = output
        .table
        .iter()
        .map(|(l, _)| l.chars().count())
        .max()
        .unwrap_or(0)
        .max("Line Item".len());

    writeln!(w, "{:<label_width$}  Values", "Line Item")?;
    for (label, values) in output.table.iter() {
        writeln!(w, "{label:<label_width$}  {}", values.join("  "))?;
    }
    Ok(())
}
