//! # pdf2income
//!
//! Extract income-statement line items from annual-report PDFs using an LLM.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Text      extract plain text per page (lopdf, in memory)
//!  ├─ 2. Metadata  detect currency + scale/unit tokens (regex, first match)
//!  ├─ 3. Prompt    fixed instructions + first 12k chars of the text
//!  ├─ 4. Model     one chat-completion call (timeout, bounded retries)
//!  ├─ 5. Parse     reply lines → (label, numeric tokens) rows
//!  ├─ 6. Table     ordered, label-unique result table
//!  └─ 7. Export    two-sheet XLSX workbook
//! ```
//!
//! The model's reply is treated as untrusted free text: a line becomes a row
//! exactly when it contains a numeric token, values are kept verbatim (no
//! numeric parsing that could reformat figures), and nothing in the parser
//! can panic on malformed input.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2income::{extract, export_workbook, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::from_env()?; // OPENROUTER_API_KEY
//!     let bytes = std::fs::read("annual_report.pdf")?;
//!     let output = extract(&bytes, "annual_report.pdf", &config).await?;
//!
//!     if output.table.is_empty() {
//!         eprintln!("no structured income-statement data detected");
//!     } else {
//!         let xlsx = export_workbook(&output.table, &output.metadata)?;
//!         std::fs::write("extracted_income_statement.xlsx", xlsx)?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2income` binary (clap + anyhow + tracing-subscriber + dotenvy) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2income = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, RowOrder};
pub use error::ExtractError;
pub use export::{export_to_file, export_workbook, DEFAULT_FILENAME, XLSX_MIME};
pub use extract::{extract, extract_from_file, extract_sync};
pub use output::{
    Document, ExtractionOutput, ExtractionStats, LineItemRow, Metadata, PageText, ResultTable,
};
