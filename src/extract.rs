//! Top-level extraction entry points.
//!
//! One upload, one linear pass: text → metadata → prompt → model call →
//! parse → assemble. No internal parallelism, no caching, no state shared
//! between runs; the PDF bytes and every intermediate live only for the
//! duration of the call.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::output::{ExtractionOutput, ExtractionStats};
use crate::pipeline::{llm, metadata, parse, table, text};
use crate::prompts::{build_user_prompt, DEFAULT_SYSTEM_PROMPT};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

/// Extract income-statement line items from in-memory PDF bytes.
///
/// This is the primary entry point for the library. `source_name` is
/// recorded in the metadata sheet (typically the uploaded filename).
///
/// # Returns
/// `Ok(ExtractionOutput)` even when the parsed table is empty — callers
/// check [`crate::output::ResultTable::is_empty`] and report "no structured
/// data detected" for that case.
///
/// # Errors
/// * Configuration / input: [`ExtractError::InvalidPdf`],
///   [`ExtractError::NoExtractableText`]
/// * Transport: [`ExtractError::Network`], [`ExtractError::ApiTimeout`],
///   [`ExtractError::ApiStatus`], [`ExtractError::MalformedReply`]
pub async fn extract(
    bytes: &[u8],
    source_name: &str,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let total_start = std::time::Instant::now();
    info!("starting extraction: {} ({} bytes)", source_name, bytes.len());

    // ── Step 1: PDF → plain text ─────────────────────────────────────────
    let extract_start = std::time::Instant::now();
    let document = text::extract_document(bytes)?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    info!(
        "extracted text from {}/{} pages in {}ms",
        document.pages.len(),
        document.total_pages,
        extract_duration_ms
    );

    // ── Step 2: currency / unit detection ────────────────────────────────
    let meta = metadata::detect_metadata(&document.full_text, source_name);
    info!("conventions: currency={} units={}", meta.currency, meta.units);

    // ── Step 3: prompt + model call ──────────────────────────────────────
    let system = config
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_PROMPT);
    let user = build_user_prompt(&document.full_text, config.prompt_char_limit);

    let llm_start = std::time::Instant::now();
    let client = llm::ModelClient::new(config)?;
    let completion = client.complete(system, &user).await?;
    let llm_duration_ms = llm_start.elapsed().as_millis() as u64;
    info!(
        "model replied with {} chars in {}ms",
        completion.content.len(),
        llm_duration_ms
    );

    // ── Step 4: parse + assemble ─────────────────────────────────────────
    let rows = parse::parse_reply(&completion.content);
    let parsed_rows = rows.len();
    let result = table::assemble(rows, config.row_order);

    if result.is_empty() {
        // Valid outcome, not an error: the model replied but no line of the
        // reply carried a numeric token.
        warn!("no structured income-statement data detected in model reply");
    } else {
        info!("assembled {} line item(s)", result.len());
    }

    let stats = ExtractionStats {
        total_pages: document.total_pages,
        text_pages: document.pages.len(),
        extracted_chars: document.full_text.chars().count(),
        prompt_chars: document
            .full_text
            .chars()
            .count()
            .min(config.prompt_char_limit),
        parsed_rows,
        retries: completion.retries,
        extract_duration_ms,
        llm_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    Ok(ExtractionOutput {
        table: result,
        metadata: meta,
        reply: completion.content,
        stats,
    })
}

/// Read a PDF from disk and extract from it.
///
/// Maps missing-file and permission failures to their distinct variants so
/// the CLI can print an actionable message.
pub async fn extract_from_file(
    path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ExtractError::FileNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => ExtractError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ExtractError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let source_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    extract(&bytes, &source_name, config).await
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    bytes: &[u8],
    source_name: &str,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ExtractError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(extract(bytes, source_name, config))
}
