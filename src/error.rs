//! Error types for the pdf2income library.
//!
//! Every failure class the pipeline can hit has its own variant so callers
//! can distinguish the three user-facing outcomes the tool cares about:
//!
//! * **Configuration** — no API key, bad builder input. Nothing was processed.
//! * **Extraction** — the PDF was read but yielded no text (scanned/image-only
//!   documents). Surfaced as a user message, never a crash.
//! * **Transport** — the model call failed (network, timeout, non-2xx,
//!   malformed JSON). Must never be conflated with "no data found": an empty
//!   result table is reported through [`crate::output::ExtractionOutput`],
//!   not through this enum.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2income library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// Required API key is absent from both the config and the environment.
    #[error(
        "No API key configured.\nSet OPENROUTER_API_KEY in the environment (or a .env file), \
         or pass the key explicitly via ExtractionConfig::builder().api_key(..)."
    )]
    MissingApiKey,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Reading the input file failed for another reason.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The bytes are not a parseable PDF document.
    #[error("Input is not a valid PDF: {detail}")]
    InvalidPdf { detail: String },

    /// No page produced any extractable text (e.g. a scanned, image-only
    /// report). OCR is out of scope, so there is nothing to send to the model.
    #[error(
        "No extractable text found on any of the {pages} page(s).\n\
         The PDF is probably scanned/image-only; this tool does not perform OCR."
    )]
    NoExtractableText { pages: usize },

    // ── Transport errors (model call) ─────────────────────────────────────
    /// The HTTP request itself failed (DNS, connection refused, TLS, …).
    #[error("Model request failed: {detail}\nCheck your internet connection and the endpoint URL.")]
    Network { detail: String },

    /// The model call exceeded the configured timeout.
    #[error("Model call timed out after {secs}s\nIncrease --api-timeout or retry later.")]
    ApiTimeout { secs: u64 },

    /// The endpoint answered with a non-2xx status.
    #[error("Model endpoint returned HTTP {status}: {body}")]
    ApiStatus { status: u16, body: String },

    /// The response body was not the expected chat-completion JSON shape
    /// (missing `choices`, empty array, or unparseable body).
    #[error("Malformed model reply: {detail}")]
    MalformedReply { detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Serialising the workbook failed.
    #[error("Failed to build XLSX workbook: {detail}")]
    ExportFailed { detail: String },

    /// Could not write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExtractError {
    /// True for the transport class of failures: the model call itself went
    /// wrong, as opposed to configuration problems or the empty-result path.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ExtractError::Network { .. }
                | ExtractError::ApiTimeout { .. }
                | ExtractError::ApiStatus { .. }
                | ExtractError::MalformedReply { .. }
        )
    }
}
