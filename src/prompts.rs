//! Prompts for the income-statement transcription call.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — the instruction wording is part of the
//!    pipeline's observable behaviour (it shapes the reply the parser sees),
//!    so changing it should require editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the assembled prompt without
//!    a live model call.
//!
//! Callers can override the persona via
//! [`crate::config::ExtractionConfig::system_prompt`]; the constants here are
//! used only when no override is provided.

/// System persona sent with every request.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a financial analyst extracting income statement rows. \
     Only return rows present in text.";

/// Build the user prompt: fixed instructions plus the first
/// `char_limit` characters of the extracted document text, verbatim.
///
/// Truncation counts characters, not bytes, and therefore always lands on a
/// char boundary even for `₹` and other multibyte text.
pub fn build_user_prompt(full_text: &str, char_limit: usize) -> String {
    let excerpt = truncate_chars(full_text, char_limit);
    format!(
        "Extract Income Statement line items exactly as written below.\n\
         Do not fabricate numbers.\n\
         Text:\n\
         {excerpt}"
    )
}

/// First `limit` characters of `s` (the whole string when shorter).
fn truncate_chars(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}
