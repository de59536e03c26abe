//! Parsing the model's free-text reply into line-item rows.
//!
//! The reply is untrusted input: the model is prompted for one row per line
//! but nothing enforces that. The parser is a best-effort line classifier —
//! a line is a data row exactly when it contains at least one numeric token;
//! everything else (narrative, headers, apologies) is dropped. It must never
//! panic, whatever the reply contains.

use crate::output::LineItemRow;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

// Formatted numbers: optional open paren, optional $, 1–3 digits, optional
// comma-separated 3-digit groups, optional decimal part, optional close
// paren. Covers plain integers, thousands-grouped figures, decimals, and
// parenthesis-wrapped accounting negatives.
static RE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(?\$?\d{1,3}(?:,\d{3})*(?:\.\d+)?\)?").unwrap());

// Characters stripped when deriving a label from a data line. Deliberately
// narrow: currency words (USD, EUR, INR) and the ₹ symbol survive in labels,
// a known cosmetic artifact of the upstream format.
static RE_LABEL_STRIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9,$()]").unwrap());

/// Extract all numeric tokens from one line, left to right, non-overlapping.
pub fn extract_numbers(line: &str) -> Vec<String> {
    RE_NUMBER
        .find_iter(line)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Derive a row label: strip digits, commas, `$` and parentheses, then trim
/// surrounding whitespace. May legitimately be empty (numbers-only lines).
fn derive_label(line: &str) -> String {
    RE_LABEL_STRIP.replace_all(line, "").trim().to_string()
}

/// Parse the model reply into rows, one per newline-delimited data line.
///
/// Lines without a single numeric token are treated as narrative and
/// dropped. A line whose label strips down to nothing is still emitted —
/// only the absence of numbers drops a line.
pub fn parse_reply(reply: &str) -> Vec<LineItemRow> {
    let mut rows = Vec::new();
    for line in reply.split('\n') {
        let values = extract_numbers(line);
        if values.is_empty() {
            continue;
        }
        rows.push(LineItemRow {
            label: derive_label(line),
            values,
        });
    }
    debug!("parsed {} data row(s) from model reply", rows.len());
    rows
}
