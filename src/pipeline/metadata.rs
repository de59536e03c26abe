//! Currency and scale/unit detection.
//!
//! A single pass over the full document text against two fixed
//! vocabularies. Only the first match in document order counts — no
//! frequency weighting, no later-occurrence override. Annual reports state
//! their convention once in the statement header ("in ₹ crores", "USD
//! millions"), so first-match is both the cheapest and the right heuristic.

use crate::output::Metadata;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Returned when a vocabulary has no match in the text.
pub const UNKNOWN: &str = "Unknown";

// Case-sensitive: "usd" in running prose is not a currency declaration.
static RE_CURRENCY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(USD|INR|\$|₹|EUR)").unwrap());

// Case-insensitive: headers mix "Millions", "MILLIONS", "millions".
static RE_UNITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(millions|thousands|crores|lakhs)").unwrap());

/// Detect the currency and scale/unit tokens in `text`.
///
/// Pure function of the input; returns the matched token verbatim (original
/// case for units) or [`UNKNOWN`] per slot.
pub fn detect(text: &str) -> (String, String) {
    let currency = RE_CURRENCY
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN.to_string());
    let units = RE_UNITS
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN.to_string());
    debug!("detected currency={:?} units={:?}", currency, units);
    (currency, units)
}

/// Convenience wrapper producing a [`Metadata`] record.
pub fn detect_metadata(text: &str, source_file: &str) -> Metadata {
    let (currency, units) = detect(text);
    Metadata {
        currency,
        units,
        source_file: source_file.to_string(),
    }
}
