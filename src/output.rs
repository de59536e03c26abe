//! Data model for extraction results.
//!
//! Everything here is request-scoped: a [`Document`] is built once per
//! upload, flows through the pipeline by reference, and nothing retains it
//! after [`crate::extract`] returns.

use crate::config::RowOrder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Text extracted from a single PDF page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    /// 1-indexed page number in the source document.
    pub number: usize,
    pub text: String,
}

/// The extracted plain-text view of the uploaded PDF.
///
/// Immutable after extraction. `full_text` is the concatenation of the
/// non-empty page texts, each followed by a newline, in page order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Pages that yielded text, in page order. Pages with no extractable
    /// text are absent.
    pub pages: Vec<PageText>,
    /// Total pages in the PDF, including ones that yielded nothing.
    pub total_pages: usize,
    pub full_text: String,
}

/// Currency/unit conventions detected from the document text, plus the
/// source filename. Derived once, read-only thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// One of `USD`, `INR`, `$`, `₹`, `EUR`, or `"Unknown"`.
    pub currency: String,
    /// One of `millions`, `thousands`, `crores`, `lakhs` (as matched,
    /// original case), or `"Unknown"`.
    pub units: String,
    pub source_file: String,
}

/// One parsed income-statement row.
///
/// `values` keeps the numeric tokens exactly as they appeared in the model's
/// reply — thousands separators, `$` prefixes, and parenthesised negatives
/// included — so the export never reformats (and never corrupts) a figure.
/// A row exists only if at least one numeric token was found on its line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemRow {
    pub label: String,
    pub values: Vec<String>,
}

/// Ordered label → values table assembled from parsed rows.
///
/// Labels are unique; the duplicate policy is chosen at assembly time via
/// [`RowOrder`]. In both policies a later duplicate replaces the earlier
/// values entirely (last write wins); they differ only in row placement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTable {
    rows: IndexMap<String, Vec<String>>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row under the given duplicate-placement policy.
    pub fn insert(&mut self, row: LineItemRow, order: RowOrder) {
        match order {
            RowOrder::LastSeen => {
                // shift_remove first so re-insertion lands at the end.
                self.rows.shift_remove(&row.label);
                self.rows.insert(row.label, row.values);
            }
            RowOrder::FirstSeen => {
                // IndexMap::insert keeps the original slot for existing keys.
                self.rows.insert(row.label, row.values);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Widest `values` vector across all rows; 0 for an empty table.
    pub fn max_values(&self) -> usize {
        self.rows.values().map(Vec::len).max().unwrap_or(0)
    }

    pub fn get(&self, label: &str) -> Option<&[String]> {
        self.rows.get(label).map(Vec::as_slice)
    }

    /// Rows in display/export order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.rows.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Timings and counters for one extraction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Total pages in the PDF.
    pub total_pages: usize,
    /// Pages that yielded text.
    pub text_pages: usize,
    /// Characters of extracted text.
    pub extracted_chars: usize,
    /// Characters of text actually embedded in the prompt.
    pub prompt_chars: usize,
    /// Rows emitted by the parser (before duplicate merging).
    pub parsed_rows: usize,
    /// Model-call retries that were needed.
    pub retries: u32,
    pub extract_duration_ms: u64,
    pub llm_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Result of a full extraction run.
///
/// An empty `table` is a valid outcome ("no structured data detected"), kept
/// deliberately distinct from the transport errors in
/// [`crate::error::ExtractError`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    pub table: ResultTable,
    pub metadata: Metadata,
    /// The model's raw reply, kept for display and debugging.
    pub reply: String,
    pub stats: ExtractionStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, values: &[&str]) -> LineItemRow {
        LineItemRow {
            label: label.to_string(),
            values: values.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn last_seen_moves_row_to_end() {
        let mut t = ResultTable::new();
        t.insert(row("Revenue", &["100"]), RowOrder::LastSeen);
        t.insert(row("Cost of Sales", &["40"]), RowOrder::LastSeen);
        t.insert(row("Revenue", &["200"]), RowOrder::LastSeen);

        let labels: Vec<&str> = t.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Cost of Sales", "Revenue"]);
        assert_eq!(t.get("Revenue").unwrap(), ["200".to_string()]);
    }

    #[test]
    fn first_seen_keeps_position_but_replaces_values() {
        let mut t = ResultTable::new();
        t.insert(row("Revenue", &["100"]), RowOrder::FirstSeen);
        t.insert(row("Cost of Sales", &["40"]), RowOrder::FirstSeen);
        t.insert(row("Revenue", &["200"]), RowOrder::FirstSeen);

        let labels: Vec<&str> = t.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Revenue", "Cost of Sales"]);
        assert_eq!(t.get("Revenue").unwrap(), ["200".to_string()]);
    }

    #[test]
    fn max_values_empty_table() {
        assert_eq!(ResultTable::new().max_values(), 0);
    }

    #[test]
    fn max_values_ragged_rows() {
        let mut t = ResultTable::new();
        t.insert(row("A", &["1"]), RowOrder::LastSeen);
        t.insert(row("B", &["1", "2", "3"]), RowOrder::LastSeen);
        assert_eq!(t.max_values(), 3);
    }
}
