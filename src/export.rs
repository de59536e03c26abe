//! XLSX export of the result table.
//!
//! Two sheets, no formulas, no styling: "Income Statement" holds the table
//! with a `Line Item` header column and one column per value position, and
//! "Metadata" holds exactly three Field/Value rows (Currency, Units, Source
//! File). Every figure is written as a string so the original formatting —
//! thousands separators, `$`, parenthesised negatives — survives untouched.

use crate::error::ExtractError;
use crate::output::{Metadata, ResultTable};
use rust_xlsxwriter::{Workbook, XlsxError};
use std::path::Path;
use tracing::debug;

/// MIME type of the produced artifact.
pub const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Default download filename.
pub const DEFAULT_FILENAME: &str = "extracted_income_statement.xlsx";

/// Serialize the table and metadata into an in-memory XLSX workbook.
pub fn export_workbook(table: &ResultTable, metadata: &Metadata) -> Result<Vec<u8>, ExtractError> {
    build_workbook(table, metadata)
        .and_then(|mut wb| wb.save_to_buffer())
        .map_err(|e: XlsxError| ExtractError::ExportFailed { detail: e.to_string() })
}

/// Write the workbook to a file on disk.
pub fn export_to_file(
    path: impl AsRef<Path>,
    table: &ResultTable,
    metadata: &Metadata,
) -> Result<(), ExtractError> {
    let path = path.as_ref();
    let buffer = export_workbook(table, metadata)?;
    std::fs::write(path, buffer).map_err(|e| ExtractError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!("wrote workbook to {}", path.display());
    Ok(())
}

fn build_workbook(table: &ResultTable, metadata: &Metadata) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();

    // ── Sheet 1: the line-item table ─────────────────────────────────────
    let sheet = workbook.add_worksheet();
    sheet.set_name("Income Statement")?;

    sheet.write_string(0, 0, "Line Item")?;
    for col in 0..table.max_values() {
        sheet.write_string(0, (col + 1) as u16, format!("Value {}", col + 1))?;
    }

    for (row_idx, (label, values)) in table.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        sheet.write_string(row, 0, label)?;
        for (col_idx, value) in values.iter().enumerate() {
            sheet.write_string(row, (col_idx + 1) as u16, value)?;
        }
    }

    // ── Sheet 2: metadata ────────────────────────────────────────────────
    let meta = workbook.add_worksheet();
    meta.set_name("Metadata")?;
    meta.write_string(0, 0, "Field")?;
    meta.write_string(0, 1, "Value")?;
    for (i, (field, value)) in [
        ("Currency", metadata.currency.as_str()),
        ("Units", metadata.units.as_str()),
        ("Source File", metadata.source_file.as_str()),
    ]
    .into_iter()
    .enumerate()
    {
        let row = (i + 1) as u32;
        meta.write_string(row, 0, field)?;
        meta.write_string(row, 1, value)?;
    }

    Ok(workbook)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RowOrder;
    use crate::output::LineItemRow;
    use calamine::{Reader, Xlsx};
    use std::io::Cursor;

    fn sample_table() -> ResultTable {
        let mut t = ResultTable::new();
        t.insert(
            LineItemRow {
                label: "Revenue".into(),
                values: vec!["1,234.50".into(), "1,100".into()],
            },
            RowOrder::LastSeen,
        );
        t.insert(
            LineItemRow {
                label: "Cost of Sales".into(),
                values: vec!["(567)".into()],
            },
            RowOrder::LastSeen,
        );
        t
    }

    fn sample_metadata() -> Metadata {
        Metadata {
            currency: "INR".into(),
            units: "crores".into(),
            source_file: "report.pdf".into(),
        }
    }

    fn reopen(buffer: Vec<u8>) -> Xlsx<Cursor<Vec<u8>>> {
        calamine::open_workbook_from_rs(Cursor::new(buffer)).unwrap()
    }

    #[test]
    fn workbook_has_both_sheets() {
        let buffer = export_workbook(&sample_table(), &sample_metadata()).unwrap();
        let workbook = reopen(buffer);
        let names = workbook.sheet_names().to_vec();
        assert_eq!(names, vec!["Income Statement", "Metadata"]);
    }

    #[test]
    fn statement_sheet_layout() {
        let buffer = export_workbook(&sample_table(), &sample_metadata()).unwrap();
        let mut workbook = reopen(buffer);
        let range = workbook.worksheet_range("Income Statement").unwrap();

        // Header + 2 data rows; Line Item + 2 value columns.
        assert_eq!(range.height(), 3);
        assert_eq!(range.width(), 3);
        assert_eq!(range.get_value((0, 0)).unwrap().to_string(), "Line Item");
        assert_eq!(range.get_value((1, 0)).unwrap().to_string(), "Revenue");
        // Values stay strings: formatting intact.
        assert_eq!(range.get_value((1, 1)).unwrap().to_string(), "1,234.50");
        assert_eq!(range.get_value((2, 1)).unwrap().to_string(), "(567)");
    }

    #[test]
    fn metadata_sheet_has_three_data_rows() {
        let buffer = export_workbook(&sample_table(), &sample_metadata()).unwrap();
        let mut workbook = reopen(buffer);
        let range = workbook.worksheet_range("Metadata").unwrap();

        assert_eq!(range.height(), 4); // header + 3 rows
        assert_eq!(range.get_value((0, 0)).unwrap().to_string(), "Field");
        assert_eq!(range.get_value((1, 0)).unwrap().to_string(), "Currency");
        assert_eq!(range.get_value((1, 1)).unwrap().to_string(), "INR");
        assert_eq!(range.get_value((2, 1)).unwrap().to_string(), "crores");
        assert_eq!(range.get_value((3, 1)).unwrap().to_string(), "report.pdf");
    }

    #[test]
    fn empty_table_still_produces_valid_workbook() {
        let buffer = export_workbook(&ResultTable::new(), &sample_metadata()).unwrap();
        let mut workbook = reopen(buffer);
        let range = workbook.worksheet_range("Income Statement").unwrap();
        assert_eq!(range.get_value((0, 0)).unwrap().to_string(), "Line Item");
    }

    #[test]
    fn export_to_file_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_FILENAME);
        export_to_file(&path, &sample_table(), &sample_metadata()).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        // XLSX is a ZIP container.
        assert_eq!(&bytes[..2], b"PK");
    }
}
