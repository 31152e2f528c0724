//! Attachment bytes → `Dataset`.
//!
//! Workbooks go through `calamine`, CSV through `csv`. Everything is read from
//! memory: nothing is written to disk, so there is nothing to clean up when a
//! conversion fails halfway.

use crate::errors::{AppError, AppResult};
use crate::mail::Attachment;
use crate::models::{CellValue, Dataset, Row};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Workbook,
    Csv,
}

fn detect_format(attachment: &Attachment) -> Option<Format> {
    match attachment.extension().as_str() {
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => return Some(Format::Workbook),
        "csv" => return Some(Format::Csv),
        _ => {}
    }
    match attachment.mime_type.to_lowercase().as_str() {
        "text/csv" => Some(Format::Csv),
        m if m.contains("spreadsheet") || m.contains("excel") => Some(Format::Workbook),
        _ => None,
    }
}

/// Convert an attachment into a grid anchored at A1. Only the first
/// worksheet of a workbook is read.
pub fn extract(attachment: &Attachment) -> AppResult<Dataset> {
    let format = detect_format(attachment).ok_or_else(|| {
        AppError::Conversion(format!(
            "{}: unsupported file type ({})",
            attachment.filename, attachment.mime_type
        ))
    })?;

    let dataset = match format {
        Format::Workbook => read_workbook(&attachment.filename, &attachment.data)?,
        Format::Csv => read_csv(&attachment.filename, &attachment.data)?,
    };

    debug!(
        file = %attachment.filename,
        rows = dataset.len(),
        cols = dataset.width(),
        "attachment extracted"
    );
    Ok(dataset)
}

/// Read the first worksheet of an in-memory workbook.
pub fn read_workbook(filename: &str, data: &[u8]) -> AppResult<Dataset> {
    let conversion = |e: &dyn std::fmt::Display| AppError::Conversion(format!("{filename}: {e}"));

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(data.to_vec()))
        .map_err(|e| conversion(&e))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(r) => r.map_err(|e| conversion(&e))?,
        None => return Err(conversion(&"workbook has no worksheets")),
    };

    // Anchor at A1: the used range may start further down or right.
    let Some((last_row, last_col)) = range.end() else {
        return Ok(Dataset::default());
    };

    let mut rows = Vec::with_capacity(last_row as usize + 1);
    for r in 0..=last_row {
        let mut row: Row = Vec::with_capacity(last_col as usize + 1);
        for c in 0..=last_col {
            row.push(range.get_value((r, c)).map(to_cell).unwrap_or_default());
        }
        rows.push(row);
    }

    Ok(Dataset::new(rows))
}

fn to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::text(if *b { "TRUE" } else { "FALSE" }),
        // Serial date number, as a spreadsheet stores it.
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s.clone()),
        Data::Error(e) => CellValue::text(e.to_string()),
    }
}

/// Read CSV without header interpretation; every field stays text.
pub fn read_csv(filename: &str, data: &[u8]) -> AppResult<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AppError::Conversion(format!("{filename}: {e}")))?;
        rows.push(record.iter().map(CellValue::text).collect::<Row>());
    }

    Ok(Dataset::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_attachment(body: &str) -> Attachment {
        Attachment {
            filename: "report.csv".to_string(),
            mime_type: "text/csv".to_string(),
            data: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn csv_rows_are_padded() {
        let ds = extract(&csv_attachment("Id,Name,Grade\n1,Ann\n")).unwrap();
        assert_eq!(ds.width(), 3);
        assert_eq!(ds.cell(1, 2), &CellValue::Empty);
        assert_eq!(ds.cell(1, 1), &CellValue::text("Ann"));
    }

    #[test]
    fn garbage_workbook_is_a_conversion_error() {
        let att = Attachment {
            filename: "broken.xlsx".to_string(),
            mime_type: String::new(),
            data: b"not a zip".to_vec(),
        };
        assert!(matches!(extract(&att), Err(AppError::Conversion(_))));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let att = Attachment {
            filename: "notes.txt".to_string(),
            mime_type: "text/plain".to_string(),
            data: Vec::new(),
        };
        assert!(matches!(extract(&att), Err(AppError::Conversion(_))));
    }
}
