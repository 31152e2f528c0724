// src/export/json_csv.rs

use crate::errors::{AppError, AppResult};
use crate::export::model::Record;
use crate::export::{SheetExport, notify_export_success};
use crate::models::CellValue;
use crate::ui::messages::info;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Pretty-printed array of objects keyed by header.
pub(crate) fn export_json(sheet: &SheetExport, path: &Path) -> AppResult<()> {
    info(format!("Exporting to JSON: {}", path.display()));

    let records: Vec<Record<'_>> = sheet.records().collect();
    let json_data = serde_json::to_string_pretty(&records)
        .map_err(|e| AppError::Export(format!("JSON serialization error: {e}")))?;

    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;

    notify_export_success("JSON", path);
    Ok(())
}

/// CSV with the header row first; every value written as text.
pub(crate) fn export_csv(sheet: &SheetExport, path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(&sheet.headers)?;

    let width = sheet.headers.len();
    for row in &sheet.rows {
        let record: Vec<String> = (0..width)
            .map(|i| row.get(i).map(CellValue::as_text).unwrap_or_default())
            .collect();
        wtr.write_record(&record)?;
    }

    wtr.flush()?;

    notify_export_success("CSV", path);
    Ok(())
}
