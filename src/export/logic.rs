// src/export/logic.rs

use crate::db::Workbook;
use crate::db::log::record;
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::xlsx::export_xlsx;
use crate::export::{ExportFormat, SheetExport};
use crate::ui::messages::warning;
use std::path::Path;
use tracing::info;

pub struct ExportLogic;

impl ExportLogic {
    /// Export one sheet of the workbook.
    ///
    /// - `format`: csv | json | xlsx
    /// - `file`: absolute path of the output file
    /// - `force`: overwrite without asking
    pub fn export(wb: &Workbook, sheet_name: &str, format: ExportFormat, file: &str, force: bool) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        let sheet = wb.require_sheet(sheet_name)?;
        let data = SheetExport::from_dataset(wb.values(&sheet)?);

        if data.is_empty() {
            warning(format!("Sheet '{sheet_name}' is empty, nothing to export."));
            return Ok(0);
        }

        ensure_writable(path, force)?;

        match format {
            ExportFormat::Csv => export_csv(&data, path)?,
            ExportFormat::Json => export_json(&data, path)?,
            ExportFormat::Xlsx => export_xlsx(&data, sheet_name, path)?,
        }

        let rows = data.rows.len();
        record(
            &wb.conn,
            "export",
            sheet_name,
            &format!("{rows} rows to {} ({})", path.display(), format.as_str()),
        )?;
        info!(sheet = %sheet_name, rows, format = format.as_str(), "sheet exported");
        Ok(rows)
    }
}
