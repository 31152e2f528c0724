// src/export/xlsx.rs

use crate::errors::{AppError, AppResult};
use crate::export::{SheetExport, notify_export_success};
use crate::models::CellValue;
use crate::ui::messages::info;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

/// Styled header, banded rows, frozen first row and fitted column widths.
pub(crate) fn export_xlsx(sheet: &SheetExport, sheet_name: &str, path: &Path) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    // Excel caps sheet names at 31 characters.
    let name: String = sheet_name.chars().take(31).collect();
    worksheet.set_name(name)?;

    // ---------------------------
    // Header
    // ---------------------------
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in sheet.headers.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, header.as_str(), &header_format)?;
    }

    worksheet.set_freeze_panes(1, 0)?;

    let mut col_widths: Vec<usize> = sheet.headers.iter().map(|h| h.width()).collect();

    let band1 = Color::RGB(0xEAF3FB);
    let band2 = Color::RGB(0xFFFFFF);

    // ---------------------------
    // Rows
    // ---------------------------
    for (row_index, values) in sheet.rows.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let band_color = if row_index % 2 == 0 { band1 } else { band2 };

        for (col, width) in col_widths.iter_mut().enumerate() {
            let value = values.get(col).unwrap_or(&CellValue::Empty);
            write_cell(worksheet, row, col as u16, value, band_color)?;
            *width = (*width).max(value.as_text().width());
        }
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet.set_column_width(c as u16, (*w).min(60) as f64 + 2.0)?;
    }

    workbook.save(path_str(path)?)?;

    notify_export_success("XLSX", path);
    Ok(())
}

/// Numbers stay numbers; text and blanks keep the row band.
fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, value: &CellValue, bg: Color) -> AppResult<()> {
    let base = Format::new()
        .set_background_color(bg)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    match value {
        CellValue::Number(n) => {
            worksheet.write_with_format(row, col, *n, &base.set_align(FormatAlign::Right))?;
        }
        CellValue::Text(s) => {
            worksheet.write_with_format(row, col, s.as_str(), &base)?;
        }
        CellValue::Empty => {
            worksheet.write_blank(row, col, &base)?;
        }
    }
    Ok(())
}

fn path_str(path: &Path) -> AppResult<&str> {
    path.to_str()
        .ok_or_else(|| AppError::Export(format!("invalid path: {}", path.display())))
}
