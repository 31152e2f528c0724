use crate::config::HeaderBand;
use crate::db::{CellRange, FontWeight, Sheet, Workbook};
use crate::errors::AppResult;
use crate::models::column::a1;
use crate::models::{CellValue, Column, Row};
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub restored: bool,
    pub mismatched: Vec<Column>,
}

/// Compare the header band with its canonical labels and, on any difference,
/// rewrite the whole band in one write. A band that already matches is not
/// touched.
pub fn reconcile(wb: &Workbook, sheet: &Sheet, band: &HeaderBand) -> AppResult<Reconciliation> {
    let range = CellRange::new(band.row, band.start.index(), 1, band.width());
    let current = wb.get_range(sheet, range)?;
    let current = current.first().map(Vec::as_slice).unwrap_or(&[]);

    let mut mismatched = Vec::new();
    for (i, expected) in band.labels.iter().enumerate() {
        let found = current.get(i).map(CellValue::trimmed_text).unwrap_or_default();
        if found != expected.trim() {
            let column = band.start.offset(i)?;
            warn!(
                sheet = %sheet.name,
                cell = %a1(band.row, column.index()),
                expected = %expected,
                found = %found,
                "enrichment header mismatch"
            );
            mismatched.push(column);
        }
    }

    if mismatched.is_empty() {
        return Ok(Reconciliation::default());
    }

    let labels: Row = band.labels.iter().map(|l| CellValue::text(l.clone())).collect();
    wb.set_range(sheet, band.row, band.start.index(), &[labels])?;
    wb.set_font_weight(sheet, range, FontWeight::Bold)?;

    info!(sheet = %sheet.name, columns = mismatched.len(), "enrichment headers restored");
    Ok(Reconciliation {
        restored: true,
        mismatched,
    })
}
