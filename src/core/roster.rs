//! Finding and creating the daily flex absences sheet.

use crate::config::{Config, RosterLayout};
use crate::db::{CellRange, FontWeight, Sheet, Workbook};
use crate::errors::{AppError, AppResult};
use crate::models::{CellValue, Row};
use crate::utils::date::roster_token;
use chrono::NaiveDate;
use tracing::{debug, info};

pub const PASTE_HINT: &str = "Paste FlexiSched data here (will overwrite this row and row 2)";

fn instruction_note(layout: &RosterLayout) -> String {
    let first = layout.band.start.letter();
    let last = crate::models::column::column_letter(layout.band.end() - 1);
    format!(
        "Instructions:\n\
         1. Delete all data from this sheet\n\
         2. Paste the FlexiSched report ({} header rows) with `flextracker sheet paste`\n\
         3. Run `flextracker enrich` to fill in attendance, teacher and contacts\n\n\
         The enrichment headers ({first}-{last}) are restored automatically if a paste overwrites them.",
        layout.header_rows
    )
}

/// The roster to work on: `explicit` when given, otherwise the single sheet
/// matching the configured name pattern.
pub fn locate(wb: &Workbook, cfg: &Config, explicit: Option<&str>) -> AppResult<Sheet> {
    if let Some(name) = explicit {
        return wb
            .sheet_by_name(name)?
            .ok_or_else(|| AppError::RosterNotFound(name.to_string()));
    }

    let pattern = cfg.roster.pattern()?;
    let mut found = wb.find_sheets(&pattern)?;
    match found.len() {
        0 => Err(AppError::RosterNotFound(cfg.roster.name_pattern.clone())),
        1 => {
            let sheet = found.remove(0);
            debug!(sheet = %sheet.name, "roster located");
            Ok(sheet)
        }
        _ => Err(AppError::RosterAmbiguous(
            found.into_iter().map(|s| s.name).collect(),
        )),
    }
}

/// Number of data rows below the header band; `EmptyRoster` when none.
pub fn require_data(wb: &Workbook, sheet: &Sheet, header_rows: usize) -> AppResult<usize> {
    let last = wb.last_row(sheet)?;
    if last <= header_rows {
        return Err(AppError::EmptyRoster(sheet.name.clone()));
    }
    Ok(last - header_rows)
}

pub fn sheet_name_for(cfg: &Config, date: NaiveDate) -> String {
    format!("{} {}", roster_token(date), cfg.roster.name_suffix)
}

#[derive(Debug, Clone)]
pub struct RosterCreation {
    pub sheet: Sheet,
    pub created: bool,
}

/// Create `<M.D> flex absences` for `date` with the paste hint in A1 and the
/// enrichment headers in the last header row. An existing sheet is returned
/// untouched.
pub fn create_for_date(wb: &Workbook, cfg: &Config, date: NaiveDate) -> AppResult<RosterCreation> {
    let name = sheet_name_for(cfg, date);
    if let Some(sheet) = wb.sheet_by_name(&name)? {
        return Ok(RosterCreation {
            sheet,
            created: false,
        });
    }

    let layout = cfg.roster_layout()?;
    let sheet = wb.insert_sheet(&name)?;

    wb.set_value(&sheet, 0, 0, CellValue::text(PASTE_HINT))?;
    wb.set_italic(&sheet, CellRange::cell(0, 0), true)?;
    wb.set_note(&sheet, 0, 0, &instruction_note(&layout))?;

    let band = &layout.band;
    let labels: Row = band.labels.iter().map(|l| CellValue::text(l.clone())).collect();
    wb.set_range(&sheet, band.row, band.start.index(), &[labels])?;
    wb.set_font_weight(
        &sheet,
        CellRange::new(band.row, band.start.index(), 1, band.width()),
        FontWeight::Bold,
    )?;

    info!(sheet = %name, "roster sheet created");
    Ok(RosterCreation {
        sheet,
        created: true,
    })
}
