use crate::cli::commands::open_workbook;
use crate::cli::parser::{Commands, SheetAction};
use crate::config::Config;
use crate::core::extract::{read_csv, read_workbook};
use crate::db::log::record;
use crate::db::Workbook;
use crate::errors::{AppError, AppResult};
use crate::models::column::a1;
use crate::ui::messages::{header, info, success};
use crate::utils::colors::{CYAN, GREY, RESET};
use crate::utils::table::Table;
use std::fs;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Sheet { action } = cmd else {
        return Ok(());
    };
    let wb = open_workbook(cfg)?;

    match action {
        SheetAction::List => list(&wb),
        SheetAction::Show { name, notes } => show(&wb, name, *notes),
        SheetAction::Paste {
            name,
            file,
            row,
            replace,
        } => paste(&wb, name, file, *row, *replace),
    }
}

fn list(wb: &Workbook) -> AppResult<()> {
    let sheets = wb.sheets()?;
    if sheets.is_empty() {
        info("The workbook has no sheets yet.");
        return Ok(());
    }

    let width = sheets.iter().map(|s| s.name.chars().count()).max().unwrap_or(0);
    for sheet in &sheets {
        let rows = wb.last_row(sheet)?;
        let cols = wb.last_column(sheet)?;
        if rows == 0 {
            println!("{CYAN}{:<width$}{RESET}  {GREY}(empty){RESET}", sheet.name);
        } else {
            println!("{CYAN}{:<width$}{RESET}  {rows} rows × {cols} cols", sheet.name);
        }
    }
    Ok(())
}

fn show(wb: &Workbook, name: &str, with_notes: bool) -> AppResult<()> {
    let sheet = wb.require_sheet(name)?;
    let data = wb.values(&sheet)?;

    header(&sheet.name);
    if data.is_empty() {
        info("(empty sheet)");
    } else {
        print!("{}", Table::for_grid(data.text_rows(), 0).render());
    }

    if with_notes {
        let notes = wb.notes(&sheet)?;
        if !notes.is_empty() {
            println!();
            for (r, c, note) in notes {
                println!("{CYAN}{}{RESET}: {}", a1(r, c), note.replace('\n', "\n    "));
            }
        }
    }
    Ok(())
}

/// Write a file's first sheet (or CSV rows) into `name`, the way a user
/// pastes a report. `row` is 1-based.
fn paste(wb: &Workbook, name: &str, file: &str, row: usize, replace: bool) -> AppResult<()> {
    if row == 0 {
        return Err(AppError::Other("--row is 1-based".to_string()));
    }

    let path = Path::new(file);
    let bytes = fs::read(path)?;
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let data = if ext == "csv" {
        read_csv(file, &bytes)?
    } else {
        read_workbook(file, &bytes)?
    };

    let sheet = wb.get_or_create_sheet(name)?;
    if replace {
        wb.clear_rows_from(&sheet, 0)?;
    }
    wb.set_range(&sheet, row - 1, 0, &data.rows)?;

    record(
        &wb.conn,
        "sheet_paste",
        name,
        &format!("{} rows from {} at row {row}", data.len(), path.display()),
    )?;
    success(format!(
        "Pasted {} row(s) into \"{}\" starting at {}",
        data.len(),
        name,
        a1(row - 1, 0)
    ));
    Ok(())
}
