use crate::db::workbook::Workbook;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use std::fs;

pub fn print_db_info(wb: &Workbook, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) SHEETS
    //
    let sheets = wb.sheets()?;
    println!(
        "{}• Sheets:{} {}{}{}",
        CYAN,
        RESET,
        GREEN,
        sheets.len(),
        RESET
    );

    for sheet in &sheets {
        let rows = wb.last_row(sheet)?;
        let cols = wb.last_column(sheet)?;
        if rows == 0 {
            println!("    {} {GREY}(empty){RESET}", sheet.name);
        } else {
            println!("    {} ({} rows × {} cols)", sheet.name, rows, cols);
        }
    }

    //
    // 3) LOG ENTRIES
    //
    let count: i64 = wb
        .conn
        .query_row("SELECT COUNT(*) FROM log", [], |row| row.get(0))?;
    println!("{}• Log entries:{} {}", CYAN, RESET, count);

    println!();
    Ok(())
}
