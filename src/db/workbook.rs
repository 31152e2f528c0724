//! SQLite-backed workbook: named sheets of cells, with notes and font styles.
//!
//! Rows and columns are zero-based. Every range write runs inside a single
//! transaction, so a failed write leaves the whole range untouched.

use crate::db::migrate::run_pending_migrations;
use crate::errors::{AppError, AppResult};
use crate::models::{CellValue, Dataset, Row};
use chrono::Local;
use regex::Regex;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub id: i64,
    pub name: String,
    pub position: i64,
}

/// Rectangular block of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub row: usize,
    pub col: usize,
    pub rows: usize,
    pub cols: usize,
}

impl CellRange {
    pub fn new(row: usize, col: usize, rows: usize, cols: usize) -> Self {
        Self {
            row,
            col,
            rows,
            cols,
        }
    }

    pub fn cell(row: usize, col: usize) -> Self {
        Self::new(row, col, 1, 1)
    }

    fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    fn last_row(&self) -> usize {
        self.row + self.rows - 1
    }

    fn last_col(&self) -> usize {
        self.col + self.cols - 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
}

pub struct Workbook {
    pub conn: Connection,
}

impl Workbook {
    /// Open (or create) a workbook file and bring its schema up to date.
    pub fn open(path: &str) -> AppResult<Self> {
        let conn = Connection::open(Path::new(path))?;
        run_pending_migrations(&conn)?;
        Ok(Self { conn })
    }

    pub fn in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        run_pending_migrations(&conn)?;
        Ok(Self { conn })
    }

    // ---------------------------
    // Sheets
    // ---------------------------

    /// All sheets in tab order.
    pub fn sheets(&self) -> AppResult<Vec<Sheet>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name, position FROM sheets ORDER BY position ASC, id ASC")?;
        let rows = stmt.query_map([], map_sheet)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn sheet_by_name(&self, name: &str) -> AppResult<Option<Sheet>> {
        let sheet = self
            .conn
            .query_row(
                "SELECT id, name, position FROM sheets WHERE name = ?1",
                [name],
                map_sheet,
            )
            .optional()?;
        Ok(sheet)
    }

    /// Like `sheet_by_name` but missing sheets are an error.
    pub fn require_sheet(&self, name: &str) -> AppResult<Sheet> {
        self.sheet_by_name(name)?
            .ok_or_else(|| AppError::SheetNotFound(name.to_string()))
    }

    /// Sheets whose name matches `pattern`, in tab order.
    pub fn find_sheets(&self, pattern: &Regex) -> AppResult<Vec<Sheet>> {
        Ok(self
            .sheets()?
            .into_iter()
            .filter(|s| pattern.is_match(&s.name))
            .collect())
    }

    /// Append a new sheet at the end of the tab order.
    pub fn insert_sheet(&self, name: &str) -> AppResult<Sheet> {
        if self.sheet_by_name(name)?.is_some() {
            return Err(AppError::SheetExists(name.to_string()));
        }

        let position: i64 = self.conn.query_row(
            "SELECT IFNULL(MAX(position), -1) + 1 FROM sheets",
            [],
            |row| row.get(0),
        )?;

        self.conn.execute(
            "INSERT INTO sheets (name, position, created_at) VALUES (?1, ?2, ?3)",
            params![name, position, Local::now().to_rfc3339()],
        )?;

        debug!(sheet = name, position, "created sheet");

        Ok(Sheet {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            position,
        })
    }

    pub fn get_or_create_sheet(&self, name: &str) -> AppResult<Sheet> {
        match self.sheet_by_name(name)? {
            Some(sheet) => Ok(sheet),
            None => self.insert_sheet(name),
        }
    }

    // ---------------------------
    // Extent
    // ---------------------------

    /// Number of rows up to the last row holding a value (0 for an empty sheet).
    pub fn last_row(&self, sheet: &Sheet) -> AppResult<usize> {
        let max: Option<i64> = self.conn.query_row(
            "SELECT MAX(row) FROM cells WHERE sheet_id = ?1",
            [sheet.id],
            |row| row.get(0),
        )?;
        Ok(max.map(|m| m as usize + 1).unwrap_or(0))
    }

    /// Number of columns up to the last column holding a value.
    pub fn last_column(&self, sheet: &Sheet) -> AppResult<usize> {
        let max: Option<i64> = self.conn.query_row(
            "SELECT MAX(col) FROM cells WHERE sheet_id = ?1",
            [sheet.id],
            |row| row.get(0),
        )?;
        Ok(max.map(|m| m as usize + 1).unwrap_or(0))
    }

    // ---------------------------
    // Values
    // ---------------------------

    /// Read a block of cells; absent cells come back as `Empty`.
    pub fn get_range(&self, sheet: &Sheet, range: CellRange) -> AppResult<Vec<Row>> {
        if range.is_empty() {
            return Ok(Vec::new());
        }

        let mut grid = vec![vec![CellValue::Empty; range.cols]; range.rows];

        let mut stmt = self.conn.prepare_cached(
            "SELECT row, col, value FROM cells
             WHERE sheet_id = ?1 AND row BETWEEN ?2 AND ?3 AND col BETWEEN ?4 AND ?5",
        )?;

        let cells = stmt.query_map(
            params![
                sheet.id,
                range.row as i64,
                range.last_row() as i64,
                range.col as i64,
                range.last_col() as i64
            ],
            |row| {
                Ok((
                    row.get::<_, i64>(0)? as usize,
                    row.get::<_, i64>(1)? as usize,
                    row.get::<_, CellValue>(2)?,
                ))
            },
        )?;

        for c in cells {
            let (r, col, value) = c?;
            grid[r - range.row][col - range.col] = value;
        }

        Ok(grid)
    }

    /// Whole used area of a sheet, anchored at A1.
    pub fn values(&self, sheet: &Sheet) -> AppResult<Dataset> {
        let rows = self.last_row(sheet)?;
        let cols = self.last_column(sheet)?;
        let grid = self.get_range(sheet, CellRange::new(0, 0, rows, cols))?;
        Ok(Dataset::new(grid))
    }

    /// Write a block of values with its top-left corner at (`row`, `col`).
    /// Empty values clear the target cell.
    pub fn set_range(&self, sheet: &Sheet, row: usize, col: usize, values: &[Row]) -> AppResult<()> {
        if values.is_empty() {
            return Ok(());
        }

        let tx = self.conn.unchecked_transaction()?;
        {
            let mut upsert = tx.prepare_cached(
                "INSERT INTO cells (sheet_id, row, col, value) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(sheet_id, row, col) DO UPDATE SET value = excluded.value",
            )?;
            let mut delete =
                tx.prepare_cached("DELETE FROM cells WHERE sheet_id = ?1 AND row = ?2 AND col = ?3")?;

            for (dr, values_row) in values.iter().enumerate() {
                let r = (row + dr) as i64;
                for (dc, value) in values_row.iter().enumerate() {
                    let c = (col + dc) as i64;
                    if value.is_empty() {
                        delete.execute(params![sheet.id, r, c])?;
                    } else {
                        upsert.execute(params![sheet.id, r, c, value])?;
                    }
                }
            }
        }
        tx.commit()?;

        debug!(
            sheet = %sheet.name,
            row,
            col,
            rows = values.len(),
            "range written"
        );
        Ok(())
    }

    pub fn set_value(&self, sheet: &Sheet, row: usize, col: usize, value: CellValue) -> AppResult<()> {
        self.set_range(sheet, row, col, &[vec![value]])
    }

    /// Remove the values of a block (notes and styles stay).
    pub fn clear_range(&self, sheet: &Sheet, range: CellRange) -> AppResult<usize> {
        if range.is_empty() {
            return Ok(0);
        }
        let n = self.conn.execute(
            "DELETE FROM cells
             WHERE sheet_id = ?1 AND row BETWEEN ?2 AND ?3 AND col BETWEEN ?4 AND ?5",
            params![
                sheet.id,
                range.row as i64,
                range.last_row() as i64,
                range.col as i64,
                range.last_col() as i64
            ],
        )?;
        Ok(n)
    }

    /// Clear every value from `start_row` downwards. Returns the number of
    /// rows the cleared block spanned.
    pub fn clear_rows_from(&self, sheet: &Sheet, start_row: usize) -> AppResult<usize> {
        let last_row = self.last_row(sheet)?;
        let last_col = self.last_column(sheet)?;

        if start_row >= last_row || last_col == 0 {
            debug!(sheet = %sheet.name, start_row, "nothing to clear");
            return Ok(0);
        }

        let rows = last_row - start_row;
        self.clear_range(sheet, CellRange::new(start_row, 0, rows, last_col))?;
        debug!(sheet = %sheet.name, start_row, rows, "cleared rows");
        Ok(rows)
    }

    /// Clear values, notes and styles of the whole sheet.
    pub fn clear_sheet(&self, sheet: &Sheet) -> AppResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM cells WHERE sheet_id = ?1", [sheet.id])?;
        tx.execute("DELETE FROM cell_notes WHERE sheet_id = ?1", [sheet.id])?;
        tx.execute("DELETE FROM cell_styles WHERE sheet_id = ?1", [sheet.id])?;
        tx.commit()?;
        Ok(())
    }

    // ---------------------------
    // Notes
    // ---------------------------

    pub fn set_note(&self, sheet: &Sheet, row: usize, col: usize, note: &str) -> AppResult<()> {
        self.conn.execute(
            "INSERT INTO cell_notes (sheet_id, row, col, note) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(sheet_id, row, col) DO UPDATE SET note = excluded.note",
            params![sheet.id, row as i64, col as i64, note],
        )?;
        Ok(())
    }

    pub fn note(&self, sheet: &Sheet, row: usize, col: usize) -> AppResult<Option<String>> {
        let note = self
            .conn
            .query_row(
                "SELECT note FROM cell_notes WHERE sheet_id = ?1 AND row = ?2 AND col = ?3",
                params![sheet.id, row as i64, col as i64],
                |row| row.get(0),
            )
            .optional()?;
        Ok(note)
    }

    /// All notes of a sheet as (row, col, text), in reading order.
    pub fn notes(&self, sheet: &Sheet) -> AppResult<Vec<(usize, usize, String)>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT row, col, note FROM cell_notes WHERE sheet_id = ?1 ORDER BY row, col",
        )?;
        let rows = stmt.query_map([sheet.id], |row| {
            Ok((
                row.get::<_, i64>(0)? as usize,
                row.get::<_, i64>(1)? as usize,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    // ---------------------------
    // Styles
    // ---------------------------

    pub fn set_font_weight(&self, sheet: &Sheet, range: CellRange, weight: FontWeight) -> AppResult<()> {
        let bold = matches!(weight, FontWeight::Bold);
        self.update_styles(sheet, range, "bold", bold)
    }

    pub fn set_italic(&self, sheet: &Sheet, range: CellRange, italic: bool) -> AppResult<()> {
        self.update_styles(sheet, range, "italic", italic)
    }

    pub fn is_bold(&self, sheet: &Sheet, row: usize, col: usize) -> AppResult<bool> {
        self.style_flag(sheet, row, col, "bold")
    }

    pub fn is_italic(&self, sheet: &Sheet, row: usize, col: usize) -> AppResult<bool> {
        self.style_flag(sheet, row, col, "italic")
    }

    fn update_styles(&self, sheet: &Sheet, range: CellRange, flag: &str, on: bool) -> AppResult<()> {
        // `flag` only ever comes from the two callers above.
        let sql = format!(
            "INSERT INTO cell_styles (sheet_id, row, col, {flag}) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(sheet_id, row, col) DO UPDATE SET {flag} = excluded.{flag}"
        );

        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for r in range.row..range.row + range.rows {
                for c in range.col..range.col + range.cols {
                    stmt.execute(params![sheet.id, r as i64, c as i64, on as i64])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn style_flag(&self, sheet: &Sheet, row: usize, col: usize, flag: &str) -> AppResult<bool> {
        let sql = format!(
            "SELECT {flag} FROM cell_styles WHERE sheet_id = ?1 AND row = ?2 AND col = ?3"
        );
        let value: Option<i64> = self
            .conn
            .query_row(&sql, params![sheet.id, row as i64, col as i64], |row| row.get(0))
            .optional()?;
        Ok(value.unwrap_or(0) != 0)
    }
}

fn map_sheet(row: &rusqlite::Row) -> rusqlite::Result<Sheet> {
    Ok(Sheet {
        id: row.get(0)?,
        name: row.get(1)?,
        position: row.get(2)?,
    })
}
