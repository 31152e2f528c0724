use rusqlite::{Connection, OptionalExtension, Result};
use tracing::info;

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Check if a table exists.
fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Check whether a migration version has already been recorded in `log`.
fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Create the sheet/cell tables.
///
/// `cells.value` is declared without a type so SQLite keeps the storage
/// class of what was written: TEXT stays text, REAL stays a number.
fn create_workbook_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sheets (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL UNIQUE,
            position    INTEGER NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS cells (
            sheet_id    INTEGER NOT NULL REFERENCES sheets(id) ON DELETE CASCADE,
            row         INTEGER NOT NULL,
            col         INTEGER NOT NULL,
            value,
            PRIMARY KEY (sheet_id, row, col)
        );

        CREATE TABLE IF NOT EXISTS cell_notes (
            sheet_id    INTEGER NOT NULL REFERENCES sheets(id) ON DELETE CASCADE,
            row         INTEGER NOT NULL,
            col         INTEGER NOT NULL,
            note        TEXT NOT NULL,
            PRIMARY KEY (sheet_id, row, col)
        );

        CREATE TABLE IF NOT EXISTS cell_styles (
            sheet_id    INTEGER NOT NULL REFERENCES sheets(id) ON DELETE CASCADE,
            row         INTEGER NOT NULL,
            col         INTEGER NOT NULL,
            bold        INTEGER NOT NULL DEFAULT 0,
            italic      INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (sheet_id, row, col)
        );

        CREATE INDEX IF NOT EXISTS idx_cells_sheet_row ON cells(sheet_id, row);
        "#,
    )?;
    Ok(())
}

const WORKBOOK_VERSION: &str = "20251103_0001_workbook_tables";

/// Public entry point: run all pending migrations.
///
/// Invoked by `Workbook::open` and `Workbook::in_memory`, so every command
/// sees the current schema.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    ensure_log_table(conn)?;

    let fresh = !table_exists(conn, "sheets")?;
    create_workbook_tables(conn)?;

    if !is_applied(conn, WORKBOOK_VERSION)? {
        mark_applied(conn, WORKBOOK_VERSION, "Created workbook tables")?;
        info!(version = WORKBOOK_VERSION, fresh, "migration applied");
    }

    Ok(())
}
