//! Unified application error type.
//! All modules (db, mail, core, cli, export) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Workbook storage
    // ---------------------------
    #[error("Workbook database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Sheet already exists: {0}")]
    SheetExists(String),

    // ---------------------------
    // Report import
    // ---------------------------
    #[error("Failed to convert attachment: {0}")]
    Conversion(String),

    #[error("No spreadsheet attachments found in message {0}")]
    NoAttachment(String),

    #[error("Report not found: {0}")]
    ReportNotFound(String),

    #[error("Column mapping error: {0}")]
    ColumnMapping(String),

    #[error("Mailbox error: {0}")]
    Mailbox(String),

    // ---------------------------
    // Enrichment preconditions
    // ---------------------------
    #[error("No flex absences sheet found matching '{0}'. Create one with `roster new` first.")]
    RosterNotFound(String),

    #[error("More than one flex absences sheet matches: {}. Pick one with --roster.", .0.join(", "))]
    RosterAmbiguous(Vec<String>),

    #[error(
        "No data found in sheet '{0}'. Paste FlexiSched data first (header rows followed by at least one student row)."
    )]
    EmptyRoster(String),

    #[error("Sheet '{0}' not found. Import the COGNOS reports first.")]
    SourceTableMissing(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid column reference: {0}")]
    InvalidColumn(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
