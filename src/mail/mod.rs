//! Mail search and attachment retrieval.
//!
//! The importer only needs two calls: find the newest thread for a sender and
//! subject, then fetch the attachments of its latest message.

pub mod directory;

pub use directory::DirectoryMailbox;

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, FixedOffset};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSummary {
    pub id: String,
    pub thread: String,
    pub from: String,
    pub subject: String,
    pub date: DateTime<FixedOffset>,
}

/// Messages sharing a thread id, oldest first.
#[derive(Debug, Clone)]
pub struct Thread {
    pub id: String,
    pub messages: Vec<MessageSummary>,
}

impl Thread {
    pub fn latest(&self) -> Option<&MessageSummary> {
        self.messages.iter().max_by_key(|m| m.date)
    }
}

#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

const TABULAR_MIME_TYPES: [&str; 6] = [
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel.sheet.macroenabled.12",
    "application/vnd.ms-excel",
    "application/vnd.ms-excel.sheet.binary.macroenabled.12",
    "application/vnd.oasis.opendocument.spreadsheet",
    "text/csv",
];

const TABULAR_EXTENSIONS: [&str; 6] = ["xlsx", "xlsm", "xls", "xlsb", "ods", "csv"];

impl Attachment {
    /// Lower-case file extension, empty when there is none.
    pub fn extension(&self) -> String {
        Path::new(&self.filename)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }

    /// Spreadsheet or CSV, by MIME type or by extension.
    pub fn is_tabular(&self) -> bool {
        let mime = self.mime_type.to_lowercase();
        TABULAR_MIME_TYPES.contains(&mime.as_str())
            || TABULAR_EXTENSIONS.contains(&self.extension().as_str())
    }
}

/// MIME type guessed from a file name.
pub fn mime_for_filename(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "xlsx" => TABULAR_MIME_TYPES[0],
        "xlsm" => TABULAR_MIME_TYPES[1],
        "xls" => TABULAR_MIME_TYPES[2],
        "xlsb" => TABULAR_MIME_TYPES[3],
        "ods" => TABULAR_MIME_TYPES[4],
        "csv" => TABULAR_MIME_TYPES[5],
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

pub trait Mailbox {
    /// Threads with a message from `from` whose subject contains `subject`,
    /// newest thread first, at most `max_results`.
    fn search(&self, from: &str, subject: &str, max_results: usize) -> AppResult<Vec<Thread>>;

    fn attachments(&self, message_id: &str) -> AppResult<Vec<Attachment>>;

    /// Every message from `from`, newest first.
    fn messages_from(&self, from: &str) -> AppResult<Vec<MessageSummary>>;
}

/// Tabular attachments of a message, in mailbox order.
pub fn tabular_attachments(
    mailbox: &dyn Mailbox,
    message: &MessageSummary,
) -> AppResult<Vec<Attachment>> {
    let found: Vec<Attachment> = mailbox
        .attachments(&message.id)?
        .into_iter()
        .filter(Attachment::is_tabular)
        .collect();

    if found.is_empty() {
        return Err(AppError::NoAttachment(message.subject.clone()));
    }
    Ok(found)
}

/// Address part of a `Name <addr>` header, lower-cased.
pub fn address_of(from: &str) -> String {
    let from = from.trim();
    let addr = match (from.rfind('<'), from.rfind('>')) {
        (Some(start), Some(end)) if start < end => &from[start + 1..end],
        _ => from,
    };
    addr.trim().to_lowercase()
}

/// Sender match used by every mailbox: empty `wanted` matches anyone.
pub fn sender_matches(from: &str, wanted: &str) -> bool {
    wanted.trim().is_empty() || address_of(from) == address_of(wanted)
}
