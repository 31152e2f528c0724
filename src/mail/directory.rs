//! Mailbox backed by a folder: one sub-folder per message, described by a
//! `message.yaml` file.
//!
//! ```yaml
//! from: "Jo Smith <jo@school.org>"
//! subject: "A new version of My ATT - Attendance Bulletin is available"
//! date: 2025-11-03T07:15:00-08:00
//! thread: attendance        # optional, defaults to the folder name
//! attachments:              # optional, defaults to every other file
//!   - file: bulletin.xlsx
//!     mime_type: application/vnd.openxmlformats-officedocument.spreadsheetml.sheet
//! ```

use super::{Attachment, Mailbox, MessageSummary, Thread, mime_for_filename, sender_matches};
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const MESSAGE_FILE: &str = "message.yaml";

#[derive(Debug, Deserialize)]
struct MessageFile {
    from: String,
    subject: String,
    date: DateTime<FixedOffset>,
    #[serde(default)]
    thread: Option<String>,
    #[serde(default)]
    attachments: Option<Vec<AttachmentEntry>>,
}

#[derive(Debug, Deserialize)]
struct AttachmentEntry {
    file: String,
    #[serde(default)]
    mime_type: Option<String>,
}

pub struct DirectoryMailbox {
    root: PathBuf,
}

impl DirectoryMailbox {
    pub fn open<P: AsRef<Path>>(root: P) -> AppResult<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(AppError::Mailbox(format!(
                "mailbox folder not found: {}",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_message(&self, dir: &Path) -> AppResult<MessageFile> {
        let path = dir.join(MESSAGE_FILE);
        let content = fs::read_to_string(&path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Mailbox(format!("{}: {e}", path.display())))
    }

    /// Every readable message. Folders without `message.yaml` are ignored;
    /// malformed ones are skipped with a warning.
    fn load_all(&self) -> AppResult<Vec<MessageSummary>> {
        let mut out = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let dir = entry.path();
            if !dir.is_dir() || !dir.join(MESSAGE_FILE).is_file() {
                continue;
            }

            let id = entry.file_name().to_string_lossy().to_string();
            match self.read_message(&dir) {
                Ok(m) => out.push(MessageSummary {
                    thread: m.thread.unwrap_or_else(|| id.clone()),
                    id,
                    from: m.from,
                    subject: m.subject,
                    date: m.date,
                }),
                Err(e) => warn!(message = %id, error = %e, "skipping unreadable message"),
            }
        }

        debug!(count = out.len(), root = %self.root.display(), "mailbox scanned");
        Ok(out)
    }

    fn message_dir(&self, message_id: &str) -> AppResult<PathBuf> {
        let dir = self.root.join(message_id);
        // Message ids are folder names; refuse anything that walks elsewhere.
        if message_id.contains(['/', '\\']) || message_id == ".." || !dir.is_dir() {
            return Err(AppError::Mailbox(format!("message not found: {message_id}")));
        }
        Ok(dir)
    }
}

impl Mailbox for DirectoryMailbox {
    fn search(&self, from: &str, subject: &str, max_results: usize) -> AppResult<Vec<Thread>> {
        let mut threads: HashMap<String, Vec<MessageSummary>> = HashMap::new();
        for m in self.load_all()? {
            if sender_matches(&m.from, from) && m.subject.contains(subject) {
                threads.entry(m.thread.clone()).or_default().push(m);
            }
        }

        let mut threads: Vec<Thread> = threads
            .into_iter()
            .map(|(id, mut messages)| {
                messages.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
                Thread { id, messages }
            })
            .collect();

        // Newest thread first: compare by latest message date.
        threads.sort_by(|a, b| {
            let da = a.latest().map(|m| m.date);
            let db = b.latest().map(|m| m.date);
            db.cmp(&da).then_with(|| a.id.cmp(&b.id))
        });
        threads.truncate(max_results);
        Ok(threads)
    }

    fn attachments(&self, message_id: &str) -> AppResult<Vec<Attachment>> {
        let dir = self.message_dir(message_id)?;
        let message = self.read_message(&dir)?;

        let entries = match message.attachments {
            Some(list) => list,
            None => {
                let mut names = Vec::new();
                for entry in fs::read_dir(&dir)? {
                    let entry = entry?;
                    let name = entry.file_name().to_string_lossy().to_string();
                    if entry.path().is_file() && name != MESSAGE_FILE {
                        names.push(name);
                    }
                }
                names.sort();
                names
                    .into_iter()
                    .map(|file| AttachmentEntry {
                        file,
                        mime_type: None,
                    })
                    .collect()
            }
        };

        let mut out = Vec::with_capacity(entries.len());
        for entry in entries {
            let path = dir.join(&entry.file);
            let data = fs::read(&path).map_err(|e| {
                AppError::Mailbox(format!("cannot read attachment {}: {e}", path.display()))
            })?;
            let mime_type = entry
                .mime_type
                .unwrap_or_else(|| mime_for_filename(&entry.file).to_string());
            out.push(Attachment {
                filename: entry.file,
                mime_type,
                data,
            });
        }
        Ok(out)
    }

    fn messages_from(&self, from: &str) -> AppResult<Vec<MessageSummary>> {
        let mut out: Vec<MessageSummary> = self
            .load_all()?
            .into_iter()
            .filter(|m| sender_matches(&m.from, from))
            .collect();
        out.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }
}
