//! Report importer: mailbox → extract → transform → destination sheet.

use crate::config::Config;
use crate::core::extract::extract;
use crate::core::transform::{filter_by_period, reorder_columns};
use crate::db::log::record_quietly;
use crate::db::{CellRange, Sheet, Workbook};
use crate::errors::{AppError, AppResult};
use crate::mail::{Mailbox, MessageSummary, tabular_attachments};
use crate::models::{Dataset, ReportKind};
use chrono::{DateTime, FixedOffset, Local};
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    Imported {
        rows: usize,
        received: DateTime<FixedOffset>,
        missing_columns: Vec<String>,
    },
    Missing {
        subject: String,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    pub results: Vec<(ReportKind, ImportOutcome)>,
}

impl ImportSummary {
    pub fn success_count(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, o)| matches!(o, ImportOutcome::Imported { .. }))
            .count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn missing_subjects(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter_map(|(_, o)| match o {
                ImportOutcome::Missing { subject } => Some(subject.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn failed_kinds(&self) -> Vec<ReportKind> {
        self.results
            .iter()
            .filter(|(_, o)| matches!(o, ImportOutcome::Failed { .. }))
            .map(|(k, _)| *k)
            .collect()
    }

    pub fn outcome(&self, kind: ReportKind) -> Option<&ImportOutcome> {
        self.results.iter().find(|(k, _)| *k == kind).map(|(_, o)| o)
    }
}

/// Data of one report before it is written out.
struct Received {
    message: MessageSummary,
    dataset: Dataset,
    missing_columns: Vec<String>,
}

pub struct ImportLogic;

impl ImportLogic {
    /// Import attendance, courses and contacts, in that order. A failing
    /// report is noted on its sheet and never stops the others.
    pub fn run(wb: &Workbook, cfg: &Config, mailbox: &dyn Mailbox) -> AppResult<ImportSummary> {
        let mut summary = ImportSummary::default();

        for kind in ReportKind::ALL {
            let target = cfg.reports.target(kind);
            let outcome = match Self::import_one(wb, cfg, mailbox, kind) {
                Ok(outcome) => outcome,
                Err(e) => {
                    let outcome = match e {
                        AppError::ReportNotFound(subject) => {
                            warn!(kind = %kind, subject = %subject, "report not found");
                            ImportOutcome::Missing { subject }
                        }
                        other => {
                            error!(kind = %kind, sheet = %target.sheet, error = %other, "import failed");
                            ImportOutcome::Failed {
                                error: other.to_string(),
                            }
                        }
                    };
                    Self::note_failure(wb, target.sheet, &outcome);
                    outcome
                }
            };

            record_quietly(&wb.conn, "import", kind.as_str(), &describe(&outcome));
            summary.results.push((kind, outcome));
        }

        info!(
            imported = summary.success_count(),
            total = summary.total(),
            "import finished"
        );
        Ok(summary)
    }

    fn import_one(wb: &Workbook, cfg: &Config, mailbox: &dyn Mailbox, kind: ReportKind) -> AppResult<ImportOutcome> {
        let received = Self::receive(cfg, mailbox, kind)?;
        let target = cfg.reports.target(kind);

        let sheet = wb.get_or_create_sheet(target.sheet)?;
        let rows = write_replacing(wb, &sheet, &received.dataset)?;

        let mut note = format!(
            "Successfully imported on {} from email dated {}",
            timestamp(),
            received.message.date.format("%Y-%m-%d %H:%M")
        );
        if !received.missing_columns.is_empty() {
            note.push_str(&format!(
                "\nMissing columns: {}",
                received.missing_columns.join(", ")
            ));
        }
        wb.set_note(&sheet, 0, 0, &note)?;

        info!(kind = %kind, sheet = %sheet.name, rows, "report imported");
        Ok(ImportOutcome::Imported {
            rows,
            received: received.message.date,
            missing_columns: received.missing_columns,
        })
    }

    /// Find the latest message for `kind`, extract and transform its first
    /// tabular attachment.
    fn receive(cfg: &Config, mailbox: &dyn Mailbox, kind: ReportKind) -> AppResult<Received> {
        let subject = cfg.reports.target(kind).subject;

        let threads = mailbox.search(&cfg.mailbox.from, subject, 1)?;
        let message = threads
            .first()
            .and_then(|t| t.latest())
            .cloned()
            .ok_or_else(|| AppError::ReportNotFound(subject.to_string()))?;

        let attachments = tabular_attachments(mailbox, &message)?;
        let attachment = &attachments[0];
        info!(kind = %kind, file = %attachment.filename, message = %message.id, "attachment found");

        let raw = extract(attachment)?;
        let (dataset, missing_columns) = match kind {
            ReportKind::Attendance => {
                let a = &cfg.reports.attendance;
                (filter_by_period(raw, a.period_column, &a.period_value), Vec::new())
            }
            ReportKind::Courses => {
                let c = &cfg.reports.courses;
                let outcome = reorder_columns(raw, &c.original_columns, &c.target_columns)?;
                (outcome.dataset, outcome.missing)
            }
            ReportKind::Contacts => (raw, Vec::new()),
        };

        Ok(Received {
            message,
            dataset,
            missing_columns,
        })
    }

    /// Best-effort note on the destination sheet for a missing or failed report.
    fn note_failure(wb: &Workbook, sheet_name: &str, outcome: &ImportOutcome) {
        let text = match outcome {
            ImportOutcome::Missing { subject } => AppError::ReportNotFound(subject.clone()).to_string(),
            ImportOutcome::Failed { error } => error.clone(),
            ImportOutcome::Imported { .. } => return,
        };
        let note = format!("{}: {}", timestamp(), text);

        let result = wb
            .get_or_create_sheet(sheet_name)
            .and_then(|sheet| wb.set_note(&sheet, 0, 0, &note));
        if let Err(e) = result {
            warn!(sheet = %sheet_name, error = %e, "could not write status note");
        }
    }
}

/// Report kind whose configured subject appears in `subject`.
pub fn identify(cfg: &Config, subject: &str) -> Option<ReportKind> {
    cfg.reports.identify(subject)
}

/// Clear everything below the header row, then write header + data from A1.
/// Returns the number of data rows written.
fn write_replacing(wb: &Workbook, sheet: &Sheet, dataset: &Dataset) -> AppResult<usize> {
    wb.clear_rows_from(sheet, 1)?;

    // A narrower header must not leave stale labels to its right.
    let old_width = wb.last_column(sheet)?;
    if old_width > dataset.width() {
        wb.clear_range(
            sheet,
            CellRange::new(0, dataset.width(), 1, old_width - dataset.width()),
        )?;
    }

    wb.set_range(sheet, 0, 0, &dataset.rows)?;
    Ok(dataset.len().saturating_sub(1))
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn describe(outcome: &ImportOutcome) -> String {
    match outcome {
        ImportOutcome::Imported {
            rows,
            received,
            missing_columns,
        } => {
            let mut s = format!("imported {rows} rows from email dated {}", received.to_rfc3339());
            if !missing_columns.is_empty() {
                s.push_str(&format!(" (missing columns: {})", missing_columns.join(", ")));
            }
            s
        }
        ImportOutcome::Missing { subject } => format!("report not found: {subject}"),
        ImportOutcome::Failed { error } => format!("failed: {error}"),
    }
}
