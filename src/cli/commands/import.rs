use crate::cli::commands::open_workbook;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::import::{ImportLogic, ImportOutcome};
use crate::errors::AppResult;
use crate::mail::DirectoryMailbox;
use crate::ui::messages::{detail, error, success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if !matches!(cmd, Commands::Import) {
        return Ok(());
    }

    // Setup errors (no mailbox, no workbook) abort; per-report errors do not.
    let mailbox = DirectoryMailbox::open(&cfg.mailbox.path)?;
    let wb = open_workbook(cfg)?;

    let summary = ImportLogic::run(&wb, cfg, &mailbox)?;

    for (kind, outcome) in &summary.results {
        match outcome {
            ImportOutcome::Imported {
                rows,
                received,
                missing_columns,
            } => {
                detail(format!(
                    "{kind}: {rows} rows from email dated {}",
                    received.format("%Y-%m-%d %H:%M")
                ));
                if !missing_columns.is_empty() {
                    warning(format!(
                        "{kind}: columns not found in report: {}",
                        missing_columns.join(", ")
                    ));
                }
            }
            ImportOutcome::Missing { .. } => detail(format!("{kind}: not found")),
            ImportOutcome::Failed { error: e } => error(format!("{kind}: {e}")),
        }
    }

    let message = format!(
        "Imported {} of {} reports",
        summary.success_count(),
        summary.total()
    );
    if summary.success_count() == summary.total() {
        success(message);
    } else {
        warning(message);
        let missing = summary.missing_subjects();
        if !missing.is_empty() {
            warning(format!("Missing reports:\n  - {}", missing.join("\n  - ")));
        }
        let failed = summary.failed_kinds();
        if !failed.is_empty() {
            let names: Vec<&str> = failed.iter().map(|k| k.as_str()).collect();
            warning(format!("Failed reports: {}", names.join(", ")));
        }
    }

    Ok(())
}
