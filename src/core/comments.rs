//! Copy follow-up comments typed on the staging sheet back into the roster.

use crate::config::Config;
use crate::core::lookup::StudentLookup;
use crate::core::roster;
use crate::db::log::record;
use crate::db::{CellRange, Workbook};
use crate::errors::{AppError, AppResult};
use crate::models::dataset::cell_at;
use crate::models::Row;
use std::collections::HashSet;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub roster: String,
    /// Staging rows carrying a non-empty comment.
    pub comments_available: usize,
    /// Roster cells whose text actually changed.
    pub changed: usize,
    /// Staging comments whose ID is not on the roster.
    pub unmatched: usize,
}

pub struct CommentSync;

impl CommentSync {
    pub fn run(wb: &Workbook, cfg: &Config, roster_name: Option<&str>) -> AppResult<SyncSummary> {
        let layout = cfg.roster_layout()?;

        let roster = roster::locate(wb, cfg, roster_name)?;
        let staging = wb
            .sheet_by_name(&cfg.staging.sheet)?
            .ok_or_else(|| AppError::SourceTableMissing(cfg.staging.sheet.clone()))?;
        let data_rows = roster::require_data(wb, &roster, layout.header_rows)?;

        let comment_col = layout.comment.index();
        let comments = StudentLookup::build_filtered(
            &wb.values(&staging)?,
            1,
            layout.id,
            &[layout.comment],
            |row| !cell_at(row, comment_col).is_blank(),
        );

        let range = CellRange::new(layout.header_rows, 0, data_rows, comment_col + 1);
        let grid = wb.get_range(&roster, range)?;

        let mut column: Vec<Row> = Vec::with_capacity(grid.len());
        let mut changed = 0;
        let mut matched = HashSet::new();
        for row in &grid {
            let current = cell_at(row, comment_col).clone();
            let id = cell_at(row, layout.id.index()).trimmed_text();

            let next = match comments.first(&id) {
                Some(comment) if !id.is_empty() => {
                    matched.insert(id.clone());
                    comment.clone()
                }
                _ => current.clone(),
            };
            if next.as_text() != current.as_text() {
                changed += 1;
            }
            column.push(vec![next]);
        }

        if changed > 0 {
            wb.set_range(&roster, layout.header_rows, comment_col, &column)?;
            debug!(roster = %roster.name, changed, "comment column written");
        }

        let summary = SyncSummary {
            roster: roster.name.clone(),
            comments_available: comments.len(),
            changed,
            unmatched: comments.len() - matched.len(),
        };

        record(
            &wb.conn,
            "sync_comments",
            &roster.name,
            &format!(
                "{} comments available, {} changed, {} unmatched",
                summary.comments_available, summary.changed, summary.unmatched
            ),
        )?;

        info!(roster = %roster.name, changed, "comments synchronized");
        Ok(summary)
    }
}
