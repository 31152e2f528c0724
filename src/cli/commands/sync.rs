use crate::cli::commands::open_workbook;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::comments::CommentSync;
use crate::db::log::record_quietly;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::SyncComments { roster } = cmd else {
        return Ok(());
    };

    let wb = open_workbook(cfg)?;
    let summary = match CommentSync::run(&wb, cfg, roster.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            record_quietly(
                &wb.conn,
                "sync_comments_failed",
                roster.as_deref().unwrap_or(""),
                &e.to_string(),
            );
            return Err(e);
        }
    };

    if summary.comments_available == 0 {
        info(format!("No comments found in \"{}\".", cfg.staging.sheet));
        return Ok(());
    }

    success(format!(
        "Updated {} comment(s) on \"{}\".",
        summary.changed, summary.roster
    ));
    if summary.unmatched > 0 {
        warning(format!(
            "{} comment(s) belong to students not on the roster.",
            summary.unmatched
        ));
    }
    Ok(())
}
