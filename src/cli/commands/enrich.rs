use crate::cli::commands::open_workbook;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::enrich::EnrichLogic;
use crate::db::log::record_quietly;
use crate::errors::AppResult;
use crate::ui::messages::{detail, info, success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Enrich { roster } = cmd else {
        return Ok(());
    };

    let wb = open_workbook(cfg)?;
    let summary = match EnrichLogic::run(&wb, cfg, roster.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            record_quietly(&wb.conn, "enrich_failed", roster.as_deref().unwrap_or(""), &e.to_string());
            return Err(e);
        }
    };

    if summary.headers_restored {
        warning(format!("Restored enrichment headers on \"{}\"", summary.roster));
    }
    detail(format!(
        "{} rows: {} attendance, {} teacher, {} contact matches",
        summary.data_rows, summary.attendance_matches, summary.course_matches, summary.contact_matches
    ));

    if summary.skippers == 0 {
        info(format!(
            "Enriched \"{}\". No skippers found; \"{}\" is empty.",
            summary.roster, cfg.staging.sheet
        ));
    } else {
        success(format!(
            "Enriched \"{}\". {} skipper(s) staged in \"{}\".",
            summary.roster, summary.skippers, cfg.staging.sheet
        ));
    }
    Ok(())
}
