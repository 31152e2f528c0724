use crate::cli::commands::open_workbook;
use crate::cli::parser::{Commands, RosterAction};
use crate::config::Config;
use crate::core::headers::reconcile;
use crate::core::roster;
use crate::db::log::record;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::date::date_or_today;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Roster { action } = cmd else {
        return Ok(());
    };
    let wb = open_workbook(cfg)?;

    match action {
        RosterAction::New { date } => {
            let date = date_or_today(date.as_deref())?;
            let creation = roster::create_for_date(&wb, cfg, date)?;
            if creation.created {
                record(&wb.conn, "roster_new", &creation.sheet.name, "roster sheet created")?;
                success(format!("Created new sheet: \"{}\"", creation.sheet.name));
            } else {
                info(format!(
                    "Sheet \"{}\" already exists. Paste today's data there.",
                    creation.sheet.name
                ));
            }
        }
        RosterAction::Headers { roster: name } => {
            let sheet = roster::locate(&wb, cfg, name.as_deref())?;
            let layout = cfg.roster_layout()?;
            let result = reconcile(&wb, &sheet, &layout.band)?;
            if result.restored {
                let columns: Vec<String> = result.mismatched.iter().map(|c| c.letter()).collect();
                warning(format!(
                    "Restored enrichment headers on \"{}\" (columns {})",
                    sheet.name,
                    columns.join(", ")
                ));
            } else {
                success(format!("Enrichment headers on \"{}\" are in place.", sheet.name));
            }
        }
    }

    Ok(())
}
