use crate::cli::commands::open_workbook;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        sheet,
        format,
        file,
        force,
    } = cmd
    {
        let wb = open_workbook(cfg)?;
        let sheet = sheet.as_deref().unwrap_or(&cfg.staging.sheet);
        ExportLogic::export(&wb, sheet, *format, file, *force)?;
    }
    Ok(())
}
