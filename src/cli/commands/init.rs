use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::Workbook;
use crate::db::log::record_quietly;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file and mailbox folder (skipped in test mode)
///  - the SQLite workbook and its schema
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;

    println!("⚙️  Initializing flextracker…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Workbook   : {}", &cfg.workbook);
    println!("📬 Mailbox    : {}", &cfg.mailbox.path);

    let wb = Workbook::open(&cfg.workbook)?;
    record_quietly(
        &wb.conn,
        "init",
        "workbook",
        &format!("Workbook initialized at {}", &cfg.workbook),
    );

    success(format!("Workbook initialized at {}", &cfg.workbook));
    Ok(())
}
