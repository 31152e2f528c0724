pub mod config;
pub mod db;
pub mod enrich;
pub mod export;
pub mod import;
pub mod inbox;
pub mod init;
pub mod log;
pub mod roster;
pub mod sheet;
pub mod sync;

use crate::config::Config;
use crate::db::Workbook;
use crate::errors::AppResult;

/// Open the configured workbook, creating its schema on first use.
pub(crate) fn open_workbook(cfg: &Config) -> AppResult<Workbook> {
    Workbook::open(&cfg.workbook)
}
