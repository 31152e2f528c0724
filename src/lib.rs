//! flextracker library root.
//! Exposes the CLI parser, the high-level run() function and the engine modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod logging;
pub mod mail;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use logging::{LogConfig, init_logging};
use std::io::IsTerminal;
use std::path::Path;
use utils::path::expand_tilde;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg, cli.config.as_deref()),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Roster { .. } => cli::commands::roster::handle(&cli.command, cfg),
        Commands::Inbox => cli::commands::inbox::handle(&cli.command, cfg),
        Commands::Import => cli::commands::import::handle(&cli.command, cfg),
        Commands::Enrich { .. } => cli::commands::enrich::handle(&cli.command, cfg),
        Commands::SyncComments { .. } => cli::commands::sync::handle(&cli.command, cfg),
        Commands::Sheet { .. } => cli::commands::sheet::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();

    init_logging(&LogConfig::from_verbosity(cli.verbose).with_ansi(std::io::stderr().is_terminal()));

    // 2️⃣ load config ONCE
    let mut cfg = Config::load(cli.config.as_deref().map(Path::new))?;

    // 3️⃣ command-line overrides
    if let Some(custom_db) = &cli.db {
        cfg.workbook = expand_tilde(custom_db).to_string_lossy().to_string();
    }
    if let Some(mailbox) = &cli.mailbox {
        cfg.mailbox.path = expand_tilde(mailbox).to_string_lossy().to_string();
    }

    // 4️⃣ hand everything to the dispatcher
    dispatch(&cli, &cfg)
}
