use crate::export::ExportFormat;
use clap::{ArgAction, Parser, Subcommand};

/// Command-line interface definition for flextracker
/// Consolidates COGNOS reports and follows up on flex period absences
#[derive(Parser)]
#[command(
    name = "flextracker",
    version = env!("CARGO_PKG_VERSION"),
    about = "Import attendance, course and contact reports, enrich the daily flex absences roster and stage skippers for mailing",
    long_about = None
)]
pub struct Cli {
    /// Override workbook path (useful for tests or a second workbook)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Use this configuration file instead of the standard one
    #[arg(global = true, long = "config", value_name = "FILE")]
    pub config: Option<String>,

    /// Override the mailbox folder
    #[arg(global = true, long = "mailbox", value_name = "DIR")]
    pub mailbox: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Diagnostic verbosity (-v info, -vv debug, -vvv trace)
    #[arg(global = true, short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the workbook and configuration
    Init,

    /// Manage the configuration file (view, check or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Validate the configuration")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the workbook database (integrity checks, statistics)
    Db {
        #[arg(long = "check", help = "Check workbook integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the workbook using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show workbook information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Create or check the daily flex absences sheet
    Roster {
        #[command(subcommand)]
        action: RosterAction,
    },

    /// List report emails in the mailbox
    Inbox,

    /// Import the attendance, course and contact reports from the mailbox
    Import,

    /// Fill in attendance codes, teachers and emails, then stage skippers
    Enrich {
        #[arg(long, value_name = "NAME", help = "Roster sheet to enrich")]
        roster: Option<String>,
    },

    /// Copy comments from the mail-out sheet back to the roster
    SyncComments {
        #[arg(long, value_name = "NAME", help = "Roster sheet to update")]
        roster: Option<String>,
    },

    /// Inspect or fill workbook sheets
    Sheet {
        #[command(subcommand)]
        action: SheetAction,
    },

    /// Export a sheet (default: the mail-out sheet)
    Export {
        #[arg(long, value_name = "NAME")]
        sheet: Option<String>,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum RosterAction {
    /// Create "<M.D> flex absences" for today or --date
    New {
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<String>,
    },

    /// Check and restore the enrichment headers
    Headers {
        #[arg(long, value_name = "NAME")]
        roster: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum SheetAction {
    /// List sheets with their used size
    List,

    /// Print a sheet as a grid
    Show {
        name: String,

        #[arg(long, help = "Also print cell notes")]
        notes: bool,
    },

    /// Write a CSV or spreadsheet file into a sheet
    Paste {
        name: String,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, value_name = "N", default_value_t = 1, help = "First sheet row to write (1-based)")]
        row: usize,

        #[arg(long, help = "Clear the sheet before writing")]
        replace: bool,
    },
}
