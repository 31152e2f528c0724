use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::import::identify;
use crate::errors::AppResult;
use crate::mail::{DirectoryMailbox, Mailbox};
use crate::ui::messages::{header, info};
use crate::utils::colors::{GREEN, GREY, RESET};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if !matches!(cmd, Commands::Inbox) {
        return Ok(());
    }

    let mailbox = DirectoryMailbox::open(&cfg.mailbox.path)?;
    let messages = mailbox.messages_from(&cfg.mailbox.from)?;

    if messages.is_empty() {
        info(format!("No messages in {}", mailbox.root().display()));
        return Ok(());
    }

    header(format!("Mailbox {}", mailbox.root().display()));
    for m in &messages {
        let kind = match identify(cfg, &m.subject) {
            Some(k) => format!("{GREEN}{:<10}{RESET}", k.as_str()),
            None => format!("{GREY}{:<10}{RESET}", "-"),
        };
        println!(
            "{} {} {}  {}",
            m.date.format("%Y-%m-%d %H:%M"),
            kind,
            m.id,
            m.subject
        );
    }

    Ok(())
}
