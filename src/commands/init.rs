//! Application configuration initialization command.
//!
//! Interactive setup wizard for first-time use: SMTP relay, shared admin
//! credential, and the reminder schedule.

use crate::libs::{config::Config, messages::Message};
use crate::mail::smtp::SmtpMailer;
use crate::msg_success;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Remove existing configuration and the stored SMTP credential
    #[arg(short, long)]
    delete: bool,
}

pub fn cmd(init_args: InitArgs) -> Result<()> {
    if init_args.delete {
        Config::delete()?;
        SmtpMailer::forget_password()?;
        msg_success!(Message::ConfigDeleted);
        return Ok(());
    }

    // Run interactive configuration wizard
    Config::init()?.save()?;

    msg_success!(Message::ConfigSaved);
    Ok(())
}
