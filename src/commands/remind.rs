//! Reminder dispatch command.
//!
//! The single entry point of the dispatch loop: run from cron for the daily
//! sweep, or by hand with `--session` to target one session, `--dry-run` to
//! classify without sending, and `--list-sessions` to inspect the catalog.
//! Re-running is always safe; the ledger makes repeats skip.

use crate::db::registrations::Registrations;
use crate::db::sessions::Sessions;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::reminder::{ReminderDispatch, SessionSummary};
use crate::libs::view::View;
use crate::mail::smtp::SmtpMailer;
use crate::mail::{MailTransport, NullTransport};
use crate::{msg_bail_anyhow, msg_print};
use anyhow::Result;
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct RemindArgs {
    /// Target one session by name instead of the two-day window
    #[arg(long)]
    session: Option<String>,
    /// Classify registrants without sending or recording anything
    #[arg(long)]
    dry_run: bool,
    /// Print the session catalog and exit
    #[arg(long)]
    list_sessions: bool,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
    /// Pretend today is this date (YYYY-MM-DD); used by the scheduler tests
    #[arg(long)]
    date: Option<NaiveDate>,
}

pub async fn cmd(args: RemindArgs) -> Result<()> {
    if args.list_sessions {
        let sessions = Sessions::new()?.fetch_all()?;
        if sessions.is_empty() {
            msg_print!(Message::NoSessionsFound);
        } else {
            View::sessions(&sessions)?;
        }
        return Ok(());
    }

    let config = Config::read()?;
    let reminder_config = config.reminder.clone().unwrap_or_default();
    let today = args.date.unwrap_or_else(|| Local::now().date_naive());

    if !args.dry_run && !args.yes {
        let recipients = count_recipients(&args.session, today + Duration::days(reminder_config.lead_days))?;
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDispatch(recipients).to_string())
            .default(false)
            .interact()?;
        if !confirmed {
            msg_print!(Message::DispatchCancelled);
            return Ok(());
        }
    }

    let summaries = if args.dry_run {
        let dispatch = ReminderDispatch::new(NullTransport, &reminder_config).dry_run(true);
        run(dispatch, &args.session, today).await?
    } else {
        let Some(smtp) = config.smtp else {
            msg_bail_anyhow!(Message::ConfigFileNotFound);
        };
        let dispatch = ReminderDispatch::new(SmtpMailer::from_config(&smtp)?, &reminder_config);
        run(dispatch, &args.session, today).await?
    };

    if !summaries.is_empty() {
        msg_print!(Message::DispatchSummaryHeader, true);
        View::dispatch_summaries(&summaries)?;
    }
    if args.dry_run {
        msg_print!(Message::DispatchDryRunNotice, true);
    }
    Ok(())
}

async fn run<T: MailTransport>(dispatch: ReminderDispatch<T>, session: &Option<String>, today: NaiveDate) -> Result<Vec<SessionSummary>> {
    match session {
        Some(name) => Ok(vec![dispatch.run_session(name).await?]),
        None => dispatch.run(today).await,
    }
}

/// Counts how many registrants a live run would touch, for the prompt.
fn count_recipients(session: &Option<String>, target: NaiveDate) -> Result<usize> {
    let mut registrations = Registrations::new()?;
    match session {
        Some(name) => Ok(registrations.fetch_for_session(name)?.len()),
        None => {
            let sessions = Sessions::new()?.fetch_active_on(target)?;
            let mut count = 0;
            for session in sessions {
                count += registrations.fetch_for_session(&session.name)?.len();
            }
            Ok(count)
        }
    }
}
