//! Session catalog administration.
//!
//! Adds, edits, removes, and lists sessions. Removal goes through the
//! admission engine so the occupancy probe that decides between deactivation
//! and deletion cannot race an in-flight registration.

use crate::db::sessions::{DirectoryError, Sessions};
use crate::libs::admission::Admission;
use crate::libs::messages::Message;
use crate::libs::session::{Audience, NewSession, RemovalOutcome, SessionAudience, SessionUpdate};
use crate::libs::view::View;
use crate::{msg_error, msg_print, msg_success};
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    command: SessionCommands,
}

#[derive(Debug, Subcommand)]
enum SessionCommands {
    #[command(about = "Add a session to the catalog")]
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, value_enum, default_value = "general-and-member")]
        audience: SessionAudience,
        #[arg(long, help = "Calendar date of the session (YYYY-MM-DD)")]
        date: Option<NaiveDate>,
        #[arg(long, help = "Maximum number of children")]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        order: i64,
    },
    #[command(about = "Update a session")]
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_enum)]
        audience: Option<SessionAudience>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        limit: Option<i64>,
        #[arg(long)]
        active: Option<bool>,
        #[arg(long)]
        order: Option<i64>,
    },
    #[command(about = "Remove a session; deactivates instead when registrations reference it")]
    Remove {
        id: i64,
        #[arg(short, long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
    #[command(about = "List sessions")]
    List {
        #[arg(long, value_enum, help = "Show the registrant-facing view for an audience")]
        audience: Option<Audience>,
    },
    #[command(about = "Seed the default session catalog")]
    Seed,
}

pub fn cmd(args: SessionArgs) -> Result<()> {
    match args.command {
        SessionCommands::Add {
            name,
            audience,
            date,
            limit,
            order,
        } => add(name, audience, date, limit, order),
        SessionCommands::Update {
            id,
            name,
            audience,
            date,
            limit,
            active,
            order,
        } => update(id, name, audience, date, limit, active, order),
        SessionCommands::Remove { id, yes } => remove(id, yes),
        SessionCommands::List { audience } => list(audience),
        SessionCommands::Seed => seed(),
    }
}

fn add(name: String, audience: SessionAudience, date: Option<NaiveDate>, limit: i64, order: i64) -> Result<()> {
    let new_session = NewSession {
        name: name.clone(),
        audience,
        session_date: date,
        child_limit: limit,
        display_order: order,
    };
    match Sessions::new()?.create(&new_session) {
        Ok(_) => msg_success!(Message::SessionCreated(name)),
        Err(DirectoryError::Storage(err)) => return Err(err),
        Err(err) => msg_error!(Message::Custom(err.to_string())),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn update(
    id: i64,
    name: Option<String>,
    audience: Option<SessionAudience>,
    date: Option<NaiveDate>,
    limit: Option<i64>,
    active: Option<bool>,
    order: Option<i64>,
) -> Result<()> {
    let mut sessions = Sessions::new()?;
    let Some(current) = sessions.fetch(id)? else {
        msg_error!(Message::SessionNotFoundWithId(id));
        return Ok(());
    };

    let update = SessionUpdate {
        name: name.unwrap_or(current.name),
        audience: audience.unwrap_or(current.audience),
        session_date: date.or(current.session_date),
        child_limit: limit.unwrap_or(current.child_limit),
        is_active: active.unwrap_or(current.is_active),
        display_order: order.unwrap_or(current.display_order),
    };
    match sessions.update(id, &update) {
        Ok(()) => msg_success!(Message::SessionUpdated(update.name)),
        Err(DirectoryError::Storage(err)) => return Err(err),
        Err(err) => msg_error!(Message::Custom(err.to_string())),
    }
    Ok(())
}

fn remove(id: i64, yes: bool) -> Result<()> {
    let Some(session) = Sessions::new()?.fetch(id)? else {
        msg_error!(Message::SessionNotFoundWithId(id));
        return Ok(());
    };

    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmRemoveSession(session.name.clone()).to_string())
            .default(false)
            .interact()?;
        if !confirmed {
            return Ok(());
        }
    }

    match Admission::new().remove_session(id) {
        Ok((session, RemovalOutcome::Deleted)) => msg_success!(Message::SessionDeleted(session.name)),
        Ok((session, RemovalOutcome::Deactivated)) => msg_success!(Message::SessionDeactivated(session.name)),
        Err(DirectoryError::Storage(err)) => return Err(err),
        Err(err) => msg_error!(Message::Custom(err.to_string())),
    }
    Ok(())
}

fn list(audience: Option<Audience>) -> Result<()> {
    let mut sessions = Sessions::new()?;
    match audience {
        Some(audience) => {
            let statuses = sessions.list_for(audience)?;
            if statuses.is_empty() {
                msg_print!(Message::NoSessionsFound);
                return Ok(());
            }
            View::session_statuses(&statuses)?;
        }
        None => {
            let all = sessions.fetch_all()?;
            if all.is_empty() {
                msg_print!(Message::NoSessionsFound);
                return Ok(());
            }
            View::sessions(&all)?;
        }
    }
    Ok(())
}

fn seed() -> Result<()> {
    let inserted = Sessions::new()?.seed_defaults()?;
    msg_success!(Message::SessionsSeeded(inserted));
    Ok(())
}
