//! Registration submission command.
//!
//! Drives a submission through the admission engine and, when a spot is
//! reserved, sends the confirmation email best-effort: a mail failure is
//! reported but never rolls back an admitted registration.

use crate::libs::admission::{Admission, AdmissionError};
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::registration::{Child, NewRegistration, RegistrationKind};
use crate::mail::smtp::SmtpMailer;
use crate::mail::{bodies, MailTransport};
use crate::{msg_error, msg_success, msg_warning};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[command(subcommand)]
    command: RegisterCommands,
}

#[derive(Debug, Subcommand)]
enum RegisterCommands {
    #[command(about = "Register a general attendee party")]
    General(PartyArgs),
    #[command(about = "Register a member's guest party")]
    Member(MemberArgs),
}

#[derive(Debug, Args)]
struct MemberArgs {
    /// Sponsoring member's first name
    #[arg(long)]
    member_first_name: String,
    /// Sponsoring member's last name
    #[arg(long)]
    member_last_name: String,
    #[command(flatten)]
    party: PartyArgs,
}

#[derive(Debug, Args)]
struct PartyArgs {
    #[arg(long, help = "Session name the party registers for")]
    session: String,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    state: String,
    #[arg(long)]
    zip: String,
    #[arg(long, default_value_t = 1, help = "Adults and older children (6th grade+)")]
    adults: i64,
    #[arg(long, help = "Number of children; defaults to the roster length")]
    children: Option<i64>,
    #[arg(long = "child", value_parser = parse_child, help = "Child roster entry as NAME:AGE, repeatable")]
    roster: Vec<Child>,
    #[arg(long, default_value = "")]
    comments: String,
    #[arg(long, help = "Request information about the church")]
    request_info: bool,
    #[arg(long, help = "Skip the confirmation email")]
    no_email: bool,
}

fn parse_child(value: &str) -> Result<Child, String> {
    let (name, age) = value
        .rsplit_once(':')
        .ok_or_else(|| format!("expected NAME:AGE, got '{}'", value))?;
    if name.trim().is_empty() {
        return Err(format!("child name missing in '{}'", value));
    }
    Ok(Child {
        name: name.trim().to_string(),
        age: age.trim().to_string(),
    })
}

impl PartyArgs {
    fn into_submission(self, kind: RegistrationKind, member: Option<(String, String)>) -> NewRegistration {
        let num_children = self.children.unwrap_or(self.roster.len() as i64);
        let (member_first_name, member_last_name) = match member {
            Some((first, last)) => (Some(first), Some(last)),
            None => (None, None),
        };
        NewRegistration {
            kind,
            member_first_name,
            member_last_name,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            street_address: self.address,
            city: self.city,
            state: self.state,
            zip: self.zip,
            num_adults: self.adults,
            num_children,
            children: self.roster,
            comments: self.comments,
            request_church_info: self.request_info,
            session: self.session,
        }
    }
}

pub async fn cmd(args: RegisterArgs) -> Result<()> {
    let (submission, no_email) = match args.command {
        RegisterCommands::General(party) => {
            let no_email = party.no_email;
            (party.into_submission(RegistrationKind::General, None), no_email)
        }
        RegisterCommands::Member(member) => {
            let no_email = member.party.no_email;
            (
                member
                    .party
                    .into_submission(RegistrationKind::Member, Some((member.member_first_name, member.member_last_name))),
                no_email,
            )
        }
    };

    let admitted = match Admission::new().try_reserve(&submission) {
        Ok(admitted) => admitted,
        Err(AdmissionError::Storage(err)) => return Err(err),
        Err(err) => {
            msg_error!(Message::RegistrationRejected(err.to_string()));
            return Ok(());
        }
    };

    msg_success!(Message::RegistrationAdmitted {
        session: admitted.session.clone(),
        remaining: admitted.remaining,
    });

    if no_email {
        return Ok(());
    }

    // Best-effort confirmation; the admitted registration stands regardless
    let registration = submission.into_registration(admitted.id);
    match Config::read()?.smtp {
        Some(smtp) => {
            let mailer = SmtpMailer::from_config(&smtp)?;
            let email = bodies::confirmation(&registration);
            match mailer.send(&email).await {
                Ok(()) => msg_success!(Message::ConfirmationEmailSent(registration.email.clone())),
                Err(failure) => {
                    msg_warning!(Message::ConfirmationEmailFailed(registration.email.clone(), failure.to_string()))
                }
            }
        }
        None => msg_warning!(Message::ConfigFileNotFound),
    }

    Ok(())
}
