//! Reminder Dispatch Loop.
//!
//! Finds sessions starting `lead_days` ahead, enumerates their registrants,
//! and drives each one through the reminder ledger before sending. The loop
//! is the retry mechanism: a transport failure leaves no ledger row, so the
//! next run picks the registrant up again, and a completed run re-invoked on
//! the same date skips everyone. One registrant's failure never aborts the
//! rest of the sweep.

use crate::db::registrations::Registrations;
use crate::db::reminders::Reminders;
use crate::db::sessions::Sessions;
use crate::libs::config::ReminderConfig;
use crate::libs::messages::Message;
use crate::libs::registration::Registration;
use crate::mail::{bodies, MailTransport};
use crate::{msg_error, msg_print};
use anyhow::Result;
use chrono::{Duration, NaiveDate};

/// Per-session result of one dispatch sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub session: String,
    pub registrants: usize,
    pub sent: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl SessionSummary {
    fn new(session: &str) -> Self {
        Self {
            session: session.to_string(),
            registrants: 0,
            sent: 0,
            skipped: 0,
            errors: 0,
        }
    }
}

/// The dispatch engine, parameterized over its mail transport.
///
/// The transport and schedule arrive at construction time so callers (and
/// tests) decide what actually goes over the wire.
pub struct ReminderDispatch<T: MailTransport> {
    transport: T,
    lead_days: i64,
    pace_ms: u64,
    dry_run: bool,
}

impl<T: MailTransport> ReminderDispatch<T> {
    pub fn new(transport: T, config: &ReminderConfig) -> Self {
        Self {
            transport,
            lead_days: config.lead_days,
            pace_ms: config.pace_ms,
            dry_run: false,
        }
    }

    /// In dry-run mode registrants are enumerated and classified but nothing
    /// is sent and nothing is recorded.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The scheduled shape: sweep every active session whose date falls
    /// exactly `lead_days` after `today`.
    pub async fn run(&self, today: NaiveDate) -> Result<Vec<SessionSummary>> {
        let target = today + Duration::days(self.lead_days);
        msg_print!(Message::DispatchLookingFor(target.format("%Y-%m-%d").to_string()));

        let sessions = Sessions::new()?.fetch_active_on(target)?;
        if sessions.is_empty() {
            msg_print!(Message::DispatchNoSessions(target.format("%Y-%m-%d").to_string()));
            return Ok(Vec::new());
        }

        let mut summaries = Vec::with_capacity(sessions.len());
        for session in &sessions {
            summaries.push(self.process_session(&session.name).await?);
        }
        Ok(summaries)
    }

    /// The manual shape: sweep one named session regardless of its date,
    /// still through the ledger.
    pub async fn run_session(&self, name: &str) -> Result<SessionSummary> {
        self.process_session(name).await
    }

    async fn process_session(&self, name: &str) -> Result<SessionSummary> {
        msg_print!(Message::DispatchProcessingSession(name.to_string()));

        let registrations = Registrations::new()?.fetch_for_session(name)?;
        msg_print!(Message::DispatchRegistrantCount(registrations.len()));

        let mut reminders = Reminders::new()?;
        let mut summary = SessionSummary::new(name);
        summary.registrants = registrations.len();

        for registration in &registrations {
            if reminders.has_been_sent(name, registration.id, registration.kind)? {
                msg_print!(Message::ReminderSkipped(registration.email.clone()));
                summary.skipped += 1;
                continue;
            }

            if self.dry_run {
                msg_print!(Message::Custom(format!(
                    "[DRY RUN] Would send to: {} ({}) - {}",
                    registration.email,
                    registration.full_name(),
                    registration.session
                )));
                summary.sent += 1;
                continue;
            }

            match self.send_one(registration).await {
                Ok(()) => {
                    reminders.record_sent(name, registration.id, registration.kind, &registration.email)?;
                    msg_print!(Message::ReminderSent(registration.email.clone()));
                    summary.sent += 1;
                }
                Err(reason) => {
                    // No ledger row: the next run retries this registrant
                    msg_error!(Message::ReminderFailed(registration.email.clone(), reason));
                    summary.errors += 1;
                }
            }

            if self.pace_ms > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(self.pace_ms)).await;
            }
        }

        Ok(summary)
    }

    async fn send_one(&self, registration: &Registration) -> Result<(), String> {
        let email = bodies::reminder(registration, self.lead_days);
        self.transport.send(&email).await.map_err(|failure| failure.to_string())
    }
}
