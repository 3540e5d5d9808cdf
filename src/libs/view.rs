use crate::libs::registration::Registration;
use crate::libs::reminder::SessionSummary;
use crate::libs::session::{Session, SessionStatus};
use anyhow::Result;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn sessions(sessions: &[Session]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "AUDIENCE", "DATE", "LIMIT", "ACTIVE", "ORDER"]);
        for session in sessions {
            table.add_row(row![
                session.id,
                session.name,
                session.audience.as_str(),
                session.session_date.map(|d| d.to_string()).unwrap_or_default(),
                session.child_limit,
                if session.is_active { "yes" } else { "no" },
                session.display_order
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn session_statuses(statuses: &[SessionStatus]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["NAME", "DATE", "LIMIT", "REGISTERED", "REMAINING"]);
        for status in statuses {
            table.add_row(row![
                status.session.name,
                status.session.session_date.map(|d| d.to_string()).unwrap_or_default(),
                status.session.child_limit,
                status.occupied,
                status.remaining()
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn registrations(registrations: &[Registration]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "KIND", "NAME", "EMAIL", "PHONE", "ADULTS", "CHILDREN", "SESSION"]);
        for registration in registrations {
            table.add_row(row![
                registration.id,
                registration.kind.as_str(),
                registration.full_name(),
                registration.email,
                registration.phone,
                registration.num_adults,
                registration.num_children,
                registration.session
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn dispatch_summaries(summaries: &[SessionSummary]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["SESSION", "REGISTRANTS", "SENT", "SKIPPED", "ERRORS"]);
        for summary in summaries {
            table.add_row(row![summary.session, summary.registrants, summary.sent, summary.skipped, summary.errors]);
        }
        table.printstd();

        Ok(())
    }
}
