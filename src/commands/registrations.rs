//! Registration roster listing.

use crate::db::registrations::Registrations;
use crate::libs::messages::Message;
use crate::libs::registration::{RegistrationFilter, RegistrationKind};
use crate::libs::view::View;
use crate::msg_print;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct RegistrationsArgs {
    /// Narrow the roster to one session
    #[arg(long)]
    session: Option<String>,
    /// Narrow the roster to one registration kind
    #[arg(long, value_enum)]
    kind: Option<RegistrationKind>,
}

pub fn cmd(args: RegistrationsArgs) -> Result<()> {
    let filter = match &args.session {
        Some(name) => RegistrationFilter::BySession(name.clone()),
        None => RegistrationFilter::All,
    };
    let kinds = match args.kind {
        Some(kind) => vec![kind],
        None => vec![RegistrationKind::General, RegistrationKind::Member],
    };

    let mut store = Registrations::new()?;
    let mut rows = Vec::new();
    for kind in kinds {
        rows.extend(store.fetch(kind, &filter)?);
    }

    if rows.is_empty() {
        msg_print!(Message::NoRegistrationsFound);
        return Ok(());
    }

    let scope = args.session.as_deref().unwrap_or("all sessions").to_string();
    msg_print!(Message::RegistrationsHeader(scope), true);
    View::registrations(&rows)?;
    Ok(())
}
