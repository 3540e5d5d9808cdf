//! Session domain types.
//!
//! A session is a scheduled time slot attendees register against, with a
//! capacity expressed in children. The directory keeps every session ever
//! created, deactivated ones included, because historical registrations
//! keep referencing them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Who a session is offered to.
///
/// Stored as `session_type` TEXT: `member` for member-only slots, `both` for
/// slots open to general and member registrations alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum SessionAudience {
    MemberOnly,
    GeneralAndMember,
}

impl SessionAudience {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionAudience::MemberOnly => "member",
            SessionAudience::GeneralAndMember => "both",
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value {
            "member" => SessionAudience::MemberOnly,
            _ => SessionAudience::GeneralAndMember,
        }
    }

    /// Whether a requester of the given audience may register here.
    pub fn admits(&self, audience: Audience) -> bool {
        match self {
            SessionAudience::GeneralAndMember => true,
            SessionAudience::MemberOnly => audience == Audience::Member,
        }
    }
}

/// The requesting side of an audience check: which form a registrant used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Audience {
    General,
    Member,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub name: String,
    pub audience: SessionAudience,
    pub session_date: Option<NaiveDate>,
    pub child_limit: i64,
    pub is_active: bool,
    pub display_order: i64,
}

/// A session annotated with live occupancy, as shown to registrants.
#[derive(Debug, Clone)]
pub struct SessionStatus {
    pub session: Session,
    /// Total children currently registered, summed over both kinds
    pub occupied: i64,
}

impl SessionStatus {
    /// Child spots still available; never negative, even when an admin has
    /// lowered the limit below the stored occupancy.
    pub fn remaining(&self) -> i64 {
        (self.session.child_limit - self.occupied).max(0)
    }

    pub fn is_full(&self) -> bool {
        self.occupied >= self.session.child_limit
    }
}

/// Parameters for creating a session.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub name: String,
    pub audience: SessionAudience,
    pub session_date: Option<NaiveDate>,
    pub child_limit: i64,
    pub display_order: i64,
}

/// Full replacement state for an existing session.
#[derive(Debug, Clone)]
pub struct SessionUpdate {
    pub name: String,
    pub audience: SessionAudience,
    pub session_date: Option<NaiveDate>,
    pub child_limit: i64,
    pub is_active: bool,
    pub display_order: i64,
}

/// What `remove` actually did to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// Registrations referenced the session; it was deactivated in place
    Deactivated,
    /// Nothing referenced the session; the row is gone
    Deleted,
}
