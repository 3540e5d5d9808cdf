//! Registration domain types.
//!
//! Registrations come in two kinds that live in separate tables: general
//! (public signups) and member (a member bringing a guest family). Both carry
//! the same party composition; member rows additionally name the sponsoring
//! member. Rows are append-only facts: created once at admission, never
//! mutated, never deleted in normal operation.

use crate::libs::session::Audience;
use anyhow::Result;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Which registration table a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum RegistrationKind {
    General,
    Member,
}

impl RegistrationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationKind::General => "general",
            RegistrationKind::Member => "member",
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value {
            "member" => RegistrationKind::Member,
            _ => RegistrationKind::General,
        }
    }

    /// The audience a submission of this kind registers as.
    pub fn audience(&self) -> Audience {
        match self {
            RegistrationKind::General => Audience::General,
            RegistrationKind::Member => Audience::Member,
        }
    }
}

/// One child on the roster, as stored in the `children_details` JSON column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    pub name: String,
    pub age: String,
}

/// A registration submission, before admission.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub kind: RegistrationKind,
    /// Sponsoring member, required for member-kind submissions
    pub member_first_name: Option<String>,
    pub member_last_name: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub num_adults: i64,
    pub num_children: i64,
    pub children: Vec<Child>,
    pub comments: String,
    pub request_church_info: bool,
    /// Name of the session this party wants a spot in
    pub session: String,
}

impl NewRegistration {
    /// Checks the internal consistency of a submission.
    ///
    /// The child count must be non-negative and, when a roster is supplied,
    /// must match its length; member submissions must name the member.
    pub fn validate(&self) -> Result<(), String> {
        if self.num_children < 0 {
            return Err("child count cannot be negative".to_string());
        }
        if self.num_adults < 0 {
            return Err("adult count cannot be negative".to_string());
        }
        if !self.children.is_empty() && self.children.len() as i64 != self.num_children {
            return Err(format!(
                "child count ({}) does not match the children listed ({})",
                self.num_children,
                self.children.len()
            ));
        }
        if self.kind == RegistrationKind::Member && (self.member_first_name.is_none() || self.member_last_name.is_none()) {
            return Err("member registrations must name the sponsoring member".to_string());
        }
        Ok(())
    }

    /// Roster serialized for the `children_details` column; `None` when empty.
    pub fn children_json(&self) -> Result<Option<String>> {
        if self.children.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::to_string(&self.children)?))
    }

    /// The stored row this submission became, given its generated id.
    pub fn into_registration(self, id: i64) -> Registration {
        Registration {
            id,
            kind: self.kind,
            member_first_name: self.member_first_name,
            member_last_name: self.member_last_name,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            street_address: self.street_address,
            city: self.city,
            state: self.state,
            zip: self.zip,
            num_adults: self.num_adults,
            num_children: self.num_children,
            children: self.children,
            comments: self.comments,
            request_church_info: self.request_church_info,
            session: self.session,
            created_at: None,
        }
    }
}

/// A stored registration row.
#[derive(Debug, Clone)]
pub struct Registration {
    pub id: i64,
    pub kind: RegistrationKind,
    pub member_first_name: Option<String>,
    pub member_last_name: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub num_adults: i64,
    pub num_children: i64,
    pub children: Vec<Child>,
    pub comments: String,
    pub request_church_info: bool,
    pub session: String,
    pub created_at: Option<NaiveDateTime>,
}

impl Registration {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn member_full_name(&self) -> Option<String> {
        match (&self.member_first_name, &self.member_last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            _ => None,
        }
    }
}

/// Row selection for [`Registrations::fetch`](crate::db::registrations::Registrations::fetch).
#[derive(Debug, Clone)]
pub enum RegistrationFilter {
    All,
    BySession(String),
}

pub(crate) fn parse_children(raw: Option<String>) -> Vec<Child> {
    match raw {
        Some(json) if !json.is_empty() => serde_json::from_str(&json).unwrap_or_default(),
        _ => Vec::new(),
    }
}
