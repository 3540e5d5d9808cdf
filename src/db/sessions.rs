//! Session Directory storage.
//!
//! CRUD over session metadata with referential safety toward registrations:
//! session names stay unique across active and inactive rows, and removal
//! only hard-deletes a session no registration references. Occupancy is never
//! stored; it is derived from the registration tables on every read, so the
//! directory cannot drift from the source of truth.
//!
//! Callers that mutate rows whose occupancy matters (admission, removal) go
//! through [`Admission`](crate::libs::admission::Admission), which wraps these
//! operations in the per-session critical section.

use crate::db::db::Db;
use crate::libs::session::{Audience, NewSession, RemovalOutcome, Session, SessionAudience, SessionStatus, SessionUpdate};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

/// Occupancy of one session: children summed over both registration kinds.
const OCCUPANCY: &str = "SELECT
    COALESCE((SELECT SUM(num_children) FROM general_registrations WHERE session = ?1), 0) +
    COALESCE((SELECT SUM(num_children) FROM member_registrations WHERE session = ?1), 0)";

const INSERT_SESSION: &str =
    "INSERT INTO sessions (name, session_type, session_date, child_limit, display_order) VALUES (?1, ?2, ?3, ?4, ?5)";
const UPDATE_SESSION: &str =
    "UPDATE sessions SET name = ?2, session_type = ?3, session_date = ?4, child_limit = ?5, is_active = ?6, display_order = ?7 WHERE id = ?1";
const DELETE_SESSION: &str = "DELETE FROM sessions WHERE id = ?1";
const DEACTIVATE_SESSION: &str = "UPDATE sessions SET is_active = 0 WHERE id = ?1";
const EXISTS_NAME: &str = "SELECT COUNT(*) FROM sessions WHERE name = ?1";
const EXISTS_NAME_EXCLUDING: &str = "SELECT COUNT(*) FROM sessions WHERE name = ?1 AND id != ?2";
const SELECT_BY_ID: &str = "SELECT id, name, session_type, session_date, child_limit, is_active, display_order FROM sessions WHERE id = ?1";
const SELECT_BY_NAME: &str =
    "SELECT id, name, session_type, session_date, child_limit, is_active, display_order FROM sessions WHERE name = ?1";
const SELECT_ALL: &str =
    "SELECT id, name, session_type, session_date, child_limit, is_active, display_order FROM sessions ORDER BY display_order, id";
const SELECT_ACTIVE_ON_DATE: &str = "SELECT id, name, session_type, session_date, child_limit, is_active, display_order
    FROM sessions
    WHERE is_active = 1 AND session_date IS NOT NULL AND date(session_date) = date(?1)
    ORDER BY display_order, id";
const SELECT_FOR_AUDIENCE: &str = "SELECT id, name, session_type, session_date, child_limit, is_active, display_order
    FROM sessions
    WHERE is_active = 1 AND (session_type = 'both' OR session_type = ?1)
    ORDER BY display_order, id";

/// Stock catalog seeded by `evreg session seed`.
const DEFAULT_SESSIONS: &[(&str, &str, &str, i64, i64)] = &[
    ("Tuesday December 9, 2025 6:00-8:30p", "both", "2025-12-09", 450, 1),
    ("Wednesday December 10, 2025 6:00-8:30p (Friends & Family)", "member", "2025-12-10", 300, 2),
    ("Thursday December 11, 2025 6:00-8:30p", "both", "2025-12-11", 450, 3),
];

/// Typed outcomes of directory mutations, surfaced verbatim to the operator.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("a session named '{0}' already exists")]
    DuplicateName(String),
    #[error("no session with id {0}")]
    NotFound(i64),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for DirectoryError {
    fn from(err: rusqlite::Error) -> Self {
        DirectoryError::Storage(err.into())
    }
}

pub struct Sessions {
    pub conn: Connection,
}

impl Sessions {
    pub fn new() -> Result<Sessions> {
        let db = Db::new()?;
        Ok(Sessions { conn: db.conn })
    }

    /// Creates a session, refusing names already taken by any session,
    /// active or not.
    pub fn create(&mut self, session: &NewSession) -> Result<i64, DirectoryError> {
        if self.name_taken(&session.name, None)? {
            return Err(DirectoryError::DuplicateName(session.name.clone()));
        }
        self.conn.execute(
            INSERT_SESSION,
            params![
                session.name,
                session.audience.as_str(),
                session.session_date,
                session.child_limit,
                session.display_order
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Replaces a session's metadata.
    ///
    /// Lowering `child_limit` below the current occupancy is allowed: it
    /// freezes further admission without revoking existing registrants.
    pub fn update(&mut self, id: i64, update: &SessionUpdate) -> Result<(), DirectoryError> {
        if self.fetch(id)?.is_none() {
            return Err(DirectoryError::NotFound(id));
        }
        if self.name_taken(&update.name, Some(id))? {
            return Err(DirectoryError::DuplicateName(update.name.clone()));
        }
        self.conn.execute(
            UPDATE_SESSION,
            params![
                id,
                update.name,
                update.audience.as_str(),
                update.session_date,
                update.child_limit,
                update.is_active as i64,
                update.display_order
            ],
        )?;
        Ok(())
    }

    /// Removes a session, preserving the audit trail when it is referenced.
    ///
    /// A session with registrations is deactivated in place so the record of
    /// who signed up survives; only a session nothing references is deleted
    /// outright. Call through the admission lock when registrations may be
    /// arriving concurrently.
    pub fn remove(&mut self, id: i64) -> Result<RemovalOutcome, DirectoryError> {
        let session = self.fetch(id)?.ok_or(DirectoryError::NotFound(id))?;
        if self.occupancy(&session.name)? > 0 {
            self.conn.execute(DEACTIVATE_SESSION, params![id])?;
            Ok(RemovalOutcome::Deactivated)
        } else {
            self.conn.execute(DELETE_SESSION, params![id])?;
            Ok(RemovalOutcome::Deleted)
        }
    }

    pub fn fetch(&mut self, id: i64) -> Result<Option<Session>, DirectoryError> {
        let session = self.conn.query_row(SELECT_BY_ID, params![id], row_to_session).optional()?;
        Ok(session)
    }

    pub fn fetch_by_name(&mut self, name: &str) -> Result<Option<Session>, DirectoryError> {
        let session = self.conn.query_row(SELECT_BY_NAME, params![name], row_to_session).optional()?;
        Ok(session)
    }

    pub fn fetch_all(&mut self) -> Result<Vec<Session>, DirectoryError> {
        let mut stmt = self.conn.prepare(SELECT_ALL)?;
        let rows = stmt.query_map([], row_to_session)?;
        let mut sessions = Vec::new();
        for session in rows {
            sessions.push(session?);
        }
        Ok(sessions)
    }

    /// Active sessions whose date falls on the given calendar day.
    pub fn fetch_active_on(&mut self, date: NaiveDate) -> Result<Vec<Session>, DirectoryError> {
        let mut stmt = self.conn.prepare(SELECT_ACTIVE_ON_DATE)?;
        let rows = stmt.query_map(params![date], row_to_session)?;
        let mut sessions = Vec::new();
        for session in rows {
            sessions.push(session?);
        }
        Ok(sessions)
    }

    /// Active sessions offered to the given audience, in display order, each
    /// annotated with live occupancy.
    ///
    /// General registrants see open sessions; members additionally see
    /// member-only ones.
    pub fn list_for(&mut self, audience: Audience) -> Result<Vec<SessionStatus>, DirectoryError> {
        let type_param = match audience {
            Audience::Member => "member",
            Audience::General => "both",
        };
        let sessions = {
            let mut stmt = self.conn.prepare(SELECT_FOR_AUDIENCE)?;
            let rows = stmt.query_map(params![type_param], row_to_session)?;
            let mut sessions = Vec::new();
            for session in rows {
                sessions.push(session?);
            }
            sessions
        };

        let mut statuses = Vec::with_capacity(sessions.len());
        for session in sessions {
            let occupied = self.occupancy(&session.name)?;
            statuses.push(SessionStatus { session, occupied });
        }
        Ok(statuses)
    }

    /// Children currently registered against a session, both kinds included.
    pub fn occupancy(&mut self, name: &str) -> Result<i64, DirectoryError> {
        let occupied = self.conn.query_row(OCCUPANCY, params![name], |row| row.get::<_, i64>(0))?;
        Ok(occupied)
    }

    /// Seeds the stock session catalog; already-present names are left alone.
    pub fn seed_defaults(&mut self) -> Result<usize, DirectoryError> {
        let mut inserted = 0;
        for (name, session_type, date, child_limit, display_order) in DEFAULT_SESSIONS {
            let changed = self.conn.execute(
                "INSERT OR IGNORE INTO sessions (name, session_type, session_date, child_limit, display_order)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![name, session_type, date, child_limit, display_order],
            )?;
            inserted += changed;
        }
        Ok(inserted)
    }

    fn name_taken(&mut self, name: &str, exclude_id: Option<i64>) -> Result<bool, DirectoryError> {
        let count: i64 = match exclude_id {
            Some(id) => self.conn.query_row(EXISTS_NAME_EXCLUDING, params![name, id], |row| row.get(0))?,
            None => self.conn.query_row(EXISTS_NAME, params![name], |row| row.get(0))?,
        };
        Ok(count > 0)
    }
}

fn row_to_session(row: &rusqlite::Row<'_>) -> rusqlite::Result<Session> {
    Ok(Session {
        id: row.get(0)?,
        name: row.get(1)?,
        audience: SessionAudience::from_str(&row.get::<_, String>(2)?),
        session_date: row.get(3)?,
        child_limit: row.get(4)?,
        is_active: row.get::<_, i64>(5)? != 0,
        display_order: row.get(6)?,
    })
}
