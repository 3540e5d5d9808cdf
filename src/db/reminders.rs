//! Reminder Ledger.
//!
//! Records, per (session, registration, kind), that a reminder email went
//! out. The UNIQUE constraint on that tuple is the sole mechanism preventing
//! duplicate delivery: a violating insert means another run already recorded
//! the send, so the violation is absorbed as a benign outcome rather than
//! surfaced as an error. Rows are never updated or deleted by the engine;
//! an operator forcing a resend deletes the row by hand.

use crate::db::db::Db;
use crate::libs::registration::RegistrationKind;
use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

const INSERT_RECORD: &str = "INSERT INTO reminder_emails_sent (session_name, registration_id, registration_type, email)
    VALUES (?1, ?2, ?3, ?4)";
const COUNT_RECORD: &str = "SELECT COUNT(*) FROM reminder_emails_sent
    WHERE session_name = ?1 AND registration_id = ?2 AND registration_type = ?3";
const SELECT_FOR_SESSION: &str = "SELECT id, session_name, registration_id, registration_type, email, sent_at
    FROM reminder_emails_sent WHERE session_name = ?1 ORDER BY id";

/// What `record_sent` did with the insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A fresh row was written
    Recorded,
    /// The tuple already existed; a concurrent or earlier run won the race
    DuplicateSuppressed,
}

/// A ledger row, exposed for operator inspection.
#[derive(Debug, Clone)]
pub struct ReminderRecord {
    pub id: i64,
    pub session_name: String,
    pub registration_id: i64,
    pub kind: RegistrationKind,
    pub email: String,
    pub sent_at: Option<NaiveDateTime>,
}

pub struct Reminders {
    pub conn: Connection,
}

impl Reminders {
    pub fn new() -> Result<Reminders> {
        let db = Db::new()?;
        Ok(Reminders { conn: db.conn })
    }

    /// Pure lookup: has a reminder for this tuple already been recorded?
    pub fn has_been_sent(&mut self, session: &str, registration_id: i64, kind: RegistrationKind) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(COUNT_RECORD, params![session, registration_id, kind.as_str()], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Records a sent reminder; effectively exactly-once per identity tuple.
    ///
    /// A UNIQUE-constraint violation means the record is already there; the
    /// duplicate write is discarded and reported as such, never as an error.
    pub fn record_sent(&mut self, session: &str, registration_id: i64, kind: RegistrationKind, email: &str) -> Result<RecordOutcome> {
        match self.conn.execute(INSERT_RECORD, params![session, registration_id, kind.as_str(), email]) {
            Ok(_) => Ok(RecordOutcome::Recorded),
            Err(rusqlite::Error::SqliteFailure(err, _)) if err.code == rusqlite::ErrorCode::ConstraintViolation => {
                Ok(RecordOutcome::DuplicateSuppressed)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn fetch_for_session(&mut self, session: &str) -> Result<Vec<ReminderRecord>> {
        let mut stmt = self.conn.prepare(SELECT_FOR_SESSION)?;
        let rows = stmt.query_map(params![session], |row| {
            Ok(ReminderRecord {
                id: row.get(0)?,
                session_name: row.get(1)?,
                registration_id: row.get(2)?,
                kind: RegistrationKind::from_str(&row.get::<_, String>(3)?),
                email: row.get(4)?,
                sent_at: row.get(5)?,
            })
        })?;
        let mut records = Vec::new();
        for record in rows {
            records.push(record?);
        }
        Ok(records)
    }
}
