//! Capacity Ledger: admission decisions under concurrency.
//!
//! Answers "does adding K children to session S exceed its limit?" and, when
//! it does not, makes the decision durable by writing the registration in the
//! same step. The ledger owns no state of its own; occupancy is recomputed
//! from the registration store on every decision, so there is no counter to
//! drift.
//!
//! ## Serializability per session
//!
//! Two concurrent requests that are each individually admissible must not
//! both be admitted when their combined total would exceed capacity. The
//! whole read-aggregate-compare-insert sequence therefore runs under a mutex
//! keyed by session name, handed out by [`SessionLocks`]. Requests against
//! different sessions never contend. All admissions in a process must go
//! through one shared [`Admission`] (clones share the registry).

use crate::db::registrations::Registrations;
use crate::db::sessions::{DirectoryError, Sessions};
use crate::libs::registration::{NewRegistration, RegistrationKind};
use crate::libs::session::{RemovalOutcome, Session};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Typed admission outcomes, surfaced verbatim to the registrant.
#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("invalid registration: {0}")]
    InvalidSubmission(String),
    #[error("session '{0}' not found")]
    SessionNotFound(String),
    #[error("session '{0}' is no longer active")]
    SessionInactive(String),
    #[error("session '{0}' is not open to this registration type")]
    AudienceMismatch(String),
    #[error("only {remaining} spot(s) remaining")]
    CapacityExceeded { remaining: i64 },
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Proof of a durable admission.
#[derive(Debug, Clone)]
pub struct Admitted {
    /// Generated registration id, scoped to its kind
    pub id: i64,
    pub kind: RegistrationKind,
    pub session: String,
    /// Child spots left after this party was seated
    pub remaining: i64,
}

/// Registry handing out one lock per session name.
///
/// Entries are created on first use and kept for the life of the process;
/// the catalog is a handful of sessions, so the map never needs pruning.
#[derive(Default)]
pub struct SessionLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn acquire(&self, name: &str) -> Arc<Mutex<()>> {
        let mut map = self.inner.lock();
        map.entry(name.to_string()).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
    }
}

/// The admission engine. Cheap to clone; clones share the lock registry.
#[derive(Clone, Default)]
pub struct Admission {
    locks: Arc<SessionLocks>,
}

impl Admission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides admission for a submission and, when admitted, records it.
    ///
    /// Runs entirely inside the target session's critical section: resolve
    /// the session, derive occupancy over both registration kinds, compare
    /// against the child limit, and insert the row. The rejection carries the
    /// exact number of spots left so the caller can surface it.
    pub fn try_reserve(&self, submission: &NewRegistration) -> Result<Admitted, AdmissionError> {
        submission.validate().map_err(AdmissionError::InvalidSubmission)?;

        let lock = self.locks.acquire(&submission.session);
        let _guard = lock.lock();

        let session = self.resolve(&submission.session)?;
        if !session.audience.admits(submission.kind.audience()) {
            return Err(AdmissionError::AudienceMismatch(session.name));
        }

        let mut registrations = Registrations::new()?;
        let occupied = registrations.occupancy(&session.name)?;
        crate::msg_debug!(format!(
            "Session '{}': {} of {} child spots taken, requesting {}",
            session.name, occupied, session.child_limit, submission.num_children
        ));
        if occupied + submission.num_children > session.child_limit {
            return Err(AdmissionError::CapacityExceeded {
                remaining: (session.child_limit - occupied).max(0),
            });
        }

        let id = registrations.insert(submission)?;
        Ok(Admitted {
            id,
            kind: submission.kind,
            session: session.name,
            remaining: (session.child_limit - occupied - submission.num_children).max(0),
        })
    }

    /// Removes a session under its own critical section.
    ///
    /// Shares the lock with `try_reserve` so the occupancy probe that picks
    /// between soft and hard delete cannot interleave with an admission for
    /// the same session.
    pub fn remove_session(&self, id: i64) -> Result<(Session, RemovalOutcome), DirectoryError> {
        let mut sessions = Sessions::new().map_err(DirectoryError::Storage)?;
        let session = sessions.fetch(id)?.ok_or(DirectoryError::NotFound(id))?;

        let lock = self.locks.acquire(&session.name);
        let _guard = lock.lock();

        let outcome = sessions.remove(id)?;
        Ok((session, outcome))
    }

    fn resolve(&self, name: &str) -> Result<Session, AdmissionError> {
        let mut sessions = Sessions::new().map_err(AdmissionError::Storage)?;
        let session = sessions
            .fetch_by_name(name)
            .map_err(|err| AdmissionError::Storage(err.into()))?
            .ok_or_else(|| AdmissionError::SessionNotFound(name.to_string()))?;
        if !session.is_active {
            return Err(AdmissionError::SessionInactive(session.name));
        }
        Ok(session)
    }
}
