//! Outbound mail.
//!
//! The engine only ever talks to [`MailTransport`], a seam the dispatch loop
//! and the registration command receive at construction time rather than a
//! process-wide singleton, so tests substitute a recording fake and the
//! production binary plugs in the SMTP relay.
//!
//! No delivery guarantee is assumed beyond the call returning success;
//! failures carry a human-readable reason and leave retry policy to the
//! caller.

pub mod bodies;
pub mod smtp;

use std::future::Future;
use thiserror::Error;

/// A mail send that did not go through.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportFailure(pub String);

/// One outbound message, body already rendered as HTML.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// The collaborator boundary for outbound mail.
pub trait MailTransport: Send + Sync {
    fn send(&self, email: &OutgoingEmail) -> impl Future<Output = Result<(), TransportFailure>> + Send;
}

/// Transport that accepts everything and sends nothing.
///
/// Backs dry runs, where registrants are classified without touching the
/// relay; the dispatch loop never reaches the transport on those paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTransport;

impl MailTransport for NullTransport {
    fn send(&self, _email: &OutgoingEmail) -> impl Future<Output = Result<(), TransportFailure>> + Send {
        std::future::ready(Ok(()))
    }
}
