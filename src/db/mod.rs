//! Database layer for the evreg application.
//!
//! Provides the persistence layer built on SQLite: one module per record
//! kind, a shared connection wrapper, and a migration system for schema
//! evolution. Registration rows are append-only; sessions soft-delete once
//! referenced; the reminder ledger enforces at-most-once delivery through a
//! uniqueness constraint.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use evreg::db::sessions::Sessions;
//! use evreg::libs::session::Audience;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut sessions = Sessions::new()?;
//! for status in sessions.list_for(Audience::General)? {
//!     println!("{}: {} spots left", status.session.name, status.remaining());
//! }
//! # Ok(())
//! # }
//! ```

/// Core database connection and initialization module.
pub mod db;

/// Database schema migration system.
pub mod migrations;

/// Reminder ledger: at-most-once bookkeeping for reminder emails.
pub mod reminders;

/// Registration store: append-only intake rows of both kinds.
pub mod registrations;

/// Session directory: catalog, lifecycle, and occupancy views.
pub mod sessions;
