//! # Evreg - Event Session Registration
//!
//! A command-line engine for registering attendees into capacity-bounded
//! event sessions and dispatching reminder emails at most once per registrant.
//!
//! ## Features
//!
//! - **Capacity Admission**: Atomic room checks so a session is never booked
//!   past its child limit, even under concurrent submissions
//! - **Session Lifecycle**: Create, update, deactivate, and safely delete
//!   sessions without losing the registration audit trail
//! - **Reminder Ledger**: Durable at-most-once bookkeeping for reminder emails
//! - **Reminder Dispatch**: Daily or on-demand sweep over sessions starting in
//!   two days, safe to re-run arbitrarily often
//! - **Rosters & Export**: Registration tables in the terminal, CSV/JSON/Excel
//!   export for the front desk
//!
//! ## Usage
//!
//! ```rust,no_run
//! use evreg::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
pub mod mail;
