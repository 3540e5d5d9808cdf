//! Domain services and shared infrastructure.

/// Capacity Ledger: session-serialized admission decisions.
pub mod admission;

/// Application configuration and interactive setup.
pub mod config;

/// Platform-specific application data directory resolution.
pub mod data_storage;

/// Roster and catalog export to CSV, JSON, and Excel.
pub mod export;

/// User-facing message catalog and display macros.
pub mod messages;

/// Registration domain types and validation.
pub mod registration;

/// Reminder dispatch loop.
pub mod reminder;

/// Encrypted credential storage.
pub mod secret;

/// Session domain types.
pub mod session;

/// Terminal table rendering.
pub mod view;
