//! Display implementation for evreg application messages.
//!
//! Converts the structured `Message` enum into the human-readable text shown
//! in the terminal. All user-facing wording lives here, in one place, so the
//! commands and services never format strings themselves.

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            // === SESSION MESSAGES ===
            Message::SessionCreated(name) => format!("Session '{}' created", name),
            Message::SessionUpdated(name) => format!("Session '{}' updated", name),
            Message::SessionDeleted(name) => format!("Session '{}' deleted (no registrations referenced it)", name),
            Message::SessionDeactivated(name) => {
                format!("Session '{}' has registrations and was deactivated instead of deleted", name)
            }
            Message::SessionNotFoundWithId(id) => format!("No session with id {}", id),
            Message::SessionsSeeded(count) => format!("Seeded {} default session(s)", count),
            Message::SessionsHeader => "Sessions".to_string(),
            Message::NoSessionsFound => "No sessions found".to_string(),
            Message::ConfirmRemoveSession(name) => format!("Remove session '{}'?", name),

            // === REGISTRATION MESSAGES ===
            Message::RegistrationAdmitted { session, remaining } => {
                format!("Registration confirmed for '{}' ({} child spot(s) remaining)", session, remaining)
            }
            Message::RegistrationRejected(reason) => format!("Registration not accepted: {}", reason),
            Message::RegistrationsHeader(scope) => format!("Registrations: {}", scope),
            Message::NoRegistrationsFound => "No registrations found".to_string(),
            Message::ConfirmationEmailSent(email) => format!("Confirmation email sent to {}", email),
            Message::ConfirmationEmailFailed(email, reason) => {
                format!("Registration stands, but the confirmation email to {} failed: {}", email, reason)
            }

            // === REMINDER MESSAGES ===
            Message::DispatchLookingFor(date) => format!("Looking for sessions on {}", date),
            Message::DispatchNoSessions(date) => format!("No sessions found on {}", date),
            Message::DispatchProcessingSession(name) => format!("Processing session: {}", name),
            Message::DispatchRegistrantCount(count) => format!("Found {} registration(s)", count),
            Message::ReminderSent(email) => format!("Sent to: {}", email),
            Message::ReminderSkipped(email) => format!("Skipping {} - already sent", email),
            Message::ReminderFailed(email, reason) => format!("Failed to send to {}: {}", email, reason),
            Message::DispatchSummaryHeader => "Reminder dispatch summary".to_string(),
            Message::DispatchDryRunNotice => "DRY RUN completed. No actual emails were sent.".to_string(),
            Message::DispatchCancelled => "Cancelled. No emails sent.".to_string(),
            Message::ConfirmDispatch(count) => {
                format!("Send reminder emails to {} recipient(s)?", count)
            }

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::ConfigFileNotFound => "Configuration file not found. Run 'evreg init' first".to_string(),
            Message::ConfigParseError => "Failed to parse configuration file".to_string(),
            Message::ConfigSaveError => "Failed to save configuration file".to_string(),
            Message::ConfigModuleSmtp => "Outbound mail (SMTP)".to_string(),
            Message::ConfigModuleAdmin => "Admin credential".to_string(),
            Message::ConfigModuleReminder => "Reminder schedule".to_string(),

            // === EXPORT MESSAGES ===
            Message::ExportSuccess(path) => format!("Data exported successfully to: {}", path),
            Message::ExportNothingToExport => "Nothing to export".to_string(),

            // === DATABASE MESSAGES ===
            Message::MigrationsApplied(version) => format!("Database migrated to version {}", version),
            Message::DbVersion(version) => format!("Database schema version: {}", version),

            // === GENERAL MESSAGES ===
            Message::Custom(text) => text.clone(),
        };
        write!(f, "{}", text)
    }
}
