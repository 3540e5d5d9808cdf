#[derive(Debug, Clone)]
pub enum Message {
    // === SESSION MESSAGES ===
    SessionCreated(String),
    SessionUpdated(String),
    SessionDeleted(String),
    SessionDeactivated(String),
    SessionNotFoundWithId(i64),
    SessionsSeeded(usize),
    SessionsHeader,
    NoSessionsFound,
    ConfirmRemoveSession(String),

    // === REGISTRATION MESSAGES ===
    RegistrationAdmitted { session: String, remaining: i64 },
    RegistrationRejected(String),
    RegistrationsHeader(String),
    NoRegistrationsFound,
    ConfirmationEmailSent(String),
    ConfirmationEmailFailed(String, String), // recipient, reason

    // === REMINDER MESSAGES ===
    DispatchLookingFor(String),       // target date
    DispatchNoSessions(String),       // target date
    DispatchProcessingSession(String),
    DispatchRegistrantCount(usize),
    ReminderSent(String),
    ReminderSkipped(String),
    ReminderFailed(String, String), // recipient, reason
    DispatchSummaryHeader,
    DispatchDryRunNotice,
    DispatchCancelled,
    ConfirmDispatch(usize), // recipient count

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigFileNotFound,
    ConfigParseError,
    ConfigSaveError,
    ConfigModuleSmtp,
    ConfigModuleAdmin,
    ConfigModuleReminder,

    // === EXPORT MESSAGES ===
    ExportSuccess(String),       // file path
    ExportNothingToExport,

    // === DATABASE MESSAGES ===
    MigrationsApplied(u32), // schema version
    DbVersion(u32),

    // === GENERAL MESSAGES ===
    Custom(String),
}
