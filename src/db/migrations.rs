//! Database schema migration management and versioning system.
//!
//! Evolves the registration database schema over time while preserving data.
//! Each migration runs inside a transaction and is recorded in a tracking
//! table, so partially applied upgrades cannot occur and every database
//! reports a precise schema version.

use crate::libs::messages::Message;
use crate::msg_debug;
use anyhow::Result;
use rusqlite::{params, Connection, Transaction};

/// SQL schema for the migrations tracking table.
const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// A single schema change with version tracking.
#[derive(Clone)]
struct Migration {
    /// Unique version number for ordering and tracking
    version: u32,
    /// Human-readable name describing the migration's purpose
    name: &'static str,
    /// Function that applies the schema changes within a transaction
    up: fn(&Transaction) -> Result<()>,
}

/// Registry of all migrations, applied in version order.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    /// Registers all database migrations in chronological order.
    fn register_migrations(&mut self) {
        self.migrations.push(Migration {
            version: 1,
            name: "create_registration_tables",
            up: |tx| {
                tx.execute(
                    "CREATE TABLE IF NOT EXISTS general_registrations (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        first_name TEXT NOT NULL,
                        last_name TEXT NOT NULL,
                        email TEXT NOT NULL,
                        phone TEXT NOT NULL,
                        street_address TEXT NOT NULL,
                        city TEXT NOT NULL,
                        state TEXT NOT NULL,
                        zip TEXT NOT NULL,
                        num_adults INTEGER NOT NULL,
                        num_children INTEGER NOT NULL,
                        children_details TEXT,
                        comments TEXT,
                        request_church_info INTEGER DEFAULT 0,
                        session TEXT NOT NULL,
                        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
                    )",
                    [],
                )?;
                tx.execute(
                    "CREATE TABLE IF NOT EXISTS member_registrations (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        member_first_name TEXT NOT NULL,
                        member_last_name TEXT NOT NULL,
                        first_name TEXT NOT NULL,
                        last_name TEXT NOT NULL,
                        email TEXT NOT NULL,
                        phone TEXT NOT NULL,
                        street_address TEXT NOT NULL,
                        city TEXT NOT NULL,
                        state TEXT NOT NULL,
                        zip TEXT NOT NULL,
                        num_adults INTEGER NOT NULL,
                        num_children INTEGER NOT NULL,
                        children_details TEXT,
                        comments TEXT,
                        request_church_info INTEGER DEFAULT 0,
                        session TEXT NOT NULL,
                        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
                    )",
                    [],
                )?;
                tx.execute("CREATE INDEX IF NOT EXISTS idx_general_registrations_session ON general_registrations(session)", [])?;
                tx.execute("CREATE INDEX IF NOT EXISTS idx_member_registrations_session ON member_registrations(session)", [])?;
                Ok(())
            },
        });

        self.migrations.push(Migration {
            version: 2,
            name: "create_sessions_table",
            up: |tx| {
                tx.execute(
                    "CREATE TABLE IF NOT EXISTS sessions (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        name TEXT NOT NULL UNIQUE,
                        session_type TEXT NOT NULL DEFAULT 'both',
                        session_date DATE,
                        child_limit INTEGER NOT NULL,
                        is_active INTEGER NOT NULL DEFAULT 1,
                        display_order INTEGER NOT NULL DEFAULT 0,
                        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                    )",
                    [],
                )?;
                tx.execute("CREATE INDEX IF NOT EXISTS idx_sessions_date ON sessions(session_date)", [])?;
                Ok(())
            },
        });

        self.migrations.push(Migration {
            version: 3,
            name: "create_reminder_ledger",
            up: |tx| {
                tx.execute(
                    "CREATE TABLE IF NOT EXISTS reminder_emails_sent (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        session_name TEXT NOT NULL,
                        registration_id INTEGER NOT NULL,
                        registration_type TEXT NOT NULL,
                        email TEXT NOT NULL,
                        sent_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                        UNIQUE(session_name, registration_id, registration_type)
                    )",
                    [],
                )?;
                tx.execute("CREATE INDEX IF NOT EXISTS idx_reminder_emails_session ON reminder_emails_sent(session_name)", [])?;
                Ok(())
            },
        });
    }

    /// Applies every migration newer than the database's current version.
    pub fn apply_pending(&self, conn: &mut Connection) -> Result<u32> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current = current_version(conn)?;
        let mut version = current;

        for migration in self.migrations.iter().filter(|m| m.version > current) {
            msg_debug!(format!("Applying migration {} ({})", migration.version, migration.name));
            // Immediate transactions serialize concurrent initializers; the
            // DDL is idempotent and OR IGNORE absorbs the losing writer
            let tx = conn.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
            (migration.up)(&tx)?;
            tx.execute(
                "INSERT OR IGNORE INTO migrations (version, name) VALUES (?1, ?2)",
                params![migration.version, migration.name],
            )?;
            tx.commit()?;
            version = migration.version;
        }

        if version > current {
            msg_debug!(Message::MigrationsApplied(version));
        }

        Ok(version)
    }
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Initializes a connection's schema, applying any pending migrations.
pub fn init_with_migrations(conn: &mut Connection) -> Result<u32> {
    MigrationManager::new().apply_pending(conn)
}

/// Returns the schema version recorded in the migrations table.
pub fn get_db_version(conn: &Connection) -> Result<u32> {
    conn.execute(MIGRATIONS_TABLE, [])?;
    current_version(conn)
}

fn current_version(conn: &Connection) -> Result<u32> {
    let version = conn.query_row("SELECT COALESCE(MAX(version), 0) FROM migrations", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
