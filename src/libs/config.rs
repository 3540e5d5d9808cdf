//! Configuration management for the evreg application.
//!
//! Handles the settings that the registration engine and the reminder
//! dispatcher depend on: the outbound SMTP relay, the shared admin credential
//! handed to the web front end, and the reminder schedule parameters. Supports
//! an interactive setup wizard and JSON persistence in the platform-specific
//! application data directory.
//!
//! ## Configuration Structure
//!
//! Each concern has its own optional module, configured independently:
//!
//! - **SMTP Config**: relay host, port, account, and sender identity
//! - **Admin Config**: the single shared credential the front end presents
//! - **Reminder Config**: lead time and pacing of the dispatch loop
//!
//! ## Storage and Security
//!
//! Configuration is stored as pretty-printed JSON. The SMTP password is never
//! written here; it lives in an encrypted secret file (see
//! [`Secret`](crate::libs::secret::Secret)) or arrives via the `SMTP_PASS`
//! environment variable, matching the original deployment's `.env` layout.

use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Represents a configurable module in the application.
///
/// Used during interactive setup to display available modules and route the
/// user's selection to the matching configuration block.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    /// Unique identifier for the module used in configuration routing
    pub key: String,
    /// Display name shown to users during interactive setup
    pub name: String,
}

/// Outbound mail relay settings.
///
/// Mirrors the environment the original scripts read (`SMTP_HOST`,
/// `SMTP_PORT`, `SMTP_USER`); any of these environment variables still
/// override the stored value at send time so containerized deployments can
/// keep credentials out of the data directory.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SmtpConfig {
    /// Relay host name, e.g. `smtp.gmail.com`
    pub host: String,
    /// Relay port; 587 expects STARTTLS
    pub port: u16,
    /// Account used to authenticate against the relay
    pub username: String,
    /// Sender address placed in the `From` header
    pub from_email: String,
    /// Optional display name for the `From` header
    #[serde(default)]
    pub from_name: String,
}

impl SmtpConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "smtp".to_string(),
            name: Message::ConfigModuleSmtp.to_string(),
        }
    }

    pub fn init(config: &Option<SmtpConfig>) -> Result<Self> {
        let config = config.clone().unwrap_or_else(|| SmtpConfig {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            username: String::new(),
            from_email: String::new(),
            from_name: String::new(),
        });
        msg_print!(Message::ConfigModuleSmtp);
        Ok(Self {
            host: Input::with_theme(&ColorfulTheme::default())
                .with_prompt("SMTP host")
                .default(config.host)
                .interact_text()?,
            port: Input::with_theme(&ColorfulTheme::default())
                .with_prompt("SMTP port")
                .default(config.port)
                .interact_text()?,
            username: Input::with_theme(&ColorfulTheme::default())
                .with_prompt("SMTP user")
                .default(config.username)
                .interact_text()?,
            from_email: Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Sender address")
                .default(config.from_email)
                .interact_text()?,
            from_name: Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Sender display name")
                .default(config.from_name)
                .allow_empty(true)
                .interact_text()?,
        })
    }
}

/// Shared admin credential surfaced to the web front end.
///
/// The registration site authenticates its admin pages against one shared
/// login; this block only carries the login name. The password is delegated
/// to the encrypted secret store at the point of use.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AdminConfig {
    pub login: String,
}

impl AdminConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "admin".to_string(),
            name: Message::ConfigModuleAdmin.to_string(),
        }
    }

    pub fn init(config: &Option<AdminConfig>) -> Result<Self> {
        let config = config.clone().unwrap_or_else(|| AdminConfig { login: "admin".to_string() });
        msg_print!(Message::ConfigModuleAdmin);
        Ok(Self {
            login: Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Admin login")
                .default(config.login)
                .interact_text()?,
        })
    }
}

/// Reminder dispatch parameters.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ReminderConfig {
    /// How many days before the session date reminders go out
    pub lead_days: i64,
    /// Delay between consecutive sends, in milliseconds
    pub pace_ms: u64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        ReminderConfig { lead_days: 2, pace_ms: 100 }
    }
}

impl ReminderConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "reminder".to_string(),
            name: Message::ConfigModuleReminder.to_string(),
        }
    }

    pub fn init(config: &Option<ReminderConfig>) -> Result<Self> {
        let default = config.clone().unwrap_or_default();
        msg_print!(Message::ConfigModuleReminder);
        Ok(Self {
            lead_days: Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Days before the session to send reminders")
                .default(default.lead_days)
                .interact_text()?,
            pace_ms: Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Pause between emails (ms)")
                .default(default.pace_ms)
                .interact_text()?,
        })
    }
}

/// Main configuration container for the entire application.
///
/// Every block is optional so a fresh install can run read-only commands
/// before `evreg init` has ever been invoked; unset blocks are omitted from
/// the JSON output.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smtp: Option<SmtpConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<AdminConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder: Option<ReminderConfig>,
}

impl Config {
    /// Reads configuration from the filesystem.
    ///
    /// Returns the default (empty) configuration when no file exists, so the
    /// application can function with minimal setup.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Saves the current configuration as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes the configuration file if present.
    pub fn delete() -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if config_file_path.exists() {
            fs::remove_file(config_file_path)?;
        }
        Ok(())
    }

    /// Runs an interactive configuration setup wizard.
    ///
    /// Presents the available modules, pre-filling existing values as
    /// defaults, and returns the updated configuration for saving.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let node_descriptions = vec![SmtpConfig::module(), AdminConfig::module(), ReminderConfig::module()];

        let selected_nodes = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt("Select modules to configure")
            .items(&node_descriptions.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected_nodes {
            match node_descriptions[selection].key.as_str() {
                "smtp" => config.smtp = Some(SmtpConfig::init(&config.smtp)?),
                "admin" => config.admin = Some(AdminConfig::init(&config.admin)?),
                "reminder" => config.reminder = Some(ReminderConfig::init(&config.reminder)?),
                _ => {}
            }
        }

        Ok(config)
    }
}
