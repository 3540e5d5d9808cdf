#[cfg(test)]
mod tests {
    use evreg::libs::config::{AdminConfig, Config, ReminderConfig, SmtpConfig};
    use parking_lot::{Mutex, MutexGuard};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct ConfigTestContext {
        _guard: MutexGuard<'static, ()>,
        _temp_dir: TempDir,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let guard = ENV_LOCK.lock();
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            ConfigTestContext {
                _guard: guard,
                _temp_dir: temp_dir,
            }
        }
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_read_without_file_returns_default(_ctx: &mut ConfigTestContext) {
        let config = Config::read().unwrap();
        assert!(config.smtp.is_none());
        assert!(config.admin.is_none());
        assert!(config.reminder.is_none());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read_roundtrip(_ctx: &mut ConfigTestContext) {
        let config = Config {
            smtp: Some(SmtpConfig {
                host: "smtp.example.com".to_string(),
                port: 587,
                username: "mailer".to_string(),
                from_email: "events@example.com".to_string(),
                from_name: "Event Team".to_string(),
            }),
            admin: Some(AdminConfig { login: "frontdesk".to_string() }),
            reminder: Some(ReminderConfig { lead_days: 3, pace_ms: 50 }),
        };
        config.save().unwrap();

        let loaded = Config::read().unwrap();
        assert_eq!(loaded.smtp, config.smtp);
        assert_eq!(loaded.admin, config.admin);
        assert_eq!(loaded.reminder, config.reminder);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_delete_removes_file(_ctx: &mut ConfigTestContext) {
        Config::default().save().unwrap();
        Config::delete().unwrap();
        let config = Config::read().unwrap();
        assert!(config.smtp.is_none());
    }

    #[test]
    fn test_reminder_defaults_match_schedule_contract() {
        let reminder = ReminderConfig::default();
        assert_eq!(reminder.lead_days, 2);
        assert_eq!(reminder.pace_ms, 100);
    }
}
