#[cfg(test)]
mod tests {
    use evreg::db::db::Db;
    use evreg::db::migrations::get_db_version;
    use parking_lot::{Mutex, MutexGuard};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct MigrationTestContext {
        _guard: MutexGuard<'static, ()>,
        _temp_dir: TempDir,
    }

    impl TestContext for MigrationTestContext {
        fn setup() -> Self {
            let guard = ENV_LOCK.lock();
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            MigrationTestContext {
                _guard: guard,
                _temp_dir: temp_dir,
            }
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_fresh_database_is_fully_migrated(_ctx: &mut MigrationTestContext) {
        let db = Db::new().unwrap();
        assert_eq!(get_db_version(&db.conn).unwrap(), 3);

        // every table the engine touches exists
        for table in ["general_registrations", "member_registrations", "sessions", "reminder_emails_sent"] {
            let count: i64 = db
                .conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "missing table {table}");
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_reopening_is_a_no_op(_ctx: &mut MigrationTestContext) {
        let first = Db::new().unwrap();
        drop(first);
        let second = Db::new().unwrap();
        assert_eq!(get_db_version(&second.conn).unwrap(), 3);
    }
}
