#[cfg(test)]
mod tests {
    use evreg::db::registrations::Registrations;
    use evreg::db::sessions::Sessions;
    use evreg::libs::export::{ExportData, ExportFormat, Exporter};
    use evreg::libs::registration::{Child, NewRegistration, RegistrationKind};
    use evreg::libs::session::{NewSession, SessionAudience};
    use parking_lot::{Mutex, MutexGuard};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct ExportTestContext {
        _guard: MutexGuard<'static, ()>,
        temp_dir: TempDir,
    }

    impl TestContext for ExportTestContext {
        fn setup() -> Self {
            let guard = ENV_LOCK.lock();
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            ExportTestContext {
                _guard: guard,
                temp_dir,
            }
        }
    }

    fn seed_data() {
        Sessions::new()
            .unwrap()
            .create(&NewSession {
                name: "Thursday evening".to_string(),
                audience: SessionAudience::GeneralAndMember,
                session_date: None,
                child_limit: 10,
                display_order: 1,
            })
            .unwrap();
        Registrations::new()
            .unwrap()
            .insert(&NewRegistration {
                kind: RegistrationKind::General,
                member_first_name: None,
                member_last_name: None,
                first_name: "Lisa".to_string(),
                last_name: "Jackson".to_string(),
                email: "lisa.jackson@example.com".to_string(),
                phone: "555-0106".to_string(),
                street_address: "987 Cedar Ln".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip: "62706".to_string(),
                num_adults: 2,
                num_children: 2,
                children: vec![
                    Child {
                        name: "Harper Jackson".to_string(),
                        age: "9".to_string(),
                    },
                    Child {
                        name: "Elijah Jackson".to_string(),
                        age: "7".to_string(),
                    },
                ],
                comments: "Is parking available?".to_string(),
                request_church_info: false,
                session: "Thursday evening".to_string(),
            })
            .unwrap();
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_csv_export_contains_roster(ctx: &mut ExportTestContext) {
        seed_data();
        let path = ctx.temp_dir.path().join("out.csv");
        Exporter::new(ExportFormat::Csv, Some(path.clone()))
            .export(ExportData::Registrations, None)
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        assert!(header.contains("email"));
        assert!(header.contains("num_children"));

        let row = lines.next().unwrap();
        assert!(row.contains("lisa.jackson@example.com"));
        assert!(row.contains("Harper Jackson (9); Elijah Jackson (7)"));
        assert!(row.contains("Thursday evening"));
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_json_export_of_sessions_carries_occupancy(ctx: &mut ExportTestContext) {
        seed_data();
        let path = ctx.temp_dir.path().join("sessions.json");
        Exporter::new(ExportFormat::Json, Some(path.clone()))
            .export(ExportData::Sessions, None)
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let rows: serde_json::Value = serde_json::from_str(&content).unwrap();
        let row = &rows.as_array().unwrap()[0];
        assert_eq!(row["name"], "Thursday evening");
        assert_eq!(row["registered"], 2);
        assert_eq!(row["remaining"], 8);
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_session_filter_narrows_registration_export(ctx: &mut ExportTestContext) {
        seed_data();
        let path = ctx.temp_dir.path().join("filtered.csv");
        Exporter::new(ExportFormat::Csv, Some(path.clone()))
            .export(ExportData::Registrations, Some("Another session"))
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("lisa.jackson@example.com"));
    }
}
