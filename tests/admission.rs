#[cfg(test)]
mod tests {
    use evreg::db::registrations::Registrations;
    use evreg::db::sessions::Sessions;
    use evreg::libs::admission::{Admission, AdmissionError};
    use evreg::libs::registration::{Child, NewRegistration, RegistrationKind};
    use evreg::libs::session::{NewSession, SessionAudience, SessionUpdate};
    use parking_lot::{Mutex, MutexGuard};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct AdmissionTestContext {
        _guard: MutexGuard<'static, ()>,
        _temp_dir: TempDir,
    }

    impl TestContext for AdmissionTestContext {
        fn setup() -> Self {
            let guard = ENV_LOCK.lock();
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            AdmissionTestContext {
                _guard: guard,
                _temp_dir: temp_dir,
            }
        }
    }

    fn create_session(name: &str, audience: SessionAudience, limit: i64) -> i64 {
        Sessions::new()
            .unwrap()
            .create(&NewSession {
                name: name.to_string(),
                audience,
                session_date: None,
                child_limit: limit,
                display_order: 0,
            })
            .unwrap()
    }

    fn party(kind: RegistrationKind, session: &str, children: i64) -> NewRegistration {
        let (member_first_name, member_last_name) = match kind {
            RegistrationKind::Member => (Some("John".to_string()), Some("Smith".to_string())),
            RegistrationKind::General => (None, None),
        };
        NewRegistration {
            kind,
            member_first_name,
            member_last_name,
            first_name: "Jessica".to_string(),
            last_name: "Martinez".to_string(),
            email: "jessica.martinez@example.com".to_string(),
            phone: "555-0103".to_string(),
            street_address: "789 Pine Rd".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip: "62703".to_string(),
            num_adults: 2,
            num_children: children,
            children: (0..children)
                .map(|i| Child {
                    name: format!("Child {}", i + 1),
                    age: "6".to_string(),
                })
                .collect(),
            comments: String::new(),
            request_church_info: false,
            session: session.to_string(),
        }
    }

    #[test_context(AdmissionTestContext)]
    #[test]
    fn test_last_spot_scenario(_ctx: &mut AdmissionTestContext) {
        create_session("A", SessionAudience::GeneralAndMember, 5);
        let admission = Admission::new();

        // occupancy 4 of 5
        admission.try_reserve(&party(RegistrationKind::General, "A", 4)).unwrap();

        // a request for 2 children is rejected, naming the single free spot
        let err = admission.try_reserve(&party(RegistrationKind::General, "A", 2)).unwrap_err();
        match err {
            AdmissionError::CapacityExceeded { remaining } => assert_eq!(remaining, 1),
            other => panic!("expected CapacityExceeded, got {other:?}"),
        }
        assert_eq!(err.to_string(), "only 1 spot(s) remaining");

        // a request for 1 child takes the last spot
        let admitted = admission.try_reserve(&party(RegistrationKind::General, "A", 1)).unwrap();
        assert_eq!(admitted.remaining, 0);
        assert_eq!(Registrations::new().unwrap().occupancy("A").unwrap(), 5);

        // and the next request is told zero spots remain
        let err = admission.try_reserve(&party(RegistrationKind::General, "A", 1)).unwrap_err();
        match err {
            AdmissionError::CapacityExceeded { remaining } => assert_eq!(remaining, 0),
            other => panic!("expected CapacityExceeded, got {other:?}"),
        }
    }

    #[test_context(AdmissionTestContext)]
    #[test]
    fn test_occupancy_counts_both_kinds(_ctx: &mut AdmissionTestContext) {
        create_session("Mixed", SessionAudience::GeneralAndMember, 4);
        let admission = Admission::new();

        admission.try_reserve(&party(RegistrationKind::General, "Mixed", 2)).unwrap();
        admission.try_reserve(&party(RegistrationKind::Member, "Mixed", 2)).unwrap();

        let err = admission.try_reserve(&party(RegistrationKind::General, "Mixed", 1)).unwrap_err();
        assert!(matches!(err, AdmissionError::CapacityExceeded { remaining: 0 }));
    }

    #[test_context(AdmissionTestContext)]
    #[test]
    fn test_unknown_session(_ctx: &mut AdmissionTestContext) {
        let err = Admission::new().try_reserve(&party(RegistrationKind::General, "Nowhere", 1)).unwrap_err();
        assert!(matches!(err, AdmissionError::SessionNotFound(_)));
    }

    #[test_context(AdmissionTestContext)]
    #[test]
    fn test_inactive_session(_ctx: &mut AdmissionTestContext) {
        let id = create_session("Closed", SessionAudience::GeneralAndMember, 5);
        Sessions::new()
            .unwrap()
            .update(
                id,
                &SessionUpdate {
                    name: "Closed".to_string(),
                    audience: SessionAudience::GeneralAndMember,
                    session_date: None,
                    child_limit: 5,
                    is_active: false,
                    display_order: 0,
                },
            )
            .unwrap();

        let err = Admission::new().try_reserve(&party(RegistrationKind::General, "Closed", 1)).unwrap_err();
        assert!(matches!(err, AdmissionError::SessionInactive(_)));
    }

    #[test_context(AdmissionTestContext)]
    #[test]
    fn test_audience_mismatch(_ctx: &mut AdmissionTestContext) {
        create_session("Members only", SessionAudience::MemberOnly, 5);
        let admission = Admission::new();

        let err = admission.try_reserve(&party(RegistrationKind::General, "Members only", 1)).unwrap_err();
        assert!(matches!(err, AdmissionError::AudienceMismatch(_)));

        // the member form is welcome
        admission.try_reserve(&party(RegistrationKind::Member, "Members only", 1)).unwrap();
    }

    #[test_context(AdmissionTestContext)]
    #[test]
    fn test_childless_party_admitted_at_capacity(_ctx: &mut AdmissionTestContext) {
        create_session("Full", SessionAudience::GeneralAndMember, 2);
        let admission = Admission::new();
        admission.try_reserve(&party(RegistrationKind::General, "Full", 2)).unwrap();

        // adults without children never exceed a child limit
        let admitted = admission.try_reserve(&party(RegistrationKind::General, "Full", 0)).unwrap();
        assert_eq!(admitted.remaining, 0);
    }

    #[test_context(AdmissionTestContext)]
    #[test]
    fn test_lowered_limit_freezes_admission_without_revoking(_ctx: &mut AdmissionTestContext) {
        let id = create_session("Shrunk", SessionAudience::GeneralAndMember, 10);
        let admission = Admission::new();
        admission.try_reserve(&party(RegistrationKind::General, "Shrunk", 4)).unwrap();

        Sessions::new()
            .unwrap()
            .update(
                id,
                &SessionUpdate {
                    name: "Shrunk".to_string(),
                    audience: SessionAudience::GeneralAndMember,
                    session_date: None,
                    child_limit: 3,
                    is_active: true,
                    display_order: 0,
                },
            )
            .unwrap();

        // existing rows stay counted; new admissions see zero room
        let err = admission.try_reserve(&party(RegistrationKind::General, "Shrunk", 1)).unwrap_err();
        assert!(matches!(err, AdmissionError::CapacityExceeded { remaining: 0 }));
        assert_eq!(Registrations::new().unwrap().occupancy("Shrunk").unwrap(), 4);
    }

    #[test_context(AdmissionTestContext)]
    #[test]
    fn test_invalid_submission_never_reaches_storage(_ctx: &mut AdmissionTestContext) {
        create_session("Strict", SessionAudience::GeneralAndMember, 5);
        let mut bad = party(RegistrationKind::General, "Strict", 2);
        bad.children.pop();

        let err = Admission::new().try_reserve(&bad).unwrap_err();
        assert!(matches!(err, AdmissionError::InvalidSubmission(_)));
        assert_eq!(Registrations::new().unwrap().occupancy("Strict").unwrap(), 0);
    }
}
