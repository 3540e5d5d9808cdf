#[cfg(test)]
mod tests {
    use evreg::db::registrations::Registrations;
    use evreg::db::sessions::Sessions;
    use evreg::libs::admission::{Admission, AdmissionError};
    use evreg::libs::registration::{Child, NewRegistration, RegistrationKind};
    use evreg::libs::session::{NewSession, SessionAudience};
    use parking_lot::{Mutex, MutexGuard};
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct ConcurrencyTestContext {
        _guard: MutexGuard<'static, ()>,
        _temp_dir: TempDir,
    }

    impl TestContext for ConcurrencyTestContext {
        fn setup() -> Self {
            let guard = ENV_LOCK.lock();
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            ConcurrencyTestContext {
                _guard: guard,
                _temp_dir: temp_dir,
            }
        }
    }

    fn one_child_party(session: &str, tag: usize) -> NewRegistration {
        NewRegistration {
            kind: RegistrationKind::General,
            member_first_name: None,
            member_last_name: None,
            first_name: format!("Parent{}", tag),
            last_name: "Walker".to_string(),
            email: format!("parent{}@example.com", tag),
            phone: "555-0199".to_string(),
            street_address: "1 Race Ct".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip: "62799".to_string(),
            num_adults: 1,
            num_children: 1,
            children: vec![Child {
                name: format!("Child{}", tag),
                age: "6".to_string(),
            }],
            comments: String::new(),
            request_church_info: false,
            session: session.to_string(),
        }
    }

    /// With R spots left and N > R simultaneous one-child requests, exactly R
    /// are admitted, never more, never fewer.
    #[test_context(ConcurrencyTestContext)]
    #[test]
    fn test_exactly_remaining_spots_are_admitted(_ctx: &mut ConcurrencyTestContext) {
        const LIMIT: i64 = 10;
        const PREFILLED: i64 = 7;
        const CONTENDERS: usize = 8;

        Sessions::new()
            .unwrap()
            .create(&NewSession {
                name: "Contested".to_string(),
                audience: SessionAudience::GeneralAndMember,
                session_date: None,
                child_limit: LIMIT,
                display_order: 0,
            })
            .unwrap();

        let admission = Admission::new();
        let mut prefill = one_child_party("Contested", 0);
        prefill.num_children = PREFILLED;
        prefill.children = (0..PREFILLED)
            .map(|i| Child {
                name: format!("Seed{}", i),
                age: "7".to_string(),
            })
            .collect();
        admission.try_reserve(&prefill).unwrap();

        let admission = Arc::new(admission);
        let handles: Vec<_> = (0..CONTENDERS)
            .map(|tag| {
                let admission = Arc::clone(&admission);
                thread::spawn(move || admission.try_reserve(&one_child_party("Contested", tag + 1)))
            })
            .collect();

        let mut admitted = 0;
        let mut rejected = 0;
        for handle in handles {
            match handle.join().unwrap() {
                Ok(_) => admitted += 1,
                Err(AdmissionError::CapacityExceeded { remaining }) => {
                    assert!(remaining >= 0);
                    rejected += 1;
                }
                Err(other) => panic!("unexpected admission error: {other:?}"),
            }
        }

        let free = (LIMIT - PREFILLED) as usize;
        assert_eq!(admitted, free);
        assert_eq!(rejected, CONTENDERS - free);
        assert_eq!(Registrations::new().unwrap().occupancy("Contested").unwrap(), LIMIT);
    }

    /// Admissions against different sessions proceed independently.
    #[test_context(ConcurrencyTestContext)]
    #[test]
    fn test_sessions_do_not_contend(_ctx: &mut ConcurrencyTestContext) {
        let mut sessions = Sessions::new().unwrap();
        for name in ["Left", "Right"] {
            sessions
                .create(&NewSession {
                    name: name.to_string(),
                    audience: SessionAudience::GeneralAndMember,
                    session_date: None,
                    child_limit: 50,
                    display_order: 0,
                })
                .unwrap();
        }

        let admission = Arc::new(Admission::new());
        let handles: Vec<_> = (0..6)
            .map(|tag| {
                let admission = Arc::clone(&admission);
                let session = if tag % 2 == 0 { "Left" } else { "Right" };
                thread::spawn(move || admission.try_reserve(&one_child_party(session, tag + 1)))
            })
            .collect();

        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        let mut registrations = Registrations::new().unwrap();
        assert_eq!(registrations.occupancy("Left").unwrap(), 3);
        assert_eq!(registrations.occupancy("Right").unwrap(), 3);
    }
}
