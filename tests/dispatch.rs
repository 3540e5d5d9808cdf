#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use evreg::db::registrations::Registrations;
    use evreg::db::reminders::Reminders;
    use evreg::db::sessions::Sessions;
    use evreg::libs::config::ReminderConfig;
    use evreg::libs::registration::{NewRegistration, RegistrationKind};
    use evreg::libs::reminder::ReminderDispatch;
    use evreg::libs::session::{NewSession, SessionAudience, SessionUpdate};
    use evreg::mail::{MailTransport, OutgoingEmail, TransportFailure};
    use parking_lot::{Mutex, MutexGuard};
    use std::collections::HashSet;
    use std::future::Future;
    use std::sync::Arc;
    use tempfile::TempDir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn setup() -> (MutexGuard<'static, ()>, TempDir) {
        let guard = ENV_LOCK.lock();
        let temp_dir = tempfile::tempdir().unwrap();
        std::env::set_var("HOME", temp_dir.path());
        std::env::set_var("LOCALAPPDATA", temp_dir.path());
        (guard, temp_dir)
    }

    /// Transport double that records deliveries and fails on demand.
    #[derive(Clone, Default)]
    struct RecordingTransport {
        sent: Arc<Mutex<Vec<OutgoingEmail>>>,
        fail_for: Arc<Mutex<HashSet<String>>>,
    }

    impl RecordingTransport {
        fn fail_for(&self, recipient: &str) {
            self.fail_for.lock().insert(recipient.to_string());
        }

        fn heal(&self) {
            self.fail_for.lock().clear();
        }

        fn recipients(&self) -> Vec<String> {
            self.sent.lock().iter().map(|email| email.to.clone()).collect()
        }
    }

    impl MailTransport for RecordingTransport {
        fn send(&self, email: &OutgoingEmail) -> impl Future<Output = Result<(), TransportFailure>> + Send {
            let result = if self.fail_for.lock().contains(&email.to) {
                Err(TransportFailure("relay unavailable".to_string()))
            } else {
                self.sent.lock().push(email.clone());
                Ok(())
            };
            std::future::ready(result)
        }
    }

    fn config() -> ReminderConfig {
        ReminderConfig { lead_days: 2, pace_ms: 0 }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 9).unwrap()
    }

    fn create_session(name: &str, date: Option<NaiveDate>) -> i64 {
        Sessions::new()
            .unwrap()
            .create(&NewSession {
                name: name.to_string(),
                audience: SessionAudience::GeneralAndMember,
                session_date: date,
                child_limit: 100,
                display_order: 0,
            })
            .unwrap()
    }

    fn insert_registrant(kind: RegistrationKind, session: &str, email: &str) -> i64 {
        let (member_first_name, member_last_name) = match kind {
            RegistrationKind::Member => (Some("John".to_string()), Some("Smith".to_string())),
            RegistrationKind::General => (None, None),
        };
        Registrations::new()
            .unwrap()
            .insert(&NewRegistration {
                kind,
                member_first_name,
                member_last_name,
                first_name: "Amanda".to_string(),
                last_name: "Anderson".to_string(),
                email: email.to_string(),
                phone: "555-0104".to_string(),
                street_address: "321 Elm St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip: "62704".to_string(),
                num_adults: 2,
                num_children: 0,
                children: vec![],
                comments: String::new(),
                request_church_info: false,
                session: session.to_string(),
            })
            .unwrap()
    }

    #[tokio::test]
    async fn test_sweep_sends_once_per_registrant() {
        let _env = setup();
        let target = today() + chrono::Duration::days(2);
        create_session("Thursday evening", Some(target));
        let first = insert_registrant(RegistrationKind::General, "Thursday evening", "a@example.com");
        insert_registrant(RegistrationKind::General, "Thursday evening", "b@example.com");
        insert_registrant(RegistrationKind::Member, "Thursday evening", "c@example.com");

        // one reminder already went out on an earlier run
        Reminders::new()
            .unwrap()
            .record_sent("Thursday evening", first, RegistrationKind::General, "a@example.com")
            .unwrap();

        let transport = RecordingTransport::default();
        let dispatch = ReminderDispatch::new(transport.clone(), &config());
        let summaries = dispatch.run(today()).await.unwrap();

        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary.registrants, 3);
        assert_eq!(summary.sent, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errors, 0);

        assert_eq!(transport.recipients(), vec!["b@example.com", "c@example.com"]);
        assert_eq!(Reminders::new().unwrap().fetch_for_session("Thursday evening").unwrap().len(), 3);

        // the member variant announces itself in the subject
        let subjects: Vec<String> = transport.sent.lock().iter().map(|email| email.subject.clone()).collect();
        assert!(subjects[1].contains("Member + Guest"));
    }

    #[tokio::test]
    async fn test_second_run_skips_everyone() {
        let _env = setup();
        let target = today() + chrono::Duration::days(2);
        create_session("Thursday evening", Some(target));
        insert_registrant(RegistrationKind::General, "Thursday evening", "a@example.com");
        insert_registrant(RegistrationKind::General, "Thursday evening", "b@example.com");
        insert_registrant(RegistrationKind::Member, "Thursday evening", "c@example.com");

        let transport = RecordingTransport::default();
        let dispatch = ReminderDispatch::new(transport.clone(), &config());
        dispatch.run(today()).await.unwrap();
        assert_eq!(transport.recipients().len(), 3);

        // re-running the loop is the retry mechanism, and it must be a no-op here
        let transport = RecordingTransport::default();
        let dispatch = ReminderDispatch::new(transport.clone(), &config());
        let summaries = dispatch.run(today()).await.unwrap();

        assert_eq!(summaries[0].sent, 0);
        assert_eq!(summaries[0].skipped, 3);
        assert_eq!(summaries[0].errors, 0);
        assert!(transport.recipients().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_is_isolated_and_retried_next_run() {
        let _env = setup();
        let target = today() + chrono::Duration::days(2);
        create_session("Thursday evening", Some(target));
        insert_registrant(RegistrationKind::General, "Thursday evening", "a@example.com");
        insert_registrant(RegistrationKind::General, "Thursday evening", "b@example.com");
        insert_registrant(RegistrationKind::Member, "Thursday evening", "c@example.com");

        let transport = RecordingTransport::default();
        transport.fail_for("b@example.com");
        let dispatch = ReminderDispatch::new(transport.clone(), &config());
        let summaries = dispatch.run(today()).await.unwrap();

        // the failure neither aborts the sweep nor lands in the ledger
        assert_eq!(summaries[0].sent, 2);
        assert_eq!(summaries[0].errors, 1);
        assert_eq!(summaries[0].skipped, 0);
        assert_eq!(Reminders::new().unwrap().fetch_for_session("Thursday evening").unwrap().len(), 2);

        // a later run with a healthy relay picks up exactly the missed one
        transport.heal();
        let retry = ReminderDispatch::new(transport.clone(), &config());
        let summaries = retry.run(today()).await.unwrap();
        assert_eq!(summaries[0].sent, 1);
        assert_eq!(summaries[0].skipped, 2);
        assert_eq!(summaries[0].errors, 0);
        assert_eq!(Reminders::new().unwrap().fetch_for_session("Thursday evening").unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_only_sessions_on_target_date_are_swept() {
        let _env = setup();
        let target = today() + chrono::Duration::days(2);
        create_session("In window", Some(target));
        create_session("Next week", Some(target + chrono::Duration::days(7)));
        let inactive = create_session("Cancelled", Some(target));
        insert_registrant(RegistrationKind::General, "In window", "a@example.com");
        insert_registrant(RegistrationKind::General, "Next week", "b@example.com");
        insert_registrant(RegistrationKind::General, "Cancelled", "c@example.com");

        Sessions::new()
            .unwrap()
            .update(
                inactive,
                &SessionUpdate {
                    name: "Cancelled".to_string(),
                    audience: SessionAudience::GeneralAndMember,
                    session_date: Some(target),
                    child_limit: 100,
                    is_active: false,
                    display_order: 0,
                },
            )
            .unwrap();

        let transport = RecordingTransport::default();
        let dispatch = ReminderDispatch::new(transport.clone(), &config());
        let summaries = dispatch.run(today()).await.unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].session, "In window");
        assert_eq!(transport.recipients(), vec!["a@example.com"]);
    }

    #[tokio::test]
    async fn test_manual_run_targets_one_session_through_the_ledger() {
        let _env = setup();
        create_session("Off schedule", Some(today() + chrono::Duration::days(30)));
        insert_registrant(RegistrationKind::General, "Off schedule", "a@example.com");

        let transport = RecordingTransport::default();
        let dispatch = ReminderDispatch::new(transport.clone(), &config());
        let summary = dispatch.run_session("Off schedule").await.unwrap();
        assert_eq!(summary.sent, 1);

        // the ledger guards the manual shape too
        let summary = dispatch.run_session("Off schedule").await.unwrap();
        assert_eq!(summary.sent, 0);
        assert_eq!(summary.skipped, 1);
        assert_eq!(transport.recipients().len(), 1);
    }

    #[tokio::test]
    async fn test_dry_run_sends_and_records_nothing() {
        let _env = setup();
        let target = today() + chrono::Duration::days(2);
        create_session("Thursday evening", Some(target));
        insert_registrant(RegistrationKind::General, "Thursday evening", "a@example.com");
        insert_registrant(RegistrationKind::Member, "Thursday evening", "b@example.com");

        let transport = RecordingTransport::default();
        let dispatch = ReminderDispatch::new(transport.clone(), &config()).dry_run(true);
        let summaries = dispatch.run(today()).await.unwrap();

        assert_eq!(summaries[0].sent, 2);
        assert!(transport.recipients().is_empty());
        assert!(Reminders::new().unwrap().fetch_for_session("Thursday evening").unwrap().is_empty());
    }
}
