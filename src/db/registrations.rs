//! Registration Store.
//!
//! Durable record of individual registrations across the two kinds, each in
//! its own table as the original intake forms left them. Rows are append-only
//! facts; occupancy questions are answered by aggregation over `num_children`
//! rather than by a counter that could drift.

use crate::db::db::Db;
use crate::libs::registration::{parse_children, NewRegistration, Registration, RegistrationFilter, RegistrationKind};
use anyhow::Result;
use rusqlite::{params, Connection};

const INSERT_GENERAL: &str = "INSERT INTO general_registrations
    (first_name, last_name, email, phone, street_address, city, state, zip,
     num_adults, num_children, children_details, comments, request_church_info, session)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)";

const INSERT_MEMBER: &str = "INSERT INTO member_registrations
    (member_first_name, member_last_name, first_name, last_name, email, phone,
     street_address, city, state, zip, num_adults, num_children, children_details,
     comments, request_church_info, session)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)";

const SELECT_GENERAL: &str = "SELECT id, first_name, last_name, email, phone, street_address, city, state, zip,
    num_adults, num_children, children_details, comments, request_church_info, session, created_at
    FROM general_registrations";

const SELECT_MEMBER: &str = "SELECT id, member_first_name, member_last_name, first_name, last_name, email, phone,
    street_address, city, state, zip, num_adults, num_children, children_details, comments,
    request_church_info, session, created_at
    FROM member_registrations";

const WHERE_SESSION: &str = "WHERE session = ?1";

const SUM_CHILDREN_GENERAL: &str = "SELECT COALESCE(SUM(num_children), 0) FROM general_registrations WHERE session = ?1";
const SUM_CHILDREN_MEMBER: &str = "SELECT COALESCE(SUM(num_children), 0) FROM member_registrations WHERE session = ?1";

pub struct Registrations {
    pub conn: Connection,
}

impl Registrations {
    pub fn new() -> Result<Registrations> {
        let db = Db::new()?;
        Ok(Registrations { conn: db.conn })
    }

    /// Appends a registration row and returns its generated id.
    ///
    /// This is storage only; the capacity decision happens in
    /// [`Admission::try_reserve`](crate::libs::admission::Admission::try_reserve),
    /// which calls this inside the session's critical section.
    pub fn insert(&mut self, registration: &NewRegistration) -> Result<i64> {
        let children_json = registration.children_json()?;
        match registration.kind {
            RegistrationKind::General => {
                self.conn.execute(
                    INSERT_GENERAL,
                    params![
                        registration.first_name,
                        registration.last_name,
                        registration.email,
                        registration.phone,
                        registration.street_address,
                        registration.city,
                        registration.state,
                        registration.zip,
                        registration.num_adults,
                        registration.num_children,
                        children_json,
                        registration.comments,
                        registration.request_church_info as i64,
                        registration.session,
                    ],
                )?;
            }
            RegistrationKind::Member => {
                self.conn.execute(
                    INSERT_MEMBER,
                    params![
                        registration.member_first_name,
                        registration.member_last_name,
                        registration.first_name,
                        registration.last_name,
                        registration.email,
                        registration.phone,
                        registration.street_address,
                        registration.city,
                        registration.state,
                        registration.zip,
                        registration.num_adults,
                        registration.num_children,
                        children_json,
                        registration.comments,
                        registration.request_church_info as i64,
                        registration.session,
                    ],
                )?;
            }
        }
        Ok(self.conn.last_insert_rowid())
    }

    /// Fetches rows of one kind, optionally narrowed to a session.
    pub fn fetch(&mut self, kind: RegistrationKind, filter: &RegistrationFilter) -> Result<Vec<Registration>> {
        let base = match kind {
            RegistrationKind::General => SELECT_GENERAL,
            RegistrationKind::Member => SELECT_MEMBER,
        };
        let (sql, session) = match filter {
            RegistrationFilter::All => (base.to_string(), None),
            RegistrationFilter::BySession(name) => (format!("{} {}", base, WHERE_SESSION), Some(name.clone())),
        };

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = match &session {
            Some(name) => stmt.query(params![name])?,
            None => stmt.query([])?,
        };
        let mut registrations = Vec::new();
        while let Some(row) = rows.next()? {
            registrations.push(row_to_registration(kind, row)?);
        }
        Ok(registrations)
    }

    /// All registrations bound to a session, both kinds, general first.
    pub fn fetch_for_session(&mut self, session: &str) -> Result<Vec<Registration>> {
        let filter = RegistrationFilter::BySession(session.to_string());
        let mut registrations = self.fetch(RegistrationKind::General, &filter)?;
        registrations.extend(self.fetch(RegistrationKind::Member, &filter)?);
        Ok(registrations)
    }

    /// Children currently registered against a session, both kinds included.
    pub fn occupancy(&mut self, session: &str) -> Result<i64> {
        let general: i64 = self.conn.query_row(SUM_CHILDREN_GENERAL, params![session], |row| row.get(0))?;
        let member: i64 = self.conn.query_row(SUM_CHILDREN_MEMBER, params![session], |row| row.get(0))?;
        Ok(general + member)
    }
}

fn row_to_registration(kind: RegistrationKind, row: &rusqlite::Row<'_>) -> Result<Registration> {
    // Member rows carry two extra leading columns for the sponsoring member
    let offset = match kind {
        RegistrationKind::General => 0,
        RegistrationKind::Member => 2,
    };
    let (member_first_name, member_last_name) = match kind {
        RegistrationKind::General => (None, None),
        RegistrationKind::Member => (row.get(1)?, row.get(2)?),
    };
    Ok(Registration {
        id: row.get(0)?,
        kind,
        member_first_name,
        member_last_name,
        first_name: row.get(offset + 1)?,
        last_name: row.get(offset + 2)?,
        email: row.get(offset + 3)?,
        phone: row.get(offset + 4)?,
        street_address: row.get(offset + 5)?,
        city: row.get(offset + 6)?,
        state: row.get(offset + 7)?,
        zip: row.get(offset + 8)?,
        num_adults: row.get(offset + 9)?,
        num_children: row.get(offset + 10)?,
        children: parse_children(row.get(offset + 11)?),
        comments: row.get::<_, Option<String>>(offset + 12)?.unwrap_or_default(),
        request_church_info: row.get::<_, Option<i64>>(offset + 13)?.unwrap_or(0) != 0,
        session: row.get(offset + 14)?,
        created_at: row.get(offset + 15)?,
    })
}
