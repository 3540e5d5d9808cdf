//! Data export for the front desk and record keeping.
//!
//! Extracts registration rosters and the session catalog to CSV, JSON, or
//! Excel. CSV suits spreadsheet imports, JSON preserves structure for
//! programmatic use, and Excel gets headers plus auto-fit columns for
//! hand-outs at the door.

use crate::db::registrations::Registrations;
use crate::db::sessions::Sessions;
use crate::libs::messages::Message;
use crate::libs::registration::{Registration, RegistrationFilter, RegistrationKind};
use crate::msg_success;
use anyhow::Result;
use chrono::Local;
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

/// Supported export output formats.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ExportFormat {
    /// Comma-separated values for universal compatibility
    Csv,
    /// Pretty-printed JSON for structured exchange
    Json,
    /// Excel workbook with formatted headers
    Excel,
}

impl ExportFormat {
    fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "xlsx",
        }
    }
}

/// What gets exported.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ExportData {
    /// Registration roster, both kinds
    Registrations,
    /// Session catalog with occupancy
    Sessions,
    /// Both datasets
    All,
}

/// Flat registration row as it appears in exports.
#[derive(Debug, Serialize)]
struct RegistrationRow {
    kind: String,
    id: i64,
    member_name: String,
    name: String,
    email: String,
    phone: String,
    street_address: String,
    city: String,
    state: String,
    zip: String,
    num_adults: i64,
    num_children: i64,
    children: String,
    comments: String,
    request_church_info: bool,
    session: String,
    created_at: String,
}

impl From<&Registration> for RegistrationRow {
    fn from(registration: &Registration) -> Self {
        Self {
            kind: registration.kind.as_str().to_string(),
            id: registration.id,
            member_name: registration.member_full_name().unwrap_or_default(),
            name: registration.full_name(),
            email: registration.email.clone(),
            phone: registration.phone.clone(),
            street_address: registration.street_address.clone(),
            city: registration.city.clone(),
            state: registration.state.clone(),
            zip: registration.zip.clone(),
            num_adults: registration.num_adults,
            num_children: registration.num_children,
            children: registration
                .children
                .iter()
                .map(|child| format!("{} ({})", child.name, child.age))
                .collect::<Vec<_>>()
                .join("; "),
            comments: registration.comments.clone(),
            request_church_info: registration.request_church_info,
            session: registration.session.clone(),
            created_at: registration.created_at.map(|ts| ts.to_string()).unwrap_or_default(),
        }
    }
}

/// Flat session row as it appears in exports.
#[derive(Debug, Serialize)]
struct SessionRow {
    id: i64,
    name: String,
    audience: String,
    session_date: String,
    child_limit: i64,
    registered: i64,
    remaining: i64,
    is_active: bool,
    display_order: i64,
}

pub struct Exporter {
    format: ExportFormat,
    output: Option<PathBuf>,
}

impl Exporter {
    pub fn new(format: ExportFormat, output: Option<PathBuf>) -> Self {
        Self { format, output }
    }

    /// Exports the selected dataset(s), optionally narrowed to one session.
    pub fn export(&self, data: ExportData, session: Option<&str>) -> Result<()> {
        match data {
            ExportData::Registrations => self.export_registrations(session),
            ExportData::Sessions => self.export_sessions(),
            ExportData::All => {
                self.export_registrations(session)?;
                self.export_sessions()
            }
        }
    }

    fn export_registrations(&self, session: Option<&str>) -> Result<()> {
        let filter = match session {
            Some(name) => RegistrationFilter::BySession(name.to_string()),
            None => RegistrationFilter::All,
        };
        let mut store = Registrations::new()?;
        let mut rows: Vec<RegistrationRow> = Vec::new();
        for kind in [RegistrationKind::General, RegistrationKind::Member] {
            rows.extend(store.fetch(kind, &filter)?.iter().map(RegistrationRow::from));
        }

        let path = self.output_path("registrations")?;
        match self.format {
            ExportFormat::Csv => write_csv(&path, &rows)?,
            ExportFormat::Json => write_json(&path, &rows)?,
            ExportFormat::Excel => write_excel(&path, "Registrations", REGISTRATION_HEADERS, &rows, registration_cells)?,
        }
        msg_success!(Message::ExportSuccess(path.display().to_string()));
        Ok(())
    }

    fn export_sessions(&self) -> Result<()> {
        let mut directory = Sessions::new()?;
        let sessions = directory.fetch_all()?;
        let mut rows = Vec::with_capacity(sessions.len());
        for session in sessions {
            let registered = directory.occupancy(&session.name)?;
            rows.push(SessionRow {
                id: session.id,
                name: session.name.clone(),
                audience: session.audience.as_str().to_string(),
                session_date: session.session_date.map(|d| d.to_string()).unwrap_or_default(),
                child_limit: session.child_limit,
                registered,
                remaining: (session.child_limit - registered).max(0),
                is_active: session.is_active,
                display_order: session.display_order,
            });
        }

        let path = self.output_path("sessions")?;
        match self.format {
            ExportFormat::Csv => write_csv(&path, &rows)?,
            ExportFormat::Json => write_json(&path, &rows)?,
            ExportFormat::Excel => write_excel(&path, "Sessions", SESSION_HEADERS, &rows, session_cells)?,
        }
        msg_success!(Message::ExportSuccess(path.display().to_string()));
        Ok(())
    }

    fn output_path(&self, data_name: &str) -> Result<PathBuf> {
        if let Some(path) = &self.output {
            return Ok(path.clone());
        }
        let stamp = Local::now().format("%Y-%m-%d");
        Ok(PathBuf::from(format!("evreg_{}_{}.{}", data_name, stamp, self.format.extension())))
    }
}

const REGISTRATION_HEADERS: &[&str] = &[
    "Kind", "ID", "Member", "Name", "Email", "Phone", "Address", "City", "State", "Zip", "Adults", "Children", "Roster", "Comments",
    "Info Requested", "Session", "Created",
];

const SESSION_HEADERS: &[&str] = &["ID", "Name", "Audience", "Date", "Limit", "Registered", "Remaining", "Active", "Order"];

fn registration_cells(row: &RegistrationRow) -> Vec<String> {
    vec![
        row.kind.clone(),
        row.id.to_string(),
        row.member_name.clone(),
        row.name.clone(),
        row.email.clone(),
        row.phone.clone(),
        row.street_address.clone(),
        row.city.clone(),
        row.state.clone(),
        row.zip.clone(),
        row.num_adults.to_string(),
        row.num_children.to_string(),
        row.children.clone(),
        row.comments.clone(),
        row.request_church_info.to_string(),
        row.session.clone(),
        row.created_at.clone(),
    ]
}

fn session_cells(row: &SessionRow) -> Vec<String> {
    vec![
        row.id.to_string(),
        row.name.clone(),
        row.audience.clone(),
        row.session_date.clone(),
        row.child_limit.to_string(),
        row.registered.to_string(),
        row.remaining.to_string(),
        row.is_active.to_string(),
        row.display_order.to_string(),
    ]
}

fn write_csv<T: Serialize>(path: &PathBuf, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json<T: Serialize>(path: &PathBuf, rows: &[T]) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(rows)?.as_bytes())?;
    Ok(())
}

fn write_excel<T>(path: &PathBuf, sheet: &str, headers: &[&str], rows: &[T], cells: fn(&T) -> Vec<String>) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet)?;

    let header_format = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }
    for (row_idx, row) in rows.iter().enumerate() {
        for (col, value) in cells(row).into_iter().enumerate() {
            worksheet.write_string((row_idx + 1) as u32, col as u16, value)?;
        }
    }
    worksheet.autofit();

    workbook.save(path)?;
    Ok(())
}
