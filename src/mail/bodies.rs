//! Rendered subjects and HTML bodies for outbound emails.
//!
//! One builder per message shape: the two-day reminder (general and member
//! variants differ in heading, accent color, and the sponsoring-member row)
//! and the registration confirmation sent right after admission.

use crate::libs::registration::{Registration, RegistrationKind};
use crate::mail::OutgoingEmail;

const REMINDER_SUBJECT_GENERAL: &str = "Event Reminder - Your Registration Details";
const REMINDER_SUBJECT_MEMBER: &str = "Event Reminder - Your Member + Guest Registration";
const CONFIRMATION_SUBJECT_GENERAL: &str = "Registration Confirmation - Your Details";
const CONFIRMATION_SUBJECT_MEMBER: &str = "Registration Confirmation - Member + Guest";

/// Builds the reminder email for a registrant.
pub fn reminder(registration: &Registration, lead_days: i64) -> OutgoingEmail {
    let subject = match registration.kind {
        RegistrationKind::General => REMINDER_SUBJECT_GENERAL,
        RegistrationKind::Member => REMINDER_SUBJECT_MEMBER,
    };
    let intro = format!(
        "This is a friendly reminder about your upcoming event in <strong>{} days</strong>!",
        lead_days
    );
    let heading = match registration.kind {
        RegistrationKind::General => heading("#667eea", "Event Reminder"),
        RegistrationKind::Member => heading("#f093fb", "Member + Guest Event Reminder"),
    };
    OutgoingEmail {
        to: registration.email.clone(),
        subject: subject.to_string(),
        body: details_body(registration, &heading, &intro),
    }
}

/// Builds the best-effort confirmation email sent right after admission.
pub fn confirmation(registration: &Registration) -> OutgoingEmail {
    let (subject, heading) = match registration.kind {
        RegistrationKind::General => (CONFIRMATION_SUBJECT_GENERAL, heading("#667eea", "Registration Confirmed")),
        RegistrationKind::Member => (CONFIRMATION_SUBJECT_MEMBER, heading("#f093fb", "Member + Guest Registration Confirmed")),
    };
    let intro = "Thank you for registering! Here are the details we have on file.".to_string();
    OutgoingEmail {
        to: registration.email.clone(),
        subject: subject.to_string(),
        body: details_body(registration, &heading, &intro),
    }
}

fn heading(color: &str, title: &str) -> String {
    format!(r#"<h2 style="color: {};">{}</h2>"#, color, title)
}

fn children_list(registration: &Registration) -> String {
    if registration.children.is_empty() {
        return "None".to_string();
    }
    registration
        .children
        .iter()
        .enumerate()
        .map(|(index, child)| format!("{}. {} (Age: {})", index + 1, child.name, child.age))
        .collect::<Vec<_>>()
        .join("\n        ")
}

fn detail_row(label: &str, value: &str) -> String {
    format!(
        r#"<tr>
            <td style="padding: 8px; border-bottom: 1px solid #eee;"><strong>{}:</strong></td>
            <td style="padding: 8px; border-bottom: 1px solid #eee;">{}</td>
          </tr>"#,
        label, value
    )
}

fn details_body(registration: &Registration, heading: &str, intro: &str) -> String {
    let mut rows = String::new();
    if let Some(member) = registration.member_full_name() {
        rows.push_str(&detail_row("Member Name", &member));
        rows.push_str(&detail_row("Guest Name", &registration.full_name()));
    } else {
        rows.push_str(&detail_row("Name", &registration.full_name()));
    }
    rows.push_str(&detail_row("Email", &registration.email));
    rows.push_str(&detail_row("Phone", &registration.phone));
    rows.push_str(&detail_row(
        "Session",
        &format!(r#"<strong style="font-size: 1.1em;">{}</strong>"#, registration.session),
    ));
    rows.push_str(&detail_row("Adults & Older Children (6th grade+)", &registration.num_adults.to_string()));
    rows.push_str(&detail_row("Number of Children", &registration.num_children.to_string()));
    if registration.num_children > 0 {
        rows.push_str(&format!(
            r#"<tr>
            <td style="padding: 8px; border-bottom: 1px solid #eee;" valign="top"><strong>Children:</strong></td>
            <td style="padding: 8px; border-bottom: 1px solid #eee;"><pre style="margin: 0; font-family: Arial, sans-serif;">{}</pre></td>
          </tr>"#,
            children_list(registration)
        ));
    }

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
        {heading}
        <p>Dear {name},</p>
        <p>{intro}</p>

        <h3>Your Registration Details:</h3>
        <table style="width: 100%; border-collapse: collapse;">
          {rows}
        </table>

        <div style="background-color: #f0f0f0; padding: 15px; margin-top: 20px; border-radius: 8px;">
          <p style="margin: 0; font-weight: 600;">Important Reminders:</p>
          <ul style="margin: 10px 0; padding-left: 20px;">
            <li>Please arrive 10-15 minutes before your scheduled session time</li>
            <li>Bring your entire party as registered</li>
            <li>Children must be accompanied by adults at all times</li>
          </ul>
        </div>

        <p style="margin-top: 20px;">We look forward to seeing you at the event!</p>
        <p>If you have any questions or need to make changes to your registration, please contact us.</p>

        <p style="color: #666; font-size: 12px; margin-top: 30px;">This is an automated email. Please do not reply to this message.</p>
      </div>"#,
        heading = heading,
        name = registration.full_name(),
        intro = intro,
        rows = rows
    )
}
