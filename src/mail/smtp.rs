//! SMTP implementation of the mail transport.
//!
//! Sends through a STARTTLS relay using lettre. The relay settings come from
//! the `smtp` configuration block; the `SMTP_HOST`, `SMTP_PORT`, `SMTP_USER`
//! and `SMTP_PASS` environment variables override it, matching the `.env`
//! contract of the original deployment. The password itself is resolved from
//! the environment or the encrypted secret store, never from the JSON config.

use crate::libs::config::SmtpConfig;
use crate::libs::secret::Secret;
use crate::mail::{MailTransport, OutgoingEmail, TransportFailure};
use anyhow::Result;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::env;
use std::future::Future;

const SMTP_SECRET_FILE: &str = ".smtp_secret";

#[derive(Clone)]
pub struct SmtpMailer {
    host: String,
    port: u16,
    credentials: Credentials,
    from_email: String,
    from_name: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig, password: String) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            credentials: Credentials::new(config.username.clone(), password),
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
        }
    }

    /// Builds a mailer from configuration, with environment overrides.
    ///
    /// The password comes from `SMTP_PASS` when set; otherwise it is read
    /// from (or prompted into) the encrypted secret store.
    pub fn from_config(config: &SmtpConfig) -> Result<Self> {
        let mut config = config.clone();
        if let Ok(host) = env::var("SMTP_HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("SMTP_PORT") {
            config.port = port.parse()?;
        }
        if let Ok(user) = env::var("SMTP_USER") {
            config.username = user;
        }
        let password = match env::var("SMTP_PASS") {
            Ok(pass) => pass,
            Err(_) => Secret::new(SMTP_SECRET_FILE, "Enter the SMTP password").get_or_prompt()?,
        };
        Ok(Self::new(&config, password))
    }

    /// Drops the cached SMTP password, forcing a prompt on the next send.
    pub fn forget_password() -> Result<()> {
        Secret::new(SMTP_SECRET_FILE, "Enter the SMTP password").forget()
    }

    /// Builds a fresh transport per send; connections are not pooled.
    fn build_transport(&self) -> Result<SmtpTransport, TransportFailure> {
        Ok(SmtpTransport::starttls_relay(&self.host)
            .map_err(|e| TransportFailure(format!("SMTP relay error: {e}")))?
            .port(self.port)
            .credentials(self.credentials.clone())
            .build())
    }

    fn from_header(&self) -> String {
        if self.from_name.is_empty() {
            self.from_email.clone()
        } else {
            format!("{} <{}>", self.from_name, self.from_email)
        }
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message, TransportFailure> {
        Message::builder()
            .from(
                self.from_header()
                    .parse()
                    .map_err(|e| TransportFailure(format!("Invalid from address: {e}")))?,
            )
            .to(email
                .to
                .parse()
                .map_err(|e| TransportFailure(format!("Invalid to address: {e}")))?)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(email.body.clone())
            .map_err(|e| TransportFailure(format!("Failed to build email: {e}")))
    }
}

impl MailTransport for SmtpMailer {
    fn send(&self, email: &OutgoingEmail) -> impl Future<Output = Result<(), TransportFailure>> + Send {
        let message = self.build_message(email);
        let mailer = self.clone();
        async move {
            let message = message?;
            let transport = mailer.build_transport()?;

            // lettre's SMTP transport is blocking; keep it off the runtime
            tokio::task::spawn_blocking(move || {
                transport
                    .send(&message)
                    .map(|_| ())
                    .map_err(|e| TransportFailure(format!("Failed to send email: {e}")))
            })
            .await
            .map_err(|e| TransportFailure(format!("Email task failed: {e}")))?
        }
    }
}
