use std::time::Duration;

use lettre::address::AddressError;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::extension::ClientId;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;
use tracing::debug;

use crate::config::SmtpSettings;

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid mail address {address:?}: {source}")]
    Address {
        address: String,
        #[source]
        source: AddressError,
    },
    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Something that can deliver a plain text mail to the configured recipient
pub trait MailTransport {
    fn send(&self, subject: &str, body: &str) -> Result<(), MailError>;
}

/// Delivery over SMTP using the `[smtp]` settings
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    settings: SmtpSettings,
}

impl SmtpMailer {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    fn transport(&self) -> Result<SmtpTransport, MailError> {
        let settings = &self.settings;
        let mut builder = if settings.start_tls {
            SmtpTransport::starttls_relay(&settings.host)?
        } else {
            SmtpTransport::builder_dangerous(settings.host.as_str())
        };
        builder = builder.port(settings.port).timeout(Some(SMTP_TIMEOUT));

        // Authenticate only when there is something to authenticate with
        if let (Some(user), Some(password)) = (&settings.user, &settings.password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        Ok(builder.build())
    }
}

fn mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|source| MailError::Address { address: address.to_string(), source })
}

/// A bare login name such as the default `mailfrom`/`mailto` gets a domain
fn qualify(address: &str, domain: impl FnOnce() -> String) -> String {
    if address.contains('@') {
        address.to_string()
    } else {
        format!("{}@{}", address, domain())
    }
}

fn local_domain() -> String {
    match ClientId::default() {
        ClientId::Domain(host) => host,
        _ => "localhost".to_string(),
    }
}

impl MailTransport for SmtpMailer {
    fn send(&self, subject: &str, body: &str) -> Result<(), MailError> {
        let message = Message::builder()
            .from(mailbox(&qualify(&self.settings.mail_from, local_domain))?)
            .to(mailbox(&qualify(&self.settings.mail_to, local_domain))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        self.transport()?.send(&message)?;
        debug!(host = %self.settings.host, subject, "mail delivered");
        Ok(())
    }
}
