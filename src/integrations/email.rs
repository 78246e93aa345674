//! Email delivery.
//!
//! The report goes out as a single `multipart/alternative` message (plain
//! text + HTML) over SMTP submission with STARTTLS. Delivery is best effort:
//! [`notify`] logs failures and never retries.

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::core::{EmailConfig, SecretValue};

/// Error type for email operations.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// A required setting is missing.
    #[error("Missing email setting: {0}")]
    MissingSetting(&'static str),

    /// An address could not be parsed.
    #[error("Invalid email address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    /// The message could not be assembled.
    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    /// The SMTP exchange failed.
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Result type for email operations.
pub type MailResult<T> = Result<T, MailError>;

/// A rendered report ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub text: String,
    /// HTML body
    pub html: String,
}

/// Something that can deliver an [`OutgoingEmail`].
pub trait MailTransport {
    /// Deliver the email to the configured recipient.
    fn deliver(&self, email: &OutgoingEmail) -> MailResult<()>;
}

/// SMTP mailer.
pub struct SmtpMailer {
    /// Sender mailbox
    from: Mailbox,

    /// Recipient mailbox
    to: Mailbox,

    /// SMTP transport
    transport: SmtpTransport,
}

impl SmtpMailer {
    /// Create a mailer from email settings.
    ///
    /// The sender address doubles as the SMTP login.
    pub fn from_config(config: &EmailConfig) -> MailResult<Self> {
        let sender = config.sender.as_deref().ok_or(MailError::MissingSetting("EMAIL_SENDER"))?;
        let receiver =
            config.receiver.as_deref().ok_or(MailError::MissingSetting("EMAIL_RECEIVER"))?;
        let password =
            config.password.as_ref().ok_or(MailError::MissingSetting("EMAIL_PASSWORD"))?;

        let from = parse_mailbox(sender)?;
        let to = parse_mailbox(receiver)?;
        let transport = build_transport(&config.smtp_host, config.smtp_port, sender, password)?;

        Ok(Self { from, to, transport })
    }

    /// Assemble the multipart message.
    fn build_message(&self, email: &OutgoingEmail) -> MailResult<Message> {
        build_message(&self.from, &self.to, email)
    }
}

impl MailTransport for SmtpMailer {
    fn deliver(&self, email: &OutgoingEmail) -> MailResult<()> {
        let message = self.build_message(email)?;
        let response = self.transport.send(&message)?;
        tracing::debug!(code = %response.code(), "SMTP server accepted message");
        Ok(())
    }
}

/// Build a STARTTLS submission transport with credential login.
fn build_transport(
    host: &str,
    port: u16,
    username: &str,
    password: &SecretValue,
) -> MailResult<SmtpTransport> {
    let credentials = Credentials::new(username.to_string(), password.expose().to_string());
    Ok(SmtpTransport::starttls_relay(host)?.port(port).credentials(credentials).build())
}

fn parse_mailbox(address: &str) -> MailResult<Mailbox> {
    address
        .parse::<Mailbox>()
        .map_err(|source| MailError::Address { address: address.to_string(), source })
}

/// Build a `multipart/alternative` message with plain-text and HTML parts.
pub fn build_message(from: &Mailbox, to: &Mailbox, email: &OutgoingEmail) -> MailResult<Message> {
    let message = Message::builder()
        .from(from.clone())
        .to(to.clone())
        .subject(email.subject.as_str())
        .multipart(MultiPart::alternative_plain_html(email.text.clone(), email.html.clone()))?;
    Ok(message)
}

/// Send `email`, logging instead of failing.
///
/// Returns whether the message was delivered.
pub fn notify(transport: &dyn MailTransport, email: &OutgoingEmail) -> bool {
    match transport.deliver(email) {
        Ok(()) => {
            tracing::info!(subject = %email.subject, "Report email delivered");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to send report email");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct RecordingTransport {
        sent: RefCell<Vec<OutgoingEmail>>,
        fail: bool,
    }

    impl MailTransport for RecordingTransport {
        fn deliver(&self, email: &OutgoingEmail) -> MailResult<()> {
            if self.fail {
                return Err(MailError::MissingSetting("EMAIL_PASSWORD"));
            }
            self.sent.borrow_mut().push(email.clone());
            Ok(())
        }
    }

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            subject: "Next Workout Menu (All Routines)".to_string(),
            text: "YOUR WORKOUT MENU".to_string(),
            html: "<h2>Your Workout Menu</h2>".to_string(),
        }
    }

    #[test]
    fn test_notify_reports_delivery() {
        let transport = RecordingTransport { sent: RefCell::new(Vec::new()), fail: false };
        assert!(notify(&transport, &email()));
        assert_eq!(transport.sent.borrow().len(), 1);
    }

    #[test]
    fn test_notify_swallows_failures() {
        let transport = RecordingTransport { sent: RefCell::new(Vec::new()), fail: true };
        assert!(!notify(&transport, &email()));
        assert!(transport.sent.borrow().is_empty());
    }

    #[test]
    fn test_mailer_requires_settings() {
        let err = SmtpMailer::from_config(&EmailConfig::default()).err().unwrap();
        assert!(matches!(err, MailError::MissingSetting("EMAIL_SENDER")));

        let config = EmailConfig {
            sender: Some("me@example.com".to_string()),
            receiver: Some("you@example.com".to_string()),
            ..EmailConfig::default()
        };
        let err = SmtpMailer::from_config(&config).err().unwrap();
        assert!(matches!(err, MailError::MissingSetting("EMAIL_PASSWORD")));
    }

    #[test]
    fn test_mailer_rejects_bad_address() {
        let config = EmailConfig {
            sender: Some("not an address".to_string()),
            receiver: Some("you@example.com".to_string()),
            password: Some(SecretValue::new("pw")),
            ..EmailConfig::default()
        };
        let err = SmtpMailer::from_config(&config).err().unwrap();
        assert!(matches!(err, MailError::Address { .. }));
    }

    #[test]
    fn test_message_is_multipart_alternative() {
        let from: Mailbox = "me@example.com".parse().unwrap();
        let to: Mailbox = "you@example.com".parse().unwrap();
        let message = build_message(&from, &to, &email()).unwrap();

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("text/html"));
        assert!(raw.contains("Subject: Next Workout Menu (All Routines)"));
        assert!(raw.contains("To: you@example.com"));
    }
}
