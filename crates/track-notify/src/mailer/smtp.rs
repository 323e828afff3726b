//! SMTP transport for operator notifications using lettre.
//!
//! One relay, one sender, one recipient: every notification goes from the
//! configured SMTP account to the operator's address over STARTTLS.

use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::compose::EmailContent;

/// Error type for notification operations
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Invalid notification address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build notification message: {0}")]
    BuildMessage(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Result type for notification operations
pub type NotifyResult<T> = Result<T, NotifyError>;

/// SMTP mailer bound to the operator's notification address
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl std::fmt::Debug for Mailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailer")
            .field("from", &self.from.email.to_string())
            .field("to", &self.to.email.to_string())
            .finish()
    }
}

impl Mailer {
    /// Create a mailer from SMTP configuration
    ///
    /// Builds a STARTTLS relay; no connection is made until the first send.
    pub fn from_config(config: &track_common::SmtpConfig) -> NotifyResult<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: config.username.parse()?,
            to: config.notify_to.parse()?,
        })
    }

    /// Send a composed notification to the operator
    pub async fn send(&self, email: &EmailContent) -> NotifyResult<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(email.subject.clone())
            .multipart(
                MultiPart::alternative()
                    .singlepart(SinglePart::plain(email.text.clone()))
                    .singlepart(SinglePart::html(email.html.clone())),
            )?;

        self.transport.send(message).await?;
        tracing::debug!(subject = %email.subject, "Notification sent");

        Ok(())
    }
}
