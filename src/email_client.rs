use std::time::Duration;

use async_trait::async_trait;
use lettre::address::AddressError;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;

use crate::configuration::{EmailClientSettings, SmtpCredentials};

/// A fully addressed email, independent of how it is delivered.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub sender_name: String,
    pub sender_address: String,
    pub recipient: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SendEmailError {
    #[error("invalid email address")]
    InvalidAddress(#[from] AddressError),

    #[error("failed to build the message")]
    Build(#[from] lettre::error::Error),

    #[error("the SMTP relay rejected or failed the delivery")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("the SMTP relay did not answer within {0:?}")]
    TimedOut(Duration),
}

/// Something that can deliver an email on our behalf.
///
/// Every call is a single delivery attempt; implementations must not retry.
#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_email(
        &self,
        credentials: &SmtpCredentials,
        email: &OutgoingEmail,
    ) -> Result<(), SendEmailError>;
}

/// Delivers email through an SMTP relay, upgrading the connection with
/// STARTTLS on the submission port.
pub struct SmtpEmailClient {
    host: String,
    port: u16,
    timeout: Duration,
}

impl SmtpEmailClient {
    pub fn new(host: String, port: u16, timeout: Duration) -> Self {
        Self {
            host,
            port,
            timeout,
        }
    }

    pub fn from_settings(settings: &EmailClientSettings) -> Self {
        Self::new(
            settings.smtp_host.clone(),
            settings.smtp_port,
            settings.timeout(),
        )
    }

    fn transport(
        &self,
        credentials: &SmtpCredentials,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, SendEmailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)?
            .port(self.port)
            .credentials(Credentials::new(
                credentials.username.clone(),
                credentials.password.expose_secret().clone(),
            ))
            .timeout(Some(self.timeout))
            .build();
        Ok(transport)
    }
}

/// Builds a multipart/alternative message carrying both renderings.
fn build_message(email: &OutgoingEmail) -> Result<Message, SendEmailError> {
    let from = Mailbox::new(
        Some(email.sender_name.clone()),
        email.sender_address.parse()?,
    );
    let to = Mailbox::new(None, email.recipient.parse()?);

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(&email.subject)
        .multipart(MultiPart::alternative_plain_html(
            email.text_body.clone(),
            email.html_body.clone(),
        ))?;
    Ok(message)
}

#[async_trait]
impl EmailClient for SmtpEmailClient {
    #[tracing::instrument(
        name = "Relaying email through SMTP",
        skip(self, credentials, email),
        fields(smtp_host = %self.host, smtp_port = self.port)
    )]
    async fn send_email(
        &self,
        credentials: &SmtpCredentials,
        email: &OutgoingEmail,
    ) -> Result<(), SendEmailError> {
        let message = build_message(email)?;
        let transport = self.transport(credentials)?;

        // lettre's timeout covers each SMTP command, this one bounds the whole exchange
        actix_web::rt::time::timeout(self.timeout, transport.send(message))
            .await
            .map_err(|_| SendEmailError::TimedOut(self.timeout))??;

        Ok(())
    }
}
