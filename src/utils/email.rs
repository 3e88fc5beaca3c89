use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use resultmail_config::{MailConfig, SmtpTls};
use thiserror::Error;
use tracing::Instrument;

pub type MailFuture<'a> = Pin<Box<dyn Future<Output = Result<(), MailError>> + Send + 'a>>;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("SMTP send timed out after {0:?}")]
    Timeout(Duration),
}

/// Transport seam between message composition and the network.
///
/// Implementations send a fully built message and report the transport outcome.
pub trait Mailer: Send + Sync {
    /// Mailbox every message is sent from.
    fn sender(&self) -> &Mailbox;

    fn send(&self, message: Message) -> MailFuture<'_>;
}

/// Mailer backed by one long-lived, pooled SMTP transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    send_timeout: Duration,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let address: Address = config
            .username
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("{}: {}", config.username, e)))?;
        let sender = Mailbox::new(Some(config.from_name.clone()), address);

        let creds = Credentials::new(config.username.clone(), config.password.clone());

        let builder = match config.tls {
            SmtpTls::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?,
            SmtpTls::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            }
            SmtpTls::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
            }
        };

        let transport = builder
            .port(config.smtp_port)
            .credentials(creds)
            .timeout(Some(config.send_timeout))
            .build();

        Ok(Self {
            transport,
            sender,
            send_timeout: config.send_timeout,
        })
    }
}

impl Mailer for SmtpMailer {
    fn sender(&self) -> &Mailbox {
        &self.sender
    }

    fn send(&self, message: Message) -> MailFuture<'_> {
        let span = tracing::info_span!(
            "smtp.send",
            otel.kind = "client",
            smtp.timeout_secs = self.send_timeout.as_secs()
        );

        Box::pin(
            async move {
                // The transport timeout covers single commands; this bounds the whole exchange.
                match tokio::time::timeout(self.send_timeout, self.transport.send(message)).await {
                    Ok(result) => result.map(|_| ()).map_err(MailError::from),
                    Err(_) => Err(MailError::Timeout(self.send_timeout)),
                }
            }
            .instrument(span),
        )
    }
}
