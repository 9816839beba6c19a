//! Email sender trait and implementations

use crate::config::MailConfig;
use anyhow::Result;
use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Email sender abstraction
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send an email with an HTML body and a plain-text fallback
    async fn send_email(&self, to: &str, subject: &str, body_html: &str, body_text: &str)
        -> Result<()>;
}

/// SMTP-based email sender
pub struct SmtpEmailSender {
    from_address: String,
    from_name: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailSender {
    /// Create an SMTP sender from mail configuration
    pub fn new(config: &MailConfig) -> Result<Self> {
        let transport = if config.insecure {
            warn!(
                host = %config.smtp_host,
                port = config.smtp_port,
                "Using unencrypted SMTP transport"
            );
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.smtp_host.as_str())
                .port(config.smtp_port)
                .build()
        } else {
            let builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
                .map_err(|e| anyhow::anyhow!("Failed to create SMTP transport: {}", e))?
                .port(config.smtp_port);

            let has_username = !config.smtp_username.is_empty();
            let has_password = !config.smtp_password.is_empty();

            if has_username != has_password {
                anyhow::bail!("SMTP username and password must both be provided or both be empty");
            }

            if has_username {
                builder
                    .credentials(Credentials::new(
                        config.smtp_username.clone(),
                        config.smtp_password.clone(),
                    ))
                    .build()
            } else {
                builder.build()
            }
        };

        Ok(Self {
            from_address: config.from_address.clone(),
            from_name: config.from_name.clone(),
            transport,
        })
    }

    fn from_mailbox(&self) -> Result<Mailbox> {
        format!("{} <{}>", self.from_name, self.from_address)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid from address: {}", e))
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body_html: &str,
        body_text: &str,
    ) -> Result<()> {
        let from = self.from_mailbox()?;
        let to_mailbox: Mailbox = to
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid recipient email: {}", e))?;

        let email = Message::builder()
            .from(from)
            .to(to_mailbox)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(
                body_text.to_owned(),
                body_html.to_owned(),
            ))
            .map_err(|e| anyhow::anyhow!("Failed to build email message: {}", e))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to send email: {}", e))?;

        info!(to = to, subject = subject, "Email sent");
        Ok(())
    }
}

/// Mock email sender for tests and mail-disabled environments
///
/// Logs emails via tracing without sending them; can be configured to fail
/// for exercising the send-failure path.
pub struct MockEmailSender {
    should_fail: bool,
}

impl MockEmailSender {
    /// Create a mock sender that always succeeds
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    /// Create a mock sender that always fails
    pub fn new_failing() -> Self {
        Self { should_fail: true }
    }
}

impl Default for MockEmailSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body_html: &str,
        body_text: &str,
    ) -> Result<()> {
        if self.should_fail {
            warn!(to = to, subject = subject, "MockEmailSender: simulating send failure");
            anyhow::bail!("Mock email send failure");
        }
        info!(
            to = to,
            subject = subject,
            html_length = body_html.len(),
            text_length = body_text.len(),
            "MockEmailSender: email logged (not sent)"
        );
        Ok(())
    }
}

/// Cheaply cloneable facade over an [`EmailSender`], held in AppState
#[derive(Clone)]
pub struct EmailService {
    sender: Arc<dyn EmailSender>,
}

impl EmailService {
    pub fn new(sender: Arc<dyn EmailSender>) -> Self {
        Self { sender }
    }

    /// Build the sender the configuration asks for: SMTP when mail is
    /// enabled, the logging mock otherwise.
    pub fn from_config(config: &MailConfig) -> Result<Self> {
        if config.enabled {
            Ok(Self::new(Arc::new(SmtpEmailSender::new(config)?)))
        } else {
            Ok(Self::mock(MockEmailSender::new()))
        }
    }

    pub fn mock(sender: MockEmailSender) -> Self {
        Self::new(Arc::new(sender))
    }

    pub async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body_html: &str,
        body_text: &str,
    ) -> Result<()> {
        self.sender.send_email(to, subject, body_html, body_text).await
    }
}
