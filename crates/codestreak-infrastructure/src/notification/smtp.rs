use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::info;

use codestreak_domain::notification::{NotificationMessage, NotificationSender};
use codestreak_domain::shared::DomainError;

use super::message_builder::render;

/// Email sender backed by an SMTP relay (STARTTLS)
pub struct SmtpEmailSender {
    from: Mailbox,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailSender {
    pub fn new(
        host: &str,
        port: u16,
        from_address: &str,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Self, DomainError> {
        let from: Mailbox = from_address.parse().map_err(|e| {
            DomainError::Configuration(format!("Invalid from address '{}': {}", from_address, e))
        })?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| DomainError::Configuration(format!("Invalid SMTP relay: {}", e)))?
            .port(port);

        if let (Some(user), Some(pass)) = (username, password) {
            builder = builder.credentials(Credentials::new(user, pass));
        }

        Ok(Self {
            from,
            mailer: builder.build(),
        })
    }

    fn build_message(&self, message: &NotificationMessage) -> Result<Message, DomainError> {
        let to: Mailbox = message.recipient.parse().map_err(|e| {
            DomainError::Validation(format!(
                "Invalid recipient address '{}': {}",
                message.recipient, e
            ))
        })?;

        let email = render(message);

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .multipart(MultiPart::alternative_plain_html(email.text, email.html))
            .map_err(|e| DomainError::Dispatch(format!("Failed to build email: {}", e)))
    }
}

#[async_trait]
impl NotificationSender for SmtpEmailSender {
    async fn send(&self, message: &NotificationMessage) -> Result<(), DomainError> {
        let email = self.build_message(message)?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| DomainError::Dispatch(format!("SMTP delivery failed: {}", e)))?;

        info!(
            "📧 {} email sent via SMTP to {}",
            message.kind().as_str(),
            message.recipient
        );
        Ok(())
    }

    fn channel_name(&self) -> &'static str {
        "smtp"
    }
}
