use async_trait::async_trait;
use log::info;

use codestreak_domain::notification::{NotificationMessage, NotificationSender};
use codestreak_domain::shared::DomainError;

use super::message_builder::render;

/// Dry-run sender: renders the email and writes it to the log
#[derive(Debug, Default)]
pub struct LogEmailSender;

impl LogEmailSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSender for LogEmailSender {
    async fn send(&self, message: &NotificationMessage) -> Result<(), DomainError> {
        let email = render(message);
        info!(
            "📭 [dry-run] {} email to {}: {}",
            message.kind().as_str(),
            message.recipient,
            email.subject
        );
        log::debug!("[dry-run] body:\n{}", email.text);
        Ok(())
    }

    fn channel_name(&self) -> &'static str {
        "log"
    }
}
