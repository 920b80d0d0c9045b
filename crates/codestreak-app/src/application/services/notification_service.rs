use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;

use codestreak_domain::notification::{
    DeliveryEvent, DeliveryLogRepository, DeliveryRecord, NotificationMessage,
    NotificationSender, ReminderContent, WelcomeContent,
};
use codestreak_domain::shared::{DomainError, UserId};

/// Notification application service.
///
/// Sends through the configured provider and never lets a failure escape:
/// errors and timeouts become `false` and a `*_failed` delivery record.
pub struct NotificationService {
    sender: Arc<dyn NotificationSender>,
    delivery_log: Arc<dyn DeliveryLogRepository>,
    timeout: Duration,
}

impl NotificationService {
    pub fn new(
        sender: Arc<dyn NotificationSender>,
        delivery_log: Arc<dyn DeliveryLogRepository>,
        timeout: Duration,
    ) -> Self {
        Self {
            sender,
            delivery_log,
            timeout,
        }
    }

    async fn try_dispatch(&self, message: &NotificationMessage) -> Result<(), DomainError> {
        match tokio::time::timeout(self.timeout, self.sender.send(message)).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::Timeout(format!(
                "{} dispatch exceeded {:?}",
                self.sender.channel_name(),
                self.timeout
            ))),
        }
    }

    /// Render and send one message. Returns whether the provider accepted it.
    pub async fn dispatch(&self, message: &NotificationMessage) -> bool {
        self.dispatch_detailed(message).await.is_ok()
    }

    async fn dispatch_detailed(&self, message: &NotificationMessage) -> Result<(), String> {
        match self.try_dispatch(message).await {
            Ok(()) => {
                info!(
                    "✅ Sent {} email via {} to {}",
                    message.kind().as_str(),
                    self.sender.channel_name(),
                    message.recipient
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    "❌ Failed to send {} email via {} to {}: {}",
                    message.kind().as_str(),
                    self.sender.channel_name(),
                    message.recipient,
                    e
                );
                Err(e.to_string())
            }
        }
    }

    pub async fn send_reminder(
        &self,
        user_id: &UserId,
        recipient: &str,
        content: ReminderContent,
    ) -> bool {
        let reminder_time = content.reminder_time;
        let message = NotificationMessage::reminder(recipient, content);
        let outcome = self.dispatch_detailed(&message).await;

        let (event, detail) = match &outcome {
            Ok(()) => (DeliveryEvent::ReminderSent, None),
            Err(reason) => (DeliveryEvent::ReminderFailed, Some(reason.clone())),
        };
        self.record(DeliveryRecord::new(
            user_id.clone(),
            event,
            Some(reminder_time),
            detail,
        ))
        .await;

        outcome.is_ok()
    }

    pub async fn send_welcome(
        &self,
        user_id: &UserId,
        recipient: &str,
        content: WelcomeContent,
    ) -> bool {
        let message = NotificationMessage::welcome(recipient, content);
        let outcome = self.dispatch_detailed(&message).await;

        let (event, detail) = match &outcome {
            Ok(()) => (DeliveryEvent::WelcomeSent, None),
            Err(reason) => (DeliveryEvent::WelcomeFailed, Some(reason.clone())),
        };
        self.record(DeliveryRecord::new(user_id.clone(), event, None, detail))
            .await;

        outcome.is_ok()
    }

    /// Most recent delivery attempts for one user, newest first
    pub async fn recent_deliveries(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<DeliveryRecord>, DomainError> {
        self.delivery_log.recent_for_user(user_id, limit).await
    }

    async fn record(&self, record: DeliveryRecord) {
        if let Err(e) = self.delivery_log.append(&record).await {
            warn!(
                "⚠️  Could not record {} for user {}: {}",
                record.event().as_str(),
                record.user_id(),
                e
            );
        }
    }
}
