use async_trait::async_trait;

use super::message::NotificationMessage;
use crate::shared::DomainError;

/// Notification sender trait (Strategy pattern)
/// Each delivery provider implements this trait
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Render and send a message
    async fn send(&self, message: &NotificationMessage) -> Result<(), DomainError>;

    /// Short provider name for logs
    fn channel_name(&self) -> &'static str;
}
