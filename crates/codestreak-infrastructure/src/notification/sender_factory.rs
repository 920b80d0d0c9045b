use std::sync::Arc;
use std::time::Duration;

use codestreak_domain::notification::{ChannelConfig, NotificationSender};
use codestreak_domain::shared::DomainError;

use super::{LogEmailSender, ResendEmailSender, SmtpEmailSender};

/// Create a notification sender based on channel configuration
pub fn create_sender(
    config: &ChannelConfig,
    timeout: Duration,
) -> Result<Arc<dyn NotificationSender>, DomainError> {
    config.validate()?;

    match config {
        ChannelConfig::Smtp {
            host,
            port,
            from_address,
            username,
            password,
        } => Ok(Arc::new(SmtpEmailSender::new(
            host,
            *port,
            from_address,
            username.clone(),
            password.clone(),
        )?)),
        ChannelConfig::Resend {
            api_key,
            from_address,
            base_url,
        } => Ok(Arc::new(ResendEmailSender::new(
            api_key.clone(),
            from_address.clone(),
            base_url.clone(),
            timeout,
        )?)),
        ChannelConfig::Log => Ok(Arc::new(LogEmailSender::new())),
    }
}
