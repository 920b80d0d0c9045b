use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;

use crate::application::commands::command_handler::CommandHandler;
use crate::application::commands::link_commands::*;
use crate::application::dtos::LinkResultDto;
use codestreak_domain::events::user_events::ExternalHandleUnlinked;
use codestreak_domain::events::EventBus;
use codestreak_domain::shared::{DomainError, UserId};
use codestreak_domain::user::UserRepository;

pub const UNLINKED_MESSAGE: &str = "LeetCode account disconnected successfully";

/// Unlink platform handle command handler
pub struct UnlinkExternalHandleCommandHandler {
    user_repo: Arc<dyn UserRepository>,
    event_bus: Arc<dyn EventBus>,
}

impl UnlinkExternalHandleCommandHandler {
    pub fn new(user_repo: Arc<dyn UserRepository>, event_bus: Arc<dyn EventBus>) -> Self {
        Self {
            user_repo,
            event_bus,
        }
    }
}

#[async_trait]
impl CommandHandler<UnlinkExternalHandleCommand> for UnlinkExternalHandleCommandHandler {
    type Result = UnlinkExternalHandleResult;

    async fn handle(&self, cmd: UnlinkExternalHandleCommand) -> Result<Self::Result, DomainError> {
        info!(
            "Handling UnlinkExternalHandleCommand for user: {}",
            cmd.user_id
        );

        let user_id = UserId::from_string(&cmd.user_id);
        let mut user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(cmd.user_id.clone()))?;

        let previous = user.unlink_handle();
        self.user_repo.save(&user).await?;

        let event = ExternalHandleUnlinked {
            user_id,
            previous_handle: previous.map(String::from),
            occurred_at: Utc::now(),
        };
        if let Err(e) = self.event_bus.publish(Box::new(event)).await {
            warn!("Failed to publish ExternalHandleUnlinked: {}", e);
        }

        Ok(LinkResultDto {
            message: UNLINKED_MESSAGE.to_string(),
            leetcode_username: None,
        })
    }
}
