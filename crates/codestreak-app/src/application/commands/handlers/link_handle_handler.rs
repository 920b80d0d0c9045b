use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;

use crate::application::commands::command_handler::CommandHandler;
use crate::application::commands::link_commands::*;
use crate::application::dtos::LinkResultDto;
use crate::application::services::ActivityService;
use codestreak_domain::events::user_events::ExternalHandleLinked;
use codestreak_domain::events::EventBus;
use codestreak_domain::shared::{DomainError, UserId};
use codestreak_domain::streak::{StreakRecord, StreakRepository};
use codestreak_domain::user::{ExternalHandle, UserRepository};

pub const LINKED_MESSAGE: &str = "LeetCode account connected successfully";

/// Link platform handle command handler
pub struct LinkExternalHandleCommandHandler {
    user_repo: Arc<dyn UserRepository>,
    streak_repo: Arc<dyn StreakRepository>,
    activity: Arc<ActivityService>,
    event_bus: Arc<dyn EventBus>,
    /// Ask the platform whether the handle exists before linking
    validate_remotely: bool,
}

impl LinkExternalHandleCommandHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        streak_repo: Arc<dyn StreakRepository>,
        activity: Arc<ActivityService>,
        event_bus: Arc<dyn EventBus>,
        validate_remotely: bool,
    ) -> Self {
        Self {
            user_repo,
            streak_repo,
            activity,
            event_bus,
            validate_remotely,
        }
    }
}

#[async_trait]
impl CommandHandler<LinkExternalHandleCommand> for LinkExternalHandleCommandHandler {
    type Result = LinkExternalHandleResult;

    async fn handle(&self, cmd: LinkExternalHandleCommand) -> Result<Self::Result, DomainError> {
        info!(
            "Handling LinkExternalHandleCommand for user: {}",
            cmd.user_id
        );

        let handle = ExternalHandle::parse(&cmd.handle)?;

        let user_id = UserId::from_string(&cmd.user_id);
        let mut user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(cmd.user_id.clone()))?;

        if self.validate_remotely && !self.activity.validate_handle(&handle).await {
            return Err(DomainError::Validation(
                "Invalid LeetCode username".to_string(),
            ));
        }

        user.link_handle(handle.clone());
        self.user_repo.save(&user).await?;

        // Reminders start enabled with an empty streak
        if self
            .streak_repo
            .insert_if_absent(&StreakRecord::new(user_id.clone()))
            .await?
        {
            info!("Created streak record for user {}", user_id);
        }

        let event = ExternalHandleLinked {
            user_id,
            handle: handle.as_str().to_string(),
            occurred_at: Utc::now(),
        };
        if let Err(e) = self.event_bus.publish(Box::new(event)).await {
            warn!("Failed to publish ExternalHandleLinked: {}", e);
        }

        Ok(LinkResultDto {
            message: LINKED_MESSAGE.to_string(),
            leetcode_username: Some(handle.into()),
        })
    }
}
