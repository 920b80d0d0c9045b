use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;

use crate::application::commands::command_handler::CommandHandler;
use crate::application::commands::reminder_commands::*;
use codestreak_domain::events::user_events::ReminderSettingsUpdated;
use codestreak_domain::events::EventBus;
use codestreak_domain::shared::{DomainError, UserId};
use codestreak_domain::streak::{ReminderSettings, StreakRepository};
use codestreak_domain::user::UserRepository;

/// Update reminder settings command handler
pub struct UpdateReminderSettingsCommandHandler {
    user_repo: Arc<dyn UserRepository>,
    streak_repo: Arc<dyn StreakRepository>,
    event_bus: Arc<dyn EventBus>,
}

impl UpdateReminderSettingsCommandHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        streak_repo: Arc<dyn StreakRepository>,
        event_bus: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            user_repo,
            streak_repo,
            event_bus,
        }
    }
}

#[async_trait]
impl CommandHandler<UpdateReminderSettingsCommand> for UpdateReminderSettingsCommandHandler {
    type Result = UpdateReminderSettingsResult;

    async fn handle(
        &self,
        cmd: UpdateReminderSettingsCommand,
    ) -> Result<Self::Result, DomainError> {
        info!(
            "Handling UpdateReminderSettingsCommand for user: {}",
            cmd.user_id
        );

        // 1. Validate the whole batch before touching storage
        let times = cmd
            .reminder_times
            .as_deref()
            .map(ReminderSettings::parse_times)
            .transpose()?;

        // 2. Owner must exist
        let user_id = UserId::from_string(&cmd.user_id);
        self.user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(cmd.user_id.clone()))?;

        // 3. Upsert flag and replace times atomically
        let settings = self
            .streak_repo
            .save_settings(&user_id, cmd.reminder_enabled, times)
            .await?;

        info!(
            "Reminder settings saved for user {}: enabled={}, times={}",
            user_id,
            settings.reminder_enabled,
            settings.reminder_times.len()
        );

        // 4. Publish event
        let event = ReminderSettingsUpdated {
            user_id,
            reminder_enabled: settings.reminder_enabled,
            reminder_times: settings
                .reminder_times
                .iter()
                .map(ToString::to_string)
                .collect(),
            occurred_at: Utc::now(),
        };
        if let Err(e) = self.event_bus.publish(Box::new(event)).await {
            warn!("Failed to publish ReminderSettingsUpdated: {}", e);
        }

        Ok(settings.into())
    }
}
