use log::debug;
use std::sync::Arc;

use super::STREAK_NOT_FOUND;
use crate::application::dtos::{DeliveryDto, ReminderSettingsDto, StreakDto};
use crate::application::services::NotificationService;
use codestreak_domain::shared::{DomainError, UserId};
use codestreak_domain::streak::StreakRepository;

#[derive(Debug, Clone)]
pub struct GetReminderSettingsQuery {
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct GetStreakQuery {
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct GetDeliveriesQuery {
    pub user_id: String,
    pub limit: Option<u32>,
}

pub const DEFAULT_DELIVERIES_LIMIT: u32 = 20;
pub const MAX_DELIVERIES_LIMIT: u32 = 100;

/// Read side of the streak store and the delivery log
pub struct ReminderQueries {
    streak_repo: Arc<dyn StreakRepository>,
    notifications: Arc<NotificationService>,
}

impl ReminderQueries {
    pub fn new(
        streak_repo: Arc<dyn StreakRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            streak_repo,
            notifications,
        }
    }

    pub async fn get_settings(
        &self,
        query: GetReminderSettingsQuery,
    ) -> Result<ReminderSettingsDto, DomainError> {
        let user_id = UserId::from_string(&query.user_id);
        let settings = self
            .streak_repo
            .find_settings(&user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(STREAK_NOT_FOUND.to_string()))?;

        debug!(
            "Reminder settings for {}: enabled={} times={}",
            user_id,
            settings.reminder_enabled,
            settings.reminder_times.len()
        );
        Ok(settings.into())
    }

    pub async fn get_streak(&self, query: GetStreakQuery) -> Result<StreakDto, DomainError> {
        let user_id = UserId::from_string(&query.user_id);
        let record = self
            .streak_repo
            .find_by_user(&user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(STREAK_NOT_FOUND.to_string()))?;

        Ok(StreakDto::from(&record))
    }

    /// Newest first. `limit` defaults to 20 and is capped at 100.
    pub async fn get_deliveries(
        &self,
        query: GetDeliveriesQuery,
    ) -> Result<Vec<DeliveryDto>, DomainError> {
        let user_id = UserId::from_string(&query.user_id);
        let limit = query
            .limit
            .unwrap_or(DEFAULT_DELIVERIES_LIMIT)
            .clamp(1, MAX_DELIVERIES_LIMIT);

        let records = self.notifications.recent_deliveries(&user_id, limit).await?;
        Ok(records.iter().map(DeliveryDto::from).collect())
    }
}
