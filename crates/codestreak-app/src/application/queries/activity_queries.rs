use std::sync::Arc;

use crate::application::dtos::CheckTodayDto;
use crate::application::services::ActivityService;
use codestreak_domain::activity::{accepted_count, PlatformProfile};
use codestreak_domain::shared::{DomainError, UserId};
use codestreak_domain::user::{ExternalHandle, UserRepository};

pub const HANDLE_NOT_CONNECTED: &str = "LeetCode username not connected";
pub const PROFILE_UNAVAILABLE: &str = "Failed to fetch LeetCode profile";

#[derive(Debug, Clone)]
pub struct CheckTodayQuery {
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct GetProfileQuery {
    pub user_id: String,
}

/// Live reads against the activity source for a user's linked handle
pub struct ActivityQueries {
    user_repo: Arc<dyn UserRepository>,
    activity: Arc<ActivityService>,
}

impl ActivityQueries {
    pub fn new(user_repo: Arc<dyn UserRepository>, activity: Arc<ActivityService>) -> Self {
        Self {
            user_repo,
            activity,
        }
    }

    async fn linked_handle(&self, raw_user_id: &str) -> Result<ExternalHandle, DomainError> {
        let user_id = UserId::from_string(raw_user_id);
        let user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(raw_user_id.to_string()))?;

        user.external_handle()
            .cloned()
            .ok_or_else(|| DomainError::InvalidInput(HANDLE_NOT_CONNECTED.to_string()))
    }

    pub async fn check_today(&self, query: CheckTodayQuery) -> Result<CheckTodayDto, DomainError> {
        let handle = self.linked_handle(&query.user_id).await?;

        let has_solved_today = self.activity.has_solved_today(&handle).await;
        let today_submissions = self.activity.get_today_submissions(&handle).await;
        let count = accepted_count(&today_submissions);

        Ok(CheckTodayDto {
            has_solved_today,
            today_submissions,
            count,
        })
    }

    pub async fn get_profile(&self, query: GetProfileQuery) -> Result<PlatformProfile, DomainError> {
        let handle = self.linked_handle(&query.user_id).await?;

        self.activity
            .get_profile(&handle)
            .await
            .ok_or_else(|| DomainError::ExternalService(PROFILE_UNAVAILABLE.to_string()))
    }
}
