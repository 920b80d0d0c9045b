use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::submission::SubmissionRecord;
use crate::shared::DomainError;
use crate::user::ExternalHandle;

/// Public profile statistics from the activity source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformProfile {
    pub username: String,
    pub total_solved: u32,
    pub easy_solved: u32,
    pub medium_solved: u32,
    pub hard_solved: u32,
    pub total_submissions: u32,
    pub ranking: u32,
    pub reputation: u32,
}

/// Read-only query capability against the external platform.
///
/// Implementations report transport and parse failures as errors; callers in
/// the application layer decide how to degrade.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// Most recent submissions, newest first, at most `limit`
    async fn fetch_recent_submissions(
        &self,
        handle: &ExternalHandle,
        limit: u32,
    ) -> Result<Vec<SubmissionRecord>, DomainError>;

    /// `None` when the platform has no such user
    async fn fetch_profile(
        &self,
        handle: &ExternalHandle,
    ) -> Result<Option<PlatformProfile>, DomainError>;
}
