use chrono::NaiveDate;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

use codestreak_domain::activity::{
    solved_on, submissions_on, ActivitySource, PlatformProfile, SubmissionRecord,
};
use codestreak_domain::shared::{Clock, DomainError};
use codestreak_domain::user::ExternalHandle;

/// Submissions inspected when deciding whether today is already solved
pub const SOLVED_TODAY_WINDOW: u32 = 20;
/// Submissions inspected for the check-today view
pub const TODAY_SUBMISSIONS_WINDOW: u32 = 50;

/// Fail-soft facade over the activity source.
///
/// Every call is bounded by one timeout. The public `get_*`/`has_*` methods
/// never error: failures degrade to empty lists, `false` or `None`.
pub struct ActivityService {
    source: Arc<dyn ActivitySource>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl ActivityService {
    pub fn new(source: Arc<dyn ActivitySource>, clock: Arc<dyn Clock>, timeout: Duration) -> Self {
        Self {
            source,
            clock,
            timeout,
        }
    }

    async fn fetch_recent(
        &self,
        handle: &ExternalHandle,
        limit: u32,
    ) -> Result<Vec<SubmissionRecord>, DomainError> {
        tokio::time::timeout(self.timeout, self.source.fetch_recent_submissions(handle, limit))
            .await
            .map_err(|_| {
                DomainError::Timeout(format!(
                    "activity query for {} exceeded {:?}",
                    handle, self.timeout
                ))
            })?
    }

    /// Like [`has_solved_today`](Self::has_solved_today) but reports why the
    /// answer could not be confirmed.
    pub async fn try_has_solved_today(&self, handle: &ExternalHandle) -> Result<bool, DomainError> {
        self.try_has_solved_on(handle, self.clock.today()).await
    }

    /// Whether an accepted submission falls on `day`.
    ///
    /// The scheduler passes its tick's day so a lookup that finishes after
    /// midnight still answers for the slot being processed.
    pub async fn try_has_solved_on(
        &self,
        handle: &ExternalHandle,
        day: NaiveDate,
    ) -> Result<bool, DomainError> {
        let submissions = self.fetch_recent(handle, SOLVED_TODAY_WINDOW).await?;
        Ok(solved_on(&submissions, day, self.clock.as_ref()))
    }

    pub async fn get_recent_submissions(
        &self,
        handle: &ExternalHandle,
        limit: u32,
    ) -> Vec<SubmissionRecord> {
        match self.fetch_recent(handle, limit).await {
            Ok(submissions) => submissions,
            Err(e) => {
                warn!("⚠️  Recent submissions unavailable for {}: {}", handle, e);
                Vec::new()
            }
        }
    }

    pub async fn has_solved_today(&self, handle: &ExternalHandle) -> bool {
        match self.try_has_solved_today(handle).await {
            Ok(solved) => solved,
            Err(e) => {
                warn!("⚠️  Cannot confirm today's solve for {}: {}", handle, e);
                false
            }
        }
    }

    /// Today's submissions of any status
    pub async fn get_today_submissions(&self, handle: &ExternalHandle) -> Vec<SubmissionRecord> {
        let recent = self
            .get_recent_submissions(handle, TODAY_SUBMISSIONS_WINDOW)
            .await;
        submissions_on(&recent, self.clock.today(), self.clock.as_ref())
    }

    pub async fn get_profile(&self, handle: &ExternalHandle) -> Option<PlatformProfile> {
        let result = tokio::time::timeout(self.timeout, self.source.fetch_profile(handle)).await;
        match result {
            Ok(Ok(profile)) => profile,
            Ok(Err(e)) => {
                warn!("⚠️  Profile fetch failed for {}: {}", handle, e);
                None
            }
            Err(_) => {
                warn!("⚠️  Profile fetch for {} timed out after {:?}", handle, self.timeout);
                None
            }
        }
    }

    /// Whether the platform knows this handle
    pub async fn validate_handle(&self, handle: &ExternalHandle) -> bool {
        let valid = self.get_profile(handle).await.is_some();
        debug!("Handle {} validation result: {}", handle, valid);
        valid
    }
}
