use chrono::NaiveDate;
use log::{info, warn};
use std::sync::Arc;

use codestreak_domain::shared::{DomainError, UserId};
use codestreak_domain::streak::{evaluate, StreakEvaluation, StreakPolicy, StreakRepository};

/// Conditional writes re-read and retry this many times after a conflict
const MAX_CONFLICT_RETRIES: usize = 3;

/// Applies one day's solve/miss to a user's streak and persists it with an
/// optimistic read-modify-write.
pub struct StreakService {
    streak_repo: Arc<dyn StreakRepository>,
    policy: StreakPolicy,
}

impl StreakService {
    pub fn new(streak_repo: Arc<dyn StreakRepository>, policy: StreakPolicy) -> Self {
        Self {
            streak_repo,
            policy,
        }
    }

    pub fn policy(&self) -> StreakPolicy {
        self.policy
    }

    pub async fn apply_day(
        &self,
        user_id: &UserId,
        solved_today: bool,
        today: NaiveDate,
    ) -> Result<StreakEvaluation, DomainError> {
        for attempt in 0..=MAX_CONFLICT_RETRIES {
            let existing = self.streak_repo.find_by_user(user_id).await?;
            let evaluation = evaluate(existing.as_ref(), user_id, solved_today, today, self.policy)?;

            if !evaluation.changed() {
                return Ok(evaluation);
            }

            let stored = match &existing {
                None => self.streak_repo.insert_if_absent(&evaluation.record).await?,
                Some(previous) => {
                    self.streak_repo
                        .update_if_unchanged(
                            &evaluation.record,
                            previous.last_solved_date(),
                            previous.current_streak(),
                        )
                        .await?
                }
            };

            if stored {
                info!(
                    "Streak for user {} -> {:?} (current={}, longest={})",
                    user_id,
                    evaluation.outcome,
                    evaluation.record.current_streak(),
                    evaluation.record.longest_streak()
                );
                return Ok(evaluation);
            }

            warn!(
                "⚠️  Streak write for user {} lost a race (attempt {}/{}), re-reading",
                user_id,
                attempt + 1,
                MAX_CONFLICT_RETRIES + 1
            );
        }

        Err(DomainError::ConcurrentModification(format!(
            "streak record for user {} kept changing underneath the update",
            user_id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use codestreak_domain::streak::{
        DueEntry, ReminderSettings, ReminderTime, StreakOutcome, StreakRecord,
    };
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    /// Store whose conditional update fails a configurable number of times
    struct ContendedStreakRepository {
        records: RwLock<HashMap<String, StreakRecord>>,
        conflicts_left: RwLock<usize>,
        update_calls: RwLock<usize>,
    }

    impl ContendedStreakRepository {
        fn new(conflicts: usize) -> Self {
            Self {
                records: RwLock::new(HashMap::new()),
                conflicts_left: RwLock::new(conflicts),
                update_calls: RwLock::new(0),
            }
        }

        async fn seed(&self, record: StreakRecord) {
            self.records
                .write()
                .await
                .insert(record.user_id().to_string(), record);
        }
    }

    #[async_trait]
    impl StreakRepository for ContendedStreakRepository {
        async fn find_by_user(&self, user_id: &UserId) -> Result<Option<StreakRecord>, DomainError> {
            Ok(self.records.read().await.get(user_id.as_str()).cloned())
        }

        async fn insert_if_absent(&self, record: &StreakRecord) -> Result<bool, DomainError> {
            let mut records = self.records.write().await;
            if records.contains_key(record.user_id().as_str()) {
                return Ok(false);
            }
            records.insert(record.user_id().to_string(), record.clone());
            Ok(true)
        }

        async fn update_if_unchanged(
            &self,
            record: &StreakRecord,
            expected_last_solved: Option<NaiveDate>,
            expected_current: u32,
        ) -> Result<bool, DomainError> {
            *self.update_calls.write().await += 1;

            let mut conflicts = self.conflicts_left.write().await;
            if *conflicts > 0 {
                *conflicts -= 1;
                return Ok(false);
            }

            let mut records = self.records.write().await;
            match records.get(record.user_id().as_str()) {
                Some(stored)
                    if stored.last_solved_date() == expected_last_solved
                        && stored.current_streak() == expected_current =>
                {
                    records.insert(record.user_id().to_string(), record.clone());
                    Ok(true)
                }
                _ => Ok(false),
            }
        }

        async fn find_settings(
            &self,
            _user_id: &UserId,
        ) -> Result<Option<ReminderSettings>, DomainError> {
            Ok(None)
        }

        async fn save_settings(
            &self,
            _user_id: &UserId,
            enabled: Option<bool>,
            times: Option<Vec<ReminderTime>>,
        ) -> Result<ReminderSettings, DomainError> {
            Ok(ReminderSettings::new(
                enabled.unwrap_or(true),
                times.unwrap_or_default(),
            ))
        }

        async fn find_due(&self, _time: &ReminderTime) -> Result<Vec<DueEntry>, DomainError> {
            Ok(Vec::new())
        }
    }

    fn day(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    fn record(user_id: &UserId, current: u32, longest: u32, last: Option<&str>) -> StreakRecord {
        StreakRecord::restore(
            user_id.clone(),
            current,
            longest,
            last.map(day),
            true,
            chrono::Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_solve_after_yesterday_is_persisted() {
        let repo = Arc::new(ContendedStreakRepository::new(0));
        let user_id = UserId::new();
        repo.seed(record(&user_id, 5, 7, Some("2026-10-14"))).await;

        let service = StreakService::new(repo.clone(), StreakPolicy::LazyBreak);
        let evaluation = service
            .apply_day(&user_id, true, day("2026-10-15"))
            .await
            .unwrap();

        assert_eq!(evaluation.outcome, StreakOutcome::Continued);
        let stored = repo.find_by_user(&user_id).await.unwrap().unwrap();
        assert_eq!(stored.current_streak(), 6);
        assert_eq!(stored.longest_streak(), 7);
        assert_eq!(stored.last_solved_date(), Some(day("2026-10-15")));
    }

    #[tokio::test]
    async fn test_lazy_miss_does_not_write() {
        let repo = Arc::new(ContendedStreakRepository::new(0));
        let user_id = UserId::new();
        repo.seed(record(&user_id, 5, 7, Some("2026-10-14"))).await;

        let service = StreakService::new(repo.clone(), StreakPolicy::LazyBreak);
        let evaluation = service
            .apply_day(&user_id, false, day("2026-10-15"))
            .await
            .unwrap();

        assert_eq!(evaluation.outcome, StreakOutcome::Missed);
        assert_eq!(*repo.update_calls.read().await, 0);
    }

    #[tokio::test]
    async fn test_missing_record_is_created() {
        let repo = Arc::new(ContendedStreakRepository::new(0));
        let user_id = UserId::new();

        let service = StreakService::new(repo.clone(), StreakPolicy::LazyBreak);
        let evaluation = service
            .apply_day(&user_id, true, day("2026-10-15"))
            .await
            .unwrap();

        assert!(evaluation.created);
        let stored = repo.find_by_user(&user_id).await.unwrap().unwrap();
        assert_eq!(stored.current_streak(), 1);
        assert_eq!(stored.longest_streak(), 1);
    }

    #[tokio::test]
    async fn test_conflicts_are_retried() {
        let repo = Arc::new(ContendedStreakRepository::new(2));
        let user_id = UserId::new();
        repo.seed(record(&user_id, 1, 1, Some("2026-10-14"))).await;

        let service = StreakService::new(repo.clone(), StreakPolicy::LazyBreak);
        let evaluation = service
            .apply_day(&user_id, true, day("2026-10-15"))
            .await
            .unwrap();

        assert_eq!(evaluation.record.current_streak(), 2);
        assert_eq!(*repo.update_calls.read().await, 3);
    }

    #[tokio::test]
    async fn test_persistent_conflict_gives_up() {
        let repo = Arc::new(ContendedStreakRepository::new(usize::MAX));
        let user_id = UserId::new();
        repo.seed(record(&user_id, 1, 1, Some("2026-10-14"))).await;

        let service = StreakService::new(repo.clone(), StreakPolicy::LazyBreak);
        let result = service.apply_day(&user_id, true, day("2026-10-15")).await;

        assert!(matches!(result, Err(DomainError::ConcurrentModification(_))));
        assert_eq!(*repo.update_calls.read().await, MAX_CONFLICT_RETRIES + 1);
    }

    #[tokio::test]
    async fn test_future_last_solve_is_rejected() {
        let repo = Arc::new(ContendedStreakRepository::new(0));
        let user_id = UserId::new();
        repo.seed(record(&user_id, 1, 1, Some("2026-10-20"))).await;

        let service = StreakService::new(repo, StreakPolicy::LazyBreak);
        let result = service.apply_day(&user_id, true, day("2026-10-15")).await;

        assert!(matches!(result, Err(DomainError::DataIntegrity(_))));
    }
}
