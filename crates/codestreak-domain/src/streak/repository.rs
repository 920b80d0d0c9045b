use async_trait::async_trait;
use chrono::NaiveDate;

use super::aggregate::StreakRecord;
use super::reminder_time::ReminderTime;
use super::settings::{DueEntry, ReminderSettings};
use crate::shared::{DomainError, UserId};

/// Persisted streak counters and reminder configuration
#[async_trait]
pub trait StreakRepository: Send + Sync {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<StreakRecord>, DomainError>;

    /// Insert a new record. Returns `false` when one already exists.
    async fn insert_if_absent(&self, record: &StreakRecord) -> Result<bool, DomainError>;

    /// Write `record` only if the stored counters still match what was read.
    ///
    /// Returns `false` when another writer got there first.
    async fn update_if_unchanged(
        &self,
        record: &StreakRecord,
        expected_last_solved: Option<NaiveDate>,
        expected_current: u32,
    ) -> Result<bool, DomainError>;

    async fn find_settings(&self, user_id: &UserId)
        -> Result<Option<ReminderSettings>, DomainError>;

    /// Upsert the enabled flag (defaults to `true` when `None`) and, when
    /// `times` is given, replace the whole reminder set. Runs atomically.
    async fn save_settings(
        &self,
        user_id: &UserId,
        enabled: Option<bool>,
        times: Option<Vec<ReminderTime>>,
    ) -> Result<ReminderSettings, DomainError>;

    /// Active reminder rows whose time equals `time`, joined with their owner.
    ///
    /// Rows are decoded one by one; a row that fails to decode comes back as
    /// `Err` in its slot. The outer error is reserved for the query itself.
    async fn find_due(&self, time: &ReminderTime) -> Result<Vec<DueEntry>, DomainError>;
}
