use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;

use codestreak_domain::shared::{DomainError, UserId};
use codestreak_domain::streak::{
    DueEntry, DueReminder, ReminderSettings, ReminderTime, StreakRecord, StreakRepository,
    UndecodableDue,
};
use codestreak_domain::user::ExternalHandle;

use crate::persistence::{ResultExt, SqliteRepositoryBase};

#[derive(FromRow)]
struct StreakRow {
    user_id: String,
    current_streak: i64,
    longest_streak: i64,
    last_solved_date: Option<NaiveDate>,
    reminder_enabled: bool,
    updated_at: DateTime<Utc>,
}

fn to_count(value: i64, column: &str, user_id: &str) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| {
        DomainError::DataIntegrity(format!(
            "Streak record for user {} has invalid {}: {}",
            user_id, column, value
        ))
    })
}

impl StreakRow {
    fn into_record(self) -> Result<StreakRecord, DomainError> {
        let current = to_count(self.current_streak, "current_streak", &self.user_id)?;
        let longest = to_count(self.longest_streak, "longest_streak", &self.user_id)?;

        StreakRecord::restore(
            UserId::from_string(&self.user_id),
            current,
            longest,
            self.last_solved_date,
            self.reminder_enabled,
            self.updated_at,
        )
    }
}

/// Reminder row joined with its owner and the owner's enabled flag
#[derive(FromRow)]
struct DueRow {
    user_id: String,
    email: String,
    username: String,
    leetcode_username: Option<String>,
    time: String,
    reminder_enabled: Option<bool>,
}

impl DueRow {
    fn into_due(self) -> DueEntry {
        let user_id = UserId::from_string(&self.user_id);

        let decoded = ExternalHandle::from_stored(self.leetcode_username.as_deref())
            .map_err(|e| format!("stored handle is invalid: {}", e))
            .and_then(|handle| {
                ReminderTime::parse(&self.time)
                    .map(|time| (handle, time))
                    .map_err(|e| format!("stored reminder time is invalid: {}", e))
            });

        match decoded {
            Ok((external_handle, reminder_time)) => Ok(DueReminder {
                user_id,
                email: self.email,
                username: self.username,
                external_handle,
                reminder_enabled: self.reminder_enabled.unwrap_or(true),
                reminder_time,
            }),
            Err(reason) => Err(UndecodableDue { user_id, reason }),
        }
    }
}

pub struct SqliteStreakRepository {
    base: SqliteRepositoryBase,
}

impl SqliteStreakRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }

    async fn active_times(&self, user_id: &UserId) -> Result<Vec<ReminderTime>, DomainError> {
        let rows: Vec<(String,)> = self
            .base
            .fetch_all(
                sqlx::query_as(
                    "SELECT time FROM reminder_times WHERE user_id = ?1 AND is_active = 1 ORDER BY time",
                )
                .bind(user_id.as_str()),
                "Find reminder times",
            )
            .await?;

        rows.iter().map(|(t,)| ReminderTime::parse(t)).collect()
    }
}

#[async_trait]
impl StreakRepository for SqliteStreakRepository {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<StreakRecord>, DomainError> {
        let query = r#"
            SELECT user_id, current_streak, longest_streak, last_solved_date, reminder_enabled, updated_at
            FROM streak_records
            WHERE user_id = ?1
        "#;

        let row: Option<StreakRow> = self
            .base
            .fetch_optional(
                sqlx::query_as(query).bind(user_id.as_str()),
                "Find streak record",
            )
            .await?;

        row.map(StreakRow::into_record).transpose()
    }

    async fn insert_if_absent(&self, record: &StreakRecord) -> Result<bool, DomainError> {
        let query = r#"
            INSERT INTO streak_records
                (user_id, current_streak, longest_streak, last_solved_date, reminder_enabled, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(user_id) DO NOTHING
        "#;

        let result = self
            .base
            .execute(
                sqlx::query(query)
                    .bind(record.user_id().as_str())
                    .bind(i64::from(record.current_streak()))
                    .bind(i64::from(record.longest_streak()))
                    .bind(record.last_solved_date())
                    .bind(record.is_reminder_enabled())
                    .bind(record.updated_at()),
                "Insert streak record",
            )
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_if_unchanged(
        &self,
        record: &StreakRecord,
        expected_last_solved: Option<NaiveDate>,
        expected_current: u32,
    ) -> Result<bool, DomainError> {
        // reminder_enabled is owned by the settings path and left alone here
        let query = r#"
            UPDATE streak_records SET
                current_streak = ?2,
                longest_streak = ?3,
                last_solved_date = ?4,
                updated_at = ?5
            WHERE user_id = ?1
              AND current_streak = ?6
              AND last_solved_date IS ?7
        "#;

        let result = self
            .base
            .execute(
                sqlx::query(query)
                    .bind(record.user_id().as_str())
                    .bind(i64::from(record.current_streak()))
                    .bind(i64::from(record.longest_streak()))
                    .bind(record.last_solved_date())
                    .bind(record.updated_at())
                    .bind(i64::from(expected_current))
                    .bind(expected_last_solved),
                "Update streak record",
            )
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_settings(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ReminderSettings>, DomainError> {
        let enabled: Option<(bool,)> = self
            .base
            .fetch_optional(
                sqlx::query_as("SELECT reminder_enabled FROM streak_records WHERE user_id = ?1")
                    .bind(user_id.as_str()),
                "Find reminder settings",
            )
            .await?;

        let Some((reminder_enabled,)) = enabled else {
            return Ok(None);
        };

        let times = self.active_times(user_id).await?;
        Ok(Some(ReminderSettings::new(reminder_enabled, times)))
    }

    async fn save_settings(
        &self,
        user_id: &UserId,
        enabled: Option<bool>,
        times: Option<Vec<ReminderTime>>,
    ) -> Result<ReminderSettings, DomainError> {
        let reminder_enabled = enabled.unwrap_or(true);
        let now = Utc::now();

        let mut tx = self
            .base
            .pool()
            .begin()
            .await
            .map_repo_err("Begin settings transaction")?;

        sqlx::query(
            r#"
            INSERT INTO streak_records
                (user_id, current_streak, longest_streak, last_solved_date, reminder_enabled, updated_at)
            VALUES (?1, 0, 0, NULL, ?2, ?3)
            ON CONFLICT(user_id) DO UPDATE SET
                reminder_enabled = excluded.reminder_enabled,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id.as_str())
        .bind(reminder_enabled)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_repo_err("Upsert reminder settings")?;

        if let Some(times) = &times {
            sqlx::query("DELETE FROM reminder_times WHERE user_id = ?1")
                .bind(user_id.as_str())
                .execute(&mut *tx)
                .await
                .map_repo_err("Clear reminder times")?;

            for time in times {
                sqlx::query(
                    "INSERT INTO reminder_times (user_id, time, is_active, created_at) VALUES (?1, ?2, 1, ?3)",
                )
                .bind(user_id.as_str())
                .bind(time.to_string())
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_repo_err("Insert reminder time")?;
            }
        }

        let stored: Vec<(String,)> = sqlx::query_as(
            "SELECT time FROM reminder_times WHERE user_id = ?1 AND is_active = 1 ORDER BY time",
        )
        .bind(user_id.as_str())
        .fetch_all(&mut *tx)
        .await
        .map_repo_err("Read back reminder times")?;

        tx.commit().await.map_repo_err("Commit reminder settings")?;

        let times = stored
            .iter()
            .map(|(t,)| ReminderTime::parse(t))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ReminderSettings::new(reminder_enabled, times))
    }

    async fn find_due(&self, time: &ReminderTime) -> Result<Vec<DueEntry>, DomainError> {
        let query = r#"
            SELECT
                u.id AS user_id,
                u.email,
                u.username,
                u.leetcode_username,
                rt.time,
                s.reminder_enabled
            FROM reminder_times rt
            JOIN users u ON u.id = rt.user_id
            LEFT JOIN streak_records s ON s.user_id = rt.user_id
            WHERE rt.time = ?1 AND rt.is_active = 1
            ORDER BY u.id
        "#;

        let rows: Vec<DueRow> = self
            .base
            .fetch_all(
                sqlx::query_as(query).bind(time.to_string()),
                "Find due reminders",
            )
            .await?;

        Ok(rows.into_iter().map(DueRow::into_due).collect())
    }
}
