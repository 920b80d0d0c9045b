use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;

use codestreak_domain::notification::{DeliveryEvent, DeliveryLogRepository, DeliveryRecord};
use codestreak_domain::shared::{DeliveryId, DomainError, UserId};
use codestreak_domain::streak::ReminderTime;

use crate::persistence::SqliteRepositoryBase;

#[derive(FromRow)]
struct DeliveryRow {
    id: String,
    user_id: String,
    event: String,
    reminder_time: Option<String>,
    detail: Option<String>,
    occurred_at: DateTime<Utc>,
}

impl DeliveryRow {
    fn into_record(self) -> Result<DeliveryRecord, DomainError> {
        let event: DeliveryEvent = self.event.parse()?;
        let reminder_time = self
            .reminder_time
            .as_deref()
            .map(ReminderTime::parse)
            .transpose()?;

        Ok(DeliveryRecord::restore(
            DeliveryId::from_string(&self.id),
            UserId::from_string(&self.user_id),
            event,
            reminder_time,
            self.detail,
            self.occurred_at,
        ))
    }
}

pub struct SqliteDeliveryLogRepository {
    base: SqliteRepositoryBase,
}

impl SqliteDeliveryLogRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }
}

#[async_trait]
impl DeliveryLogRepository for SqliteDeliveryLogRepository {
    async fn append(&self, record: &DeliveryRecord) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO delivery_log (id, user_id, event, reminder_time, detail, occurred_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#;

        self.base
            .execute(
                sqlx::query(query)
                    .bind(record.id().as_str())
                    .bind(record.user_id().as_str())
                    .bind(record.event().as_str())
                    .bind(record.reminder_time().map(|t| t.to_string()))
                    .bind(record.detail())
                    .bind(record.occurred_at()),
                "Append delivery record",
            )
            .await?;

        Ok(())
    }

    async fn recent_for_user(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<DeliveryRecord>, DomainError> {
        let query = r#"
            SELECT id, user_id, event, reminder_time, detail, occurred_at
            FROM delivery_log
            WHERE user_id = ?1
            ORDER BY occurred_at DESC, rowid DESC
            LIMIT ?2
        "#;

        let rows: Vec<DeliveryRow> = self
            .base
            .fetch_all(
                sqlx::query_as(query).bind(user_id.as_str()).bind(limit),
                "Find recent deliveries",
            )
            .await?;

        rows.into_iter().map(DeliveryRow::into_record).collect()
    }
}
