use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;

use codestreak_domain::schedule::{TickMarkerRepository, TickSlot};
use codestreak_domain::shared::DomainError;

use crate::persistence::SqliteRepositoryBase;

pub struct SqliteTickMarkerRepository {
    base: SqliteRepositoryBase,
}

impl SqliteTickMarkerRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }
}

#[async_trait]
impl TickMarkerRepository for SqliteTickMarkerRepository {
    async fn try_claim(&self, slot: &TickSlot) -> Result<bool, DomainError> {
        // Slot strings sort in time order, so the WHERE keeps the marker monotonic
        let query = r#"
            INSERT INTO scheduler_state (id, last_slot, updated_at)
            VALUES (1, ?1, ?2)
            ON CONFLICT(id) DO UPDATE SET
                last_slot = excluded.last_slot,
                updated_at = excluded.updated_at
            WHERE scheduler_state.last_slot < excluded.last_slot
        "#;

        let result = self
            .base
            .execute(
                sqlx::query(query).bind(slot.to_string()).bind(Utc::now()),
                "Claim tick slot",
            )
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn last_claimed(&self) -> Result<Option<TickSlot>, DomainError> {
        let row: Option<(String,)> = self
            .base
            .fetch_optional(
                sqlx::query_as("SELECT last_slot FROM scheduler_state WHERE id = 1"),
                "Read tick marker",
            )
            .await?;

        row.map(|(slot,)| TickSlot::parse(&slot)).transpose()
    }
}
