use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;

use codestreak_domain::shared::{DomainError, UserId};
use codestreak_domain::user::{ExternalHandle, User, UserRepository};

use crate::persistence::SqliteRepositoryBase;

#[derive(FromRow)]
struct UserRow {
    id: String,
    email: String,
    username: String,
    leetcode_username: Option<String>,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, DomainError> {
        let handle = ExternalHandle::from_stored(self.leetcode_username.as_deref())
            .map_err(|e| {
                DomainError::Deserialization(format!(
                    "Stored handle for user {} is invalid: {}",
                    self.id, e
                ))
            })?;

        Ok(User::restore(
            UserId::from_string(&self.id),
            self.email,
            self.username,
            handle,
            self.created_at,
        ))
    }
}

pub struct SqliteUserRepository {
    base: SqliteRepositoryBase,
}

impl SqliteUserRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }
}

const SELECT_USER: &str = "SELECT id, email, username, leetcode_username, created_at FROM users";

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn save(&self, user: &User) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO users (id, email, username, leetcode_username, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                email = ?2,
                username = ?3,
                leetcode_username = ?4
        "#;

        self.base
            .execute(
                sqlx::query(query)
                    .bind(user.id().as_str())
                    .bind(user.email())
                    .bind(user.username())
                    .bind(user.external_handle().map(|h| h.as_str().to_string()))
                    .bind(user.created_at()),
                "Save user",
            )
            .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let query = format!("{} WHERE id = ?1", SELECT_USER);

        let row: Option<UserRow> = self
            .base
            .fetch_optional(sqlx::query_as(&query).bind(id.as_str()), "Find user by ID")
            .await?;

        row.map(UserRow::into_user).transpose()
    }
}
