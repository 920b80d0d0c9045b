#![allow(dead_code)]

use sqlx::SqlitePool;
use std::sync::Arc;

use codestreak_domain::user::{ExternalHandle, User, UserRepository};
use codestreak_infrastructure::persistence::repositories::SqliteUserRepository;
use codestreak_infrastructure::persistence::Database;

/// Fresh in-memory database with all migrations applied
pub async fn setup_in_memory_db() -> SqlitePool {
    let db = Database::in_memory().await.expect("open in-memory db");
    db.run_migrations().await.expect("run migrations");
    db.pool().clone()
}

/// Insert a user, optionally with a linked handle
pub async fn insert_user(pool: &SqlitePool, username: &str, handle: Option<&str>) -> User {
    let mut user = User::new(format!("{}@example.com", username), username.to_string())
        .expect("valid user");
    if let Some(handle) = handle {
        user.link_handle(ExternalHandle::parse(handle).expect("valid handle"));
    }

    SqliteUserRepository::new(Arc::new(pool.clone()))
        .save(&user)
        .await
        .expect("save user");
    user
}
