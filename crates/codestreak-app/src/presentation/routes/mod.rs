pub mod cron;
pub mod health;
pub mod leetcode;
pub mod reminders;
pub mod streak;

use axum::Router;

use crate::presentation::state::AppState;

/// Everything mounted under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(cron::router())
        .merge(reminders::router())
        .merge(leetcode::router())
        .merge(streak::router())
}
