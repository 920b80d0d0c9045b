use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::application::dtos::StreakDto;
use crate::application::queries::GetStreakQuery;
use crate::presentation::error::ApiResult;
use crate::presentation::state::AppState;

/// GET /api/users/{user_id}/streak
async fn get_streak(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<StreakDto>> {
    let streak = state
        .queries
        .reminders
        .get_streak(GetStreakQuery { user_id })
        .await?;
    Ok(Json(streak))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/users/{user_id}/streak", get(get_streak))
}
