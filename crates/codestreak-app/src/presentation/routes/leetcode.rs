//! LeetCode account linking and activity reads.
//!
//! ```text
//! POST /users/{user_id}/leetcode/connect      -> link a handle
//! POST /users/{user_id}/leetcode/disconnect   -> unlink
//! GET  /users/{user_id}/leetcode/check-today  -> today's submissions
//! GET  /users/{user_id}/leetcode/profile      -> public profile
//! ```

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use codestreak_domain::activity::PlatformProfile;

use crate::application::commands::link_commands::{
    LinkExternalHandleCommand, UnlinkExternalHandleCommand,
};
use crate::application::commands::CommandHandler;
use crate::application::dtos::{CheckTodayDto, LinkResultDto};
use crate::application::queries::{CheckTodayQuery, GetProfileQuery};
use crate::presentation::error::ApiResult;
use crate::presentation::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    /// Missing and blank both fail handle validation
    #[serde(default)]
    pub leetcode_username: Option<String>,
}

async fn connect(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(input): Json<ConnectRequest>,
) -> ApiResult<Json<LinkResultDto>> {
    let result = state
        .command_handlers
        .link_handle
        .handle(LinkExternalHandleCommand {
            user_id,
            handle: input.leetcode_username.unwrap_or_default(),
        })
        .await?;
    Ok(Json(result))
}

async fn disconnect(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<LinkResultDto>> {
    let result = state
        .command_handlers
        .unlink_handle
        .handle(UnlinkExternalHandleCommand { user_id })
        .await?;
    Ok(Json(result))
}

async fn check_today(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<CheckTodayDto>> {
    let result = state
        .queries
        .activity
        .check_today(CheckTodayQuery { user_id })
        .await?;
    Ok(Json(result))
}

async fn profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<PlatformProfile>> {
    let profile = state
        .queries
        .activity
        .get_profile(GetProfileQuery { user_id })
        .await?;
    Ok(Json(profile))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/{user_id}/leetcode/connect", post(connect))
        .route("/users/{user_id}/leetcode/disconnect", post(disconnect))
        .route("/users/{user_id}/leetcode/check-today", get(check_today))
        .route("/users/{user_id}/leetcode/profile", get(profile))
}
