use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::application::commands::reminder_commands::UpdateReminderSettingsCommand;
use crate::application::commands::CommandHandler;
use crate::application::dtos::{DeliveryDto, ReminderSettingsDto};
use crate::application::queries::{GetDeliveriesQuery, GetReminderSettingsQuery};
use crate::presentation::error::ApiResult;
use crate::presentation::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReminderSettingsRequest {
    #[serde(default)]
    pub reminder_enabled: Option<bool>,
    #[serde(default)]
    pub reminder_times: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeliveriesParams {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct UpdateReminderSettingsResponse {
    pub message: &'static str,
    pub settings: ReminderSettingsDto,
}

/// GET /api/users/{user_id}/reminders/settings
async fn get_settings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ReminderSettingsDto>> {
    let settings = state
        .queries
        .reminders
        .get_settings(GetReminderSettingsQuery { user_id })
        .await?;
    Ok(Json(settings))
}

/// POST /api/users/{user_id}/reminders/settings
///
/// `reminderEnabled` defaults to true; omitted `reminderTimes` leaves the
/// stored times alone.
async fn update_settings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(input): Json<UpdateReminderSettingsRequest>,
) -> ApiResult<Json<UpdateReminderSettingsResponse>> {
    let settings = state
        .command_handlers
        .update_reminder_settings
        .handle(UpdateReminderSettingsCommand {
            user_id: user_id.clone(),
            reminder_enabled: input.reminder_enabled,
            reminder_times: input.reminder_times,
        })
        .await?;

    info!(
        user_id = %user_id,
        reminder_enabled = settings.reminder_enabled,
        times = settings.reminder_times.len(),
        "Reminder settings updated",
    );

    Ok(Json(UpdateReminderSettingsResponse {
        message: "Reminder settings updated successfully",
        settings,
    }))
}

/// GET /api/users/{user_id}/reminders/deliveries?limit=N
async fn list_deliveries(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<DeliveriesParams>,
) -> ApiResult<Json<Vec<DeliveryDto>>> {
    let deliveries = state
        .queries
        .reminders
        .get_deliveries(GetDeliveriesQuery {
            user_id,
            limit: params.limit,
        })
        .await?;
    Ok(Json(deliveries))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/users/{user_id}/reminders/settings",
            get(get_settings).post(update_settings),
        )
        .route("/users/{user_id}/reminders/deliveries", get(list_deliveries))
}
