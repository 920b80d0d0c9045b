//! Tick triggers for external schedulers.
//!
//! ```text
//! GET|POST /cron/daily-reminders  -> bearer-authenticated tick
//! GET|POST /cron/start            -> unauthenticated manual tick
//! ```

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::application::services::TickSummary;
use crate::presentation::error::{ApiError, ApiResult};
use crate::presentation::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CronResponse {
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
    pub summary: TickSummary,
}

fn authorize(headers: &HeaderMap, secret: Option<&str>) -> ApiResult<()> {
    let Some(secret) = secret else {
        error!("❌ CRON_SECRET is not configured; rejecting cron trigger");
        return Err(ApiError::CronSecretMissing);
    };

    let provided = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if provided != Some(secret) {
        warn!("⚠️  Cron trigger rejected: bad or missing bearer token");
        return Err(ApiError::Unauthorized);
    }

    Ok(())
}

async fn run_tick(state: &AppState, message: &'static str) -> ApiResult<Json<CronResponse>> {
    let summary = state.services.scheduler.run_tick().await.map_err(|e| {
        error!("❌ [REMINDER TICK] Cron job failed: {}", e);
        ApiError::Internal("Cron job failed".to_string())
    })?;

    Ok(Json(CronResponse {
        message,
        timestamp: Utc::now(),
        summary,
    }))
}

/// GET|POST /api/cron/daily-reminders
async fn daily_reminders(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<CronResponse>> {
    authorize(&headers, state.runtime.cron_secret.as_deref())?;
    info!("⏰ Cron trigger accepted");
    run_tick(&state, "Daily reminders processed successfully").await
}

/// GET|POST /api/cron/start
async fn manual_start(State(state): State<AppState>) -> ApiResult<Json<CronResponse>> {
    info!("⏰ Manual reminder check requested");
    run_tick(&state, "Reminder check completed successfully").await
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/cron/daily-reminders",
            get(daily_reminders).post(daily_reminders),
        )
        .route("/cron/start", get(manual_start).post(manual_start))
}
