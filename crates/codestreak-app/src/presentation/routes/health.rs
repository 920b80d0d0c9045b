use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::presentation::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Whether the in-process ticker is running
    pub scheduler_running: bool,
    /// Most recent minute claimed by a tick, `YYYY-MM-DD HH:MM`
    pub last_tick_slot: Option<String>,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let last_tick_slot = match state.repositories.tick_marker.last_claimed().await {
        Ok(slot) => slot.map(|s| s.to_string()),
        Err(e) => {
            warn!("⚠️  Could not read tick marker for health check: {}", e);
            None
        }
    };

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        scheduler_running: state.services.ticker.is_running().await,
        last_tick_slot,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
