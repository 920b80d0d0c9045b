use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::time::Duration;
use tracing::{info, warn};

/// A tick should complete every minute; two silent minutes is a problem
const STALE_AFTER_SECS: i64 = 120;

impl super::ReminderTicker {
    /// Start background task that warns when ticks stop completing
    pub(super) async fn start_health_check_task(&self) {
        let scheduler = Arc::clone(&self.scheduler);
        let started_at = Arc::clone(&self.started_at);

        let handle = tokio::spawn(async move {
            let mut check_interval = tokio::time::interval(Duration::from_secs(60));

            loop {
                check_interval.tick().await;

                let Some(started) = *started_at.lock().await else {
                    continue;
                };
                let last = scheduler.last_completed_at().await;

                if let Some(silent_secs) = silent_for(last, started, Utc::now()) {
                    warn!(
                        "🔴 Health Check: no reminder tick has completed in {} seconds",
                        silent_secs
                    );
                }
            }
        });

        *self.health_check_handle.lock().await = Some(handle);

        info!("✅ Health check task started (checking every 60 seconds)");
    }
}

/// Seconds without a completed tick, if that exceeds the threshold
fn silent_for(
    last_completed: Option<DateTime<Utc>>,
    started_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<i64> {
    let since = last_completed.unwrap_or(started_at).max(started_at);
    let silent = (now - since).num_seconds();
    (silent > STALE_AFTER_SECS).then_some(silent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[test]
    fn test_recent_tick_is_healthy() {
        let now = Utc::now();
        let started = now - ChronoDuration::minutes(30);
        let last = Some(now - ChronoDuration::seconds(45));

        assert_eq!(silent_for(last, started, now), None);
    }

    #[test]
    fn test_stale_tick_is_reported() {
        let now = Utc::now();
        let started = now - ChronoDuration::minutes(30);
        let last = Some(now - ChronoDuration::minutes(5));

        assert_eq!(silent_for(last, started, now), Some(300));
    }

    #[test]
    fn test_grace_period_after_start() {
        let now = Utc::now();
        let started = now - ChronoDuration::seconds(90);

        assert_eq!(silent_for(None, started, now), None);
        assert_eq!(
            silent_for(None, now - ChronoDuration::minutes(3), now),
            Some(180)
        );
    }
}
