mod types;
mod unit;


use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use codestreak_domain::schedule::{TickMarkerRepository, TickSlot};
use codestreak_domain::shared::{Clock, DomainError};
use codestreak_domain::streak::StreakRepository;

pub use types::{TickStatus, TickSummary};
use unit::UnitContext;

use super::{ActivityService, NotificationService, StreakService};

/// One pass over the reminders due at the current minute.
///
/// Overlapping calls are skipped in-process; the persisted tick marker
/// makes sure a minute is processed at most once even across restarts or
/// when both the in-process ticker and the cron endpoint fire.
pub struct ReminderScheduler {
    ctx: Arc<UnitContext>,
    streak_repo: Arc<dyn StreakRepository>,
    tick_marker: Arc<dyn TickMarkerRepository>,
    clock: Arc<dyn Clock>,
    running: Mutex<()>,
    last_completed_at: RwLock<Option<DateTime<Utc>>>,
}

impl ReminderScheduler {
    pub fn new(
        activity: Arc<ActivityService>,
        streaks: Arc<StreakService>,
        notifications: Arc<NotificationService>,
        streak_repo: Arc<dyn StreakRepository>,
        tick_marker: Arc<dyn TickMarkerRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ctx: Arc::new(UnitContext {
                activity,
                streaks,
                notifications,
            }),
            streak_repo,
            tick_marker,
            clock,
            running: Mutex::new(()),
            last_completed_at: RwLock::new(None),
        }
    }

    /// When the last tick that was not an overlap skip finished
    pub async fn last_completed_at(&self) -> Option<DateTime<Utc>> {
        *self.last_completed_at.read().await
    }

    /// Process the current minute.
    ///
    /// Errors only when the tick itself cannot run (marker or due-list
    /// query failed). Per-user failures are counted in the summary.
    pub async fn run_tick(&self) -> Result<TickSummary, DomainError> {
        let started = Instant::now();
        let now = self.clock.now();
        let slot = TickSlot::from_datetime(&now);

        let Ok(_running) = self.running.try_lock() else {
            warn!("⚠️  [REMINDER TICK] {} skipped, previous tick still running", slot);
            return Ok(self.finish(TickSummary::new(TickStatus::SkippedOverlap, &slot, now), started).await);
        };

        if !self.tick_marker.try_claim(&slot).await? {
            info!("⏰ [REMINDER TICK] {} already processed, skipping", slot);
            return Ok(self.finish(TickSummary::new(TickStatus::SkippedDuplicate, &slot, now), started).await);
        }

        let due_rows = self.streak_repo.find_due(&slot.time()).await?;

        let mut seen = HashSet::new();
        let due: Vec<_> = due_rows
            .into_iter()
            .filter(|entry| {
                let user_id = match entry {
                    Ok(row) => &row.user_id,
                    Err(bad) => &bad.user_id,
                };
                seen.insert(user_id.clone())
            })
            .collect();

        info!(
            "⏰ [REMINDER TICK] {} found {} due user(s)",
            slot,
            due.len()
        );

        let mut summary = TickSummary::new(TickStatus::Completed, &slot, now);
        summary.due = due.len();

        let today = slot.date();
        let mut units = JoinSet::new();
        for entry in due {
            match entry {
                Ok(row) => {
                    units.spawn(unit::process_due(self.ctx.clone(), row, today));
                }
                Err(bad) => {
                    error!(
                        user_id = %bad.user_id,
                        "❌ [REMINDER TICK] {} skipping user with unreadable data: {}",
                        slot,
                        bad.reason
                    );
                    summary.errors += 1;
                }
            }
        }

        while let Some(joined) = units.join_next().await {
            match joined {
                Ok(report) => summary.record(&report),
                Err(e) => {
                    error!("❌ [REMINDER TICK] {} user unit panicked: {}", slot, e);
                    summary.errors += 1;
                }
            }
        }

        let summary = self.finish(summary, started).await;
        info!(
            "✅ [REMINDER TICK] {} done in {}ms: processed={} solved={} sent={} failed={} errors={}",
            summary.slot,
            summary.duration_ms,
            summary.processed,
            summary.solved,
            summary.reminders_sent,
            summary.reminders_failed,
            summary.errors
        );

        Ok(summary)
    }

    async fn finish(&self, mut summary: TickSummary, started: Instant) -> TickSummary {
        summary.duration_ms = started.elapsed().as_millis() as u64;
        // An overlap skip means the previous tick is still stuck
        if summary.status != TickStatus::SkippedOverlap {
            *self.last_completed_at.write().await = Some(Utc::now());
        }
        summary
    }
}
