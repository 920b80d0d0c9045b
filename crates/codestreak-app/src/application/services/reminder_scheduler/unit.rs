use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use codestreak_domain::notification::ReminderContent;
use codestreak_domain::streak::DueReminder;

use super::types::{UnitOutcome, UnitReport};
use crate::application::services::{ActivityService, NotificationService, StreakService};

/// Services one per-user unit needs. Shared by every unit of a tick.
pub(super) struct UnitContext {
    pub activity: Arc<ActivityService>,
    pub streaks: Arc<StreakService>,
    pub notifications: Arc<NotificationService>,
}

/// Evaluate one due user: activity lookup, streak update, reminder.
pub(super) async fn process_due(ctx: Arc<UnitContext>, due: DueReminder, today: NaiveDate) -> UnitReport {
    if !due.reminder_enabled {
        debug!(user_id = %due.user_id, "Reminders disabled, skipping");
        return UnitReport::new(UnitOutcome::SkippedDisabled);
    }

    let Some(handle) = due.external_handle.clone() else {
        debug!(user_id = %due.user_id, "No linked handle, skipping");
        return UnitReport::new(UnitOutcome::SkippedUnlinked);
    };

    let (solved, activity_error) = match ctx.activity.try_has_solved_on(&handle, today).await {
        Ok(solved) => (solved, false),
        Err(e) => {
            warn!(
                user_id = %due.user_id,
                handle = %handle,
                "⚠️  Activity lookup failed, treating as not solved: {}",
                e
            );
            (false, true)
        }
    };

    let evaluation = match ctx.streaks.apply_day(&due.user_id, solved, today).await {
        Ok(evaluation) => evaluation,
        Err(e) => {
            error!(
                user_id = %due.user_id,
                handle = %handle,
                "❌ Streak update failed, abandoning this user for the tick: {}",
                e
            );
            return UnitReport {
                outcome: UnitOutcome::Failed(e.to_string()),
                activity_error,
            };
        }
    };

    if solved {
        info!(
            user_id = %due.user_id,
            handle = %handle,
            current_streak = evaluation.record.current_streak(),
            "✅ Already solved today, no reminder"
        );
        return UnitReport {
            outcome: UnitOutcome::Solved(evaluation.outcome),
            activity_error,
        };
    }

    let record = &evaluation.record;
    let days_since_last_solve = record
        .days_since_last_solve(today)
        .map(|days| u32::try_from(days).unwrap_or(u32::MAX))
        .unwrap_or(0);

    let content = ReminderContent {
        username: due.username.clone(),
        external_handle: handle.as_str().to_string(),
        current_streak: record.current_streak(),
        longest_streak: record.longest_streak(),
        last_solved_date: record.last_solved_date(),
        days_since_last_solve,
        reminder_time: due.reminder_time,
    };

    let sent = ctx
        .notifications
        .send_reminder(&due.user_id, &due.email, content)
        .await;

    let outcome = if sent {
        UnitOutcome::ReminderSent
    } else {
        UnitOutcome::ReminderFailed
    };

    UnitReport {
        outcome,
        activity_error,
    }
}
