use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use codestreak_domain::schedule::TickSlot;
use codestreak_domain::streak::StreakOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickStatus {
    Completed,
    /// Another tick was still running
    SkippedOverlap,
    /// This minute was already claimed
    SkippedDuplicate,
}

/// Aggregate outcome of one tick. Per-user failures only show up here and
/// in the logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickSummary {
    pub status: TickStatus,
    pub slot: String,
    pub timestamp: DateTime<FixedOffset>,
    /// Distinct users with a reminder at this minute
    pub due: usize,
    /// Users whose activity was looked up
    pub processed: usize,
    pub solved: usize,
    pub reminders_sent: usize,
    pub reminders_failed: usize,
    pub skipped_disabled: usize,
    pub skipped_unlinked: usize,
    /// Activity lookups that failed or timed out (treated as not solved)
    pub activity_errors: usize,
    /// Units aborted by a persistence error or a panic, plus unreadable due rows
    pub errors: usize,
    pub duration_ms: u64,
}

impl TickSummary {
    pub(super) fn new(status: TickStatus, slot: &TickSlot, timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            status,
            slot: slot.to_string(),
            timestamp,
            due: 0,
            processed: 0,
            solved: 0,
            reminders_sent: 0,
            reminders_failed: 0,
            skipped_disabled: 0,
            skipped_unlinked: 0,
            activity_errors: 0,
            errors: 0,
            duration_ms: 0,
        }
    }

    pub(super) fn record(&mut self, report: &UnitReport) {
        if report.activity_error {
            self.activity_errors += 1;
        }

        match &report.outcome {
            UnitOutcome::SkippedDisabled => self.skipped_disabled += 1,
            UnitOutcome::SkippedUnlinked => self.skipped_unlinked += 1,
            UnitOutcome::Solved(_) => {
                self.processed += 1;
                self.solved += 1;
            }
            UnitOutcome::ReminderSent => {
                self.processed += 1;
                self.reminders_sent += 1;
            }
            UnitOutcome::ReminderFailed => {
                self.processed += 1;
                self.reminders_failed += 1;
            }
            UnitOutcome::Failed(_) => {
                self.processed += 1;
                self.errors += 1;
            }
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TickStatus::Completed
    }
}

/// What happened to one due user
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum UnitOutcome {
    SkippedDisabled,
    SkippedUnlinked,
    Solved(StreakOutcome),
    ReminderSent,
    ReminderFailed,
    Failed(String),
}

#[derive(Debug, Clone)]
pub(super) struct UnitReport {
    pub outcome: UnitOutcome,
    pub activity_error: bool,
}

impl UnitReport {
    pub fn new(outcome: UnitOutcome) -> Self {
        Self {
            outcome,
            activity_error: false,
        }
    }
}
