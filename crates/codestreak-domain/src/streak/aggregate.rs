use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::shared::{DomainError, UserId};

/// How a day without a solve affects the running streak.
///
/// `LazyBreak` leaves the record untouched on a miss; a broken streak only
/// shows up when the next solve restarts it at 1. `EagerReset` zeroes
/// `current_streak` as soon as a miss is evaluated after the streak is
/// already broken (last solve before yesterday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakPolicy {
    #[default]
    LazyBreak,
    EagerReset,
}

impl FromStr for StreakPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lazy" | "lazy_break" => Ok(StreakPolicy::LazyBreak),
            "eager" | "eager_reset" => Ok(StreakPolicy::EagerReset),
            other => Err(DomainError::Configuration(format!(
                "Unknown streak miss policy: {}",
                other
            ))),
        }
    }
}

/// What a single evaluation did to the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakOutcome {
    /// No record existed; one was created
    Created,
    /// First solve on a record that had none
    Started,
    /// Solved the day after the last solve
    Continued,
    /// Already counted a solve today
    AlreadyCounted,
    /// Solved after a gap of two or more days
    Restarted,
    /// Not solved, record left as is
    Missed,
    /// Not solved and the broken streak was zeroed (eager policy only)
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakRecord {
    user_id: UserId,
    current_streak: u32,
    longest_streak: u32,
    last_solved_date: Option<NaiveDate>,
    reminder_enabled: bool,
    updated_at: DateTime<Utc>,
}

impl StreakRecord {
    /// Empty record with reminders enabled, created when a handle is linked
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            current_streak: 0,
            longest_streak: 0,
            last_solved_date: None,
            reminder_enabled: true,
            updated_at: Utc::now(),
        }
    }

    /// Record for a user evaluated for the first time
    pub fn first_evaluation(user_id: UserId, solved_today: bool, today: NaiveDate) -> Self {
        let streak = u32::from(solved_today);
        Self {
            user_id,
            current_streak: streak,
            longest_streak: streak,
            last_solved_date: solved_today.then_some(today),
            reminder_enabled: true,
            updated_at: Utc::now(),
        }
    }

    pub fn restore(
        user_id: UserId,
        current_streak: u32,
        longest_streak: u32,
        last_solved_date: Option<NaiveDate>,
        reminder_enabled: bool,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if longest_streak < current_streak {
            return Err(DomainError::DataIntegrity(format!(
                "Streak record for user {} has longest_streak {} < current_streak {}",
                user_id, longest_streak, current_streak
            )));
        }

        Ok(Self {
            user_id,
            current_streak,
            longest_streak,
            last_solved_date,
            reminder_enabled,
            updated_at,
        })
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn longest_streak(&self) -> u32 {
        self.longest_streak
    }

    pub fn last_solved_date(&self) -> Option<NaiveDate> {
        self.last_solved_date
    }

    pub fn is_reminder_enabled(&self) -> bool {
        self.reminder_enabled
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn set_reminder_enabled(&mut self, enabled: bool) {
        self.reminder_enabled = enabled;
        self.updated_at = Utc::now();
    }

    /// Whole days between the last solve and `today`, if there was one
    pub fn days_since_last_solve(&self, today: NaiveDate) -> Option<i64> {
        self.last_solved_date
            .map(|last| (today - last).num_days().max(0))
    }

    pub fn check_not_in_future(&self, today: NaiveDate) -> Result<(), DomainError> {
        match self.last_solved_date {
            Some(last) if last > today => Err(DomainError::DataIntegrity(format!(
                "Streak record for user {} has last_solved_date {} after today {}",
                self.user_id, last, today
            ))),
            _ => Ok(()),
        }
    }

    /// Count a solve on `today`. Re-entry on the same day is a no-op.
    pub fn register_solve(&mut self, today: NaiveDate) -> StreakOutcome {
        let outcome = match self.last_solved_date {
            Some(last) if last == today => return StreakOutcome::AlreadyCounted,
            Some(last) if Some(last) == today.pred_opt() => {
                self.current_streak += 1;
                StreakOutcome::Continued
            }
            Some(_) => {
                self.current_streak = 1;
                StreakOutcome::Restarted
            }
            None => {
                self.current_streak = 1;
                StreakOutcome::Started
            }
        };

        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.last_solved_date = Some(today);
        self.updated_at = Utc::now();
        outcome
    }

    /// Apply a day without a solve according to `policy`
    pub fn register_miss(&mut self, today: NaiveDate, policy: StreakPolicy) -> StreakOutcome {
        if policy == StreakPolicy::LazyBreak || self.current_streak == 0 {
            return StreakOutcome::Missed;
        }

        let broken = match (self.last_solved_date, today.pred_opt()) {
            (Some(last), Some(yesterday)) => last < yesterday,
            _ => false,
        };

        if !broken {
            return StreakOutcome::Missed;
        }

        self.current_streak = 0;
        self.updated_at = Utc::now();
        StreakOutcome::Reset
    }
}

/// Result of evaluating one user for one day
#[derive(Debug, Clone)]
pub struct StreakEvaluation {
    pub record: StreakRecord,
    pub outcome: StreakOutcome,
    /// The record did not exist before and must be inserted
    pub created: bool,
}

impl StreakEvaluation {
    /// Whether the store needs a write
    pub fn changed(&self) -> bool {
        self.created
            || !matches!(
                self.outcome,
                StreakOutcome::AlreadyCounted | StreakOutcome::Missed
            )
    }
}

/// Streak accounting for `(existing, solved_today, today)`.
///
/// Pure apart from the `updated_at` stamp; the caller persists the result.
pub fn evaluate(
    existing: Option<&StreakRecord>,
    user_id: &UserId,
    solved_today: bool,
    today: NaiveDate,
    policy: StreakPolicy,
) -> Result<StreakEvaluation, DomainError> {
    let Some(existing) = existing else {
        return Ok(StreakEvaluation {
            record: StreakRecord::first_evaluation(user_id.clone(), solved_today, today),
            outcome: StreakOutcome::Created,
            created: true,
        });
    };

    existing.check_not_in_future(today)?;

    let mut record = existing.clone();
    let outcome = if solved_today {
        record.register_solve(today)
    } else {
        record.register_miss(today, policy)
    };

    Ok(StreakEvaluation {
        record,
        outcome,
        created: false,
    })
}
