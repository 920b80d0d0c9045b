use serde::{Deserialize, Serialize};

use super::reminder_time::ReminderTime;
use crate::shared::{DomainError, UserId};
use crate::user::ExternalHandle;

/// Reminder configuration for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSettings {
    pub reminder_enabled: bool,
    /// Sorted ascending, no duplicates
    pub reminder_times: Vec<ReminderTime>,
}

impl ReminderSettings {
    pub fn new(reminder_enabled: bool, mut reminder_times: Vec<ReminderTime>) -> Self {
        reminder_times.sort();
        reminder_times.dedup();
        Self {
            reminder_enabled,
            reminder_times,
        }
    }

    /// Validate a batch of raw times. One bad entry rejects the whole batch.
    pub fn parse_times<S: AsRef<str>>(raw: &[S]) -> Result<Vec<ReminderTime>, DomainError> {
        let mut times = raw
            .iter()
            .map(|t| ReminderTime::parse(t.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        times.sort();
        times.dedup();
        Ok(times)
    }
}

/// One reminder row that matches the current tick, joined with its owner
#[derive(Debug, Clone)]
pub struct DueReminder {
    pub user_id: UserId,
    pub email: String,
    pub username: String,
    pub external_handle: Option<ExternalHandle>,
    pub reminder_enabled: bool,
    pub reminder_time: ReminderTime,
}

/// A due row whose stored owner data could not be decoded.
///
/// Reported per row so one bad user does not hide everyone else's reminders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndecodableDue {
    pub user_id: UserId,
    pub reason: String,
}

pub type DueEntry = Result<DueReminder, UndecodableDue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_times_sorts_and_dedups() {
        let times = ReminderSettings::parse_times(&["22:15", "07:30", "7:30"]).unwrap();
        let rendered: Vec<String> = times.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["07:30", "22:15"]);
    }

    #[test]
    fn test_parse_times_rejects_whole_batch() {
        let result = ReminderSettings::parse_times(&["07:30", "25:00", "08:00"]);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_parse_times_accepts_empty_batch() {
        let times = ReminderSettings::parse_times::<&str>(&[]).unwrap();
        assert!(times.is_empty());
    }
}
