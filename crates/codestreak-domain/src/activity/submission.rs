use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::shared::Clock;

/// The only status counted as a solve
pub const ACCEPTED_STATUS: &str = "Accepted";

/// One submission reported by the activity source. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub title: String,
    pub title_slug: String,
    /// Epoch seconds
    pub timestamp: i64,
    pub status: String,
    pub language: String,
}

impl SubmissionRecord {
    pub fn is_accepted(&self) -> bool {
        self.status == ACCEPTED_STATUS
    }
}

/// Submissions of any status whose calendar day is `day`
pub fn submissions_on(
    submissions: &[SubmissionRecord],
    day: NaiveDate,
    clock: &dyn Clock,
) -> Vec<SubmissionRecord> {
    submissions
        .iter()
        .filter(|s| clock.day_of(s.timestamp) == Some(day))
        .cloned()
        .collect()
}

/// Whether any accepted submission falls on `day`
pub fn solved_on(submissions: &[SubmissionRecord], day: NaiveDate, clock: &dyn Clock) -> bool {
    submissions
        .iter()
        .any(|s| s.is_accepted() && clock.day_of(s.timestamp) == Some(day))
}

pub fn accepted_count(submissions: &[SubmissionRecord]) -> usize {
    submissions.iter().filter(|s| s.is_accepted()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::FixedClock;
    use chrono::{FixedOffset, TimeZone};

    fn submission(timestamp: i64, status: &str) -> SubmissionRecord {
        SubmissionRecord {
            title: "Two Sum".to_string(),
            title_slug: "two-sum".to_string(),
            timestamp,
            status: status.to_string(),
            language: "rust".to_string(),
        }
    }

    fn clock() -> FixedClock {
        // 2024-03-11 20:00 at +02:00
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        FixedClock::new(offset.with_ymd_and_hms(2024, 3, 11, 20, 0, 0).unwrap())
    }

    #[test]
    fn test_solved_on_requires_accepted_today() {
        let clock = clock();
        let today = clock.today();
        let today_ts = 1_710_151_200; // 2024-03-11T10:00:00Z
        let yesterday_ts = today_ts - 86_400;

        assert!(solved_on(&[submission(today_ts, "Accepted")], today, &clock));
        assert!(!solved_on(&[submission(today_ts, "Wrong Answer")], today, &clock));
        assert!(!solved_on(&[submission(yesterday_ts, "Accepted")], today, &clock));
        assert!(!solved_on(&[], today, &clock));
    }

    #[test]
    fn test_day_boundary_uses_clock_offset() {
        let clock = clock();
        // 2024-03-10T22:30:00Z is 00:30 on the 11th at +02:00
        let just_after_midnight = 1_710_109_800;
        // 2024-03-10T21:59:00Z is 23:59 on the 10th at +02:00
        let just_before_midnight = 1_710_107_940;

        assert!(solved_on(&[submission(just_after_midnight, "Accepted")], clock.today(), &clock));
        assert!(!solved_on(&[submission(just_before_midnight, "Accepted")], clock.today(), &clock));
    }

    #[test]
    fn test_submissions_on_keeps_every_status() {
        let clock = clock();
        let today_ts = 1_710_151_200;
        let all = vec![
            submission(today_ts, "Accepted"),
            submission(today_ts + 60, "Time Limit Exceeded"),
            submission(today_ts - 3 * 86_400, "Accepted"),
        ];

        let today = submissions_on(&all, clock.today(), &clock);
        assert_eq!(today.len(), 2);
        assert_eq!(accepted_count(&today), 1);
    }

    #[test]
    fn test_status_match_is_exact() {
        assert!(submission(0, "Accepted").is_accepted());
        assert!(!submission(0, "accepted").is_accepted());
    }
}
