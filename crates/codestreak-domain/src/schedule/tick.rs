use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::DomainError;
use crate::streak::ReminderTime;

/// The calendar minute a tick is responsible for.
///
/// The string form `YYYY-MM-DD HH:MM` sorts lexically in time order, which
/// the tick marker relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TickSlot {
    date: NaiveDate,
    time: ReminderTime,
}

impl TickSlot {
    pub fn new(date: NaiveDate, time: ReminderTime) -> Self {
        Self { date, time }
    }

    pub fn from_datetime<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let local = now.naive_local();
        Self {
            date: local.date(),
            time: ReminderTime::from_clock(&local.time()),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::Deserialization(format!("Invalid tick slot: {}", raw));
        let (date, time) = raw.split_once(' ').ok_or_else(invalid)?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| invalid())?;
        let time = ReminderTime::parse(time).map_err(|_| invalid())?;
        Ok(Self { date, time })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> ReminderTime {
        self.time
    }
}

impl From<DateTime<FixedOffset>> for TickSlot {
    fn from(now: DateTime<FixedOffset>) -> Self {
        Self::from_datetime(&now)
    }
}

impl fmt::Display for TickSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date.format("%Y-%m-%d"), self.time)
    }
}
