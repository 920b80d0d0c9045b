use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};

use super::DomainError;

/// Timezone basis shared by "now" and by submission-day truncation.
///
/// Both sides of every "is this today?" comparison must use the same basis,
/// otherwise submissions near midnight land on the wrong day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeBasis {
    /// Host local time
    #[default]
    Local,
    /// A fixed UTC offset, e.g. `+05:30`
    Fixed(FixedOffset),
}

impl TimeBasis {
    /// Parse `+HH:MM`, `-HH:MM`, `Z` or `UTC`
    pub fn parse_offset(raw: &str) -> Result<Self, DomainError> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
            return Ok(Self::Fixed(FixedOffset::east_opt(0).ok_or_else(|| {
                DomainError::Configuration("Invalid UTC offset".to_string())
            })?));
        }

        let invalid = || DomainError::Configuration(format!("Invalid UTC offset: {}", raw));

        let (sign, rest) = match raw.chars().next() {
            Some('+') => (1, &raw[1..]),
            Some('-') => (-1, &raw[1..]),
            _ => return Err(invalid()),
        };
        let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
            return Err(invalid());
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(Self::Fixed)
            .ok_or_else(invalid)
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        match self {
            TimeBasis::Local => chrono::Local::now().fixed_offset(),
            TimeBasis::Fixed(offset) => Utc::now().with_timezone(offset),
        }
    }

    /// Calendar day of an epoch-seconds timestamp in this basis
    pub fn day_of(&self, epoch_secs: i64) -> Option<NaiveDate> {
        let instant = Utc.timestamp_opt(epoch_secs, 0).single()?;
        Some(match self {
            TimeBasis::Local => instant.with_timezone(&chrono::Local).date_naive(),
            TimeBasis::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        })
    }
}

/// Source of the current wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;

    fn day_of(&self, epoch_secs: i64) -> Option<NaiveDate>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Host clock read through a [`TimeBasis`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    basis: TimeBasis,
}

impl SystemClock {
    pub fn new(basis: TimeBasis) -> Self {
        Self { basis }
    }

    pub fn basis(&self) -> TimeBasis {
        self.basis
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.basis.now()
    }

    fn day_of(&self, epoch_secs: i64) -> Option<NaiveDate> {
        self.basis.day_of(epoch_secs)
    }
}

/// Clock pinned to one instant, used to replay a tick at a known time
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<FixedOffset>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    fn day_of(&self, epoch_secs: i64) -> Option<NaiveDate> {
        TimeBasis::Fixed(*self.now.offset()).day_of(epoch_secs)
    }
}
