mod activity_queries;
mod reminder_queries;

pub use activity_queries::{ActivityQueries, CheckTodayQuery, GetProfileQuery};
pub use reminder_queries::{
    GetDeliveriesQuery, GetReminderSettingsQuery, GetStreakQuery, ReminderQueries,
};

/// Shared by both read models when a user has no streak row yet
pub const STREAK_NOT_FOUND: &str = "Streak data not found";
