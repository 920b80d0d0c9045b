mod activity_service;
mod notification_service;
mod reminder_scheduler;
mod streak_service;
mod ticker;

pub use activity_service::{ActivityService, SOLVED_TODAY_WINDOW, TODAY_SUBMISSIONS_WINDOW};
pub use notification_service::NotificationService;
pub use reminder_scheduler::{ReminderScheduler, TickStatus, TickSummary};
pub use streak_service::StreakService;
pub use ticker::ReminderTicker;
