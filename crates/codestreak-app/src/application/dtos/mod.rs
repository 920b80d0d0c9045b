mod activity_dto;
mod delivery_dto;
mod streak_dto;

pub use activity_dto::CheckTodayDto;
pub use delivery_dto::DeliveryDto;
pub use streak_dto::{LinkResultDto, ReminderSettingsDto, StreakDto};
