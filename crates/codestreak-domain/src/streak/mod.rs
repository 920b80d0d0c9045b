mod aggregate;
mod reminder_time;
mod repository;
mod settings;


pub use aggregate::{evaluate, StreakEvaluation, StreakOutcome, StreakPolicy, StreakRecord};
pub use reminder_time::ReminderTime;
pub use repository::StreakRepository;
pub use settings::{DueEntry, DueReminder, ReminderSettings, UndecodableDue};
