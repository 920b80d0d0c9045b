use super::command_handler::Command;
use crate::application::dtos::ReminderSettingsDto;

// ============================================================
// Reminder Settings Commands
// ============================================================

/// Write reminder settings. Omitted fields keep their stored value, except
/// that `reminder_enabled` falls back to `true`.
#[derive(Debug, Clone)]
pub struct UpdateReminderSettingsCommand {
    pub user_id: String,
    pub reminder_enabled: Option<bool>,
    /// Replaces the whole set when present
    pub reminder_times: Option<Vec<String>>,
}

impl Command for UpdateReminderSettingsCommand {}

pub type UpdateReminderSettingsResult = ReminderSettingsDto;
