use serde::{Deserialize, Serialize};

use codestreak_domain::streak::{ReminderSettings, StreakRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSettingsDto {
    pub reminder_enabled: bool,
    pub reminder_times: Vec<String>, // HH:MM, ascending
}

impl From<ReminderSettings> for ReminderSettingsDto {
    fn from(settings: ReminderSettings) -> Self {
        Self {
            reminder_enabled: settings.reminder_enabled,
            reminder_times: settings
                .reminder_times
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakDto {
    pub user_id: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_solved_date: Option<String>, // YYYY-MM-DD
    pub reminder_enabled: bool,
    pub updated_at: String,
}

impl From<&StreakRecord> for StreakDto {
    fn from(record: &StreakRecord) -> Self {
        Self {
            user_id: record.user_id().to_string(),
            current_streak: record.current_streak(),
            longest_streak: record.longest_streak(),
            last_solved_date: record
                .last_solved_date()
                .map(|d| d.format("%Y-%m-%d").to_string()),
            reminder_enabled: record.is_reminder_enabled(),
            updated_at: record.updated_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResultDto {
    pub message: String,
    pub leetcode_username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use codestreak_domain::streak::ReminderTime;

    #[test]
    fn test_settings_dto_uses_camel_case_and_padded_times() {
        let settings = ReminderSettings::new(
            true,
            vec![
                ReminderTime::parse("22:15").unwrap(),
                ReminderTime::parse("7:30").unwrap(),
            ],
        );

        let json = serde_json::to_value(ReminderSettingsDto::from(settings)).unwrap();
        assert_eq!(json["reminderEnabled"], true);
        assert_eq!(json["reminderTimes"], serde_json::json!(["07:30", "22:15"]));
    }
}
