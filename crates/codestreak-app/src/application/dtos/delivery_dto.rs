use serde::{Deserialize, Serialize};

use codestreak_domain::notification::DeliveryRecord;

/// One logged dispatch attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDto {
    pub id: String,
    pub event: String,
    pub success: bool,
    pub reminder_time: Option<String>,
    pub detail: Option<String>,
    pub occurred_at: String,
}

impl From<&DeliveryRecord> for DeliveryDto {
    fn from(record: &DeliveryRecord) -> Self {
        Self {
            id: record.id().to_string(),
            event: record.event().to_string(),
            success: record.event().is_success(),
            reminder_time: record.reminder_time().map(|t| t.to_string()),
            detail: record.detail().map(str::to_string),
            occurred_at: record.occurred_at().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codestreak_domain::notification::DeliveryEvent;
    use codestreak_domain::shared::UserId;
    use codestreak_domain::streak::ReminderTime;

    #[test]
    fn test_failed_reminder_keeps_reason_and_time() {
        let record = DeliveryRecord::new(
            UserId::new(),
            DeliveryEvent::ReminderFailed,
            Some(ReminderTime::parse("9:05").unwrap()),
            Some("mailbox full".to_string()),
        );

        let json = serde_json::to_value(DeliveryDto::from(&record)).unwrap();
        assert_eq!(json["event"], "reminder_failed");
        assert_eq!(json["success"], false);
        assert_eq!(json["reminderTime"], "09:05");
        assert_eq!(json["detail"], "mailbox full");
        assert!(json["occurredAt"].is_string());
    }
}
