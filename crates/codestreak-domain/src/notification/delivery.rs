use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::{DeliveryId, DomainError, UserId};
use crate::streak::ReminderTime;

/// Outcome of one dispatch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryEvent {
    ReminderSent,
    ReminderFailed,
    WelcomeSent,
    WelcomeFailed,
}

impl DeliveryEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryEvent::ReminderSent => "reminder_sent",
            DeliveryEvent::ReminderFailed => "reminder_failed",
            DeliveryEvent::WelcomeSent => "welcome_sent",
            DeliveryEvent::WelcomeFailed => "welcome_failed",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryEvent::ReminderSent | DeliveryEvent::WelcomeSent)
    }
}

impl FromStr for DeliveryEvent {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reminder_sent" => Ok(DeliveryEvent::ReminderSent),
            "reminder_failed" => Ok(DeliveryEvent::ReminderFailed),
            "welcome_sent" => Ok(DeliveryEvent::WelcomeSent),
            "welcome_failed" => Ok(DeliveryEvent::WelcomeFailed),
            other => Err(DomainError::Deserialization(format!(
                "Unknown delivery event: {other}"
            ))),
        }
    }
}

impl fmt::Display for DeliveryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery log entry kept for observability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRecord {
    id: DeliveryId,
    user_id: UserId,
    event: DeliveryEvent,
    reminder_time: Option<ReminderTime>,
    detail: Option<String>,
    occurred_at: DateTime<Utc>,
}

impl DeliveryRecord {
    pub fn new(
        user_id: UserId,
        event: DeliveryEvent,
        reminder_time: Option<ReminderTime>,
        detail: Option<String>,
    ) -> Self {
        Self {
            id: DeliveryId::new(),
            user_id,
            event,
            reminder_time,
            detail,
            occurred_at: Utc::now(),
        }
    }

    pub fn restore(
        id: DeliveryId,
        user_id: UserId,
        event: DeliveryEvent,
        reminder_time: Option<ReminderTime>,
        detail: Option<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            event,
            reminder_time,
            detail,
            occurred_at,
        }
    }

    pub fn id(&self) -> &DeliveryId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn event(&self) -> DeliveryEvent {
        self.event
    }

    pub fn reminder_time(&self) -> Option<ReminderTime> {
        self.reminder_time
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

#[async_trait]
pub trait DeliveryLogRepository: Send + Sync {
    async fn append(&self, record: &DeliveryRecord) -> Result<(), DomainError>;

    /// Newest first
    async fn recent_for_user(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<DeliveryRecord>, DomainError>;
}
