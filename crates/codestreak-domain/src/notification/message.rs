use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::streak::ReminderTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    Reminder,
    Welcome,
}

impl TemplateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Reminder => "reminder",
            TemplateKind::Welcome => "welcome",
        }
    }
}

/// Data for the "you have not solved anything today" email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderContent {
    pub username: String,
    pub external_handle: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_solved_date: Option<NaiveDate>,
    /// Whole days between the last solve and the reminder day, 0 when unknown
    pub days_since_last_solve: u32,
    pub reminder_time: ReminderTime,
}

/// Data for the one-shot email sent after a handle is linked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeContent {
    pub username: String,
    pub external_handle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum NotificationTemplate {
    Reminder(ReminderContent),
    Welcome(WelcomeContent),
}

impl NotificationTemplate {
    pub fn kind(&self) -> TemplateKind {
        match self {
            NotificationTemplate::Reminder(_) => TemplateKind::Reminder,
            NotificationTemplate::Welcome(_) => TemplateKind::Welcome,
        }
    }
}

/// A fully-formed message for a single recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub recipient: String,
    pub template: NotificationTemplate,
}

impl NotificationMessage {
    pub fn reminder(recipient: impl Into<String>, content: ReminderContent) -> Self {
        Self {
            recipient: recipient.into(),
            template: NotificationTemplate::Reminder(content),
        }
    }

    pub fn welcome(recipient: impl Into<String>, content: WelcomeContent) -> Self {
        Self {
            recipient: recipient.into(),
            template: NotificationTemplate::Welcome(content),
        }
    }

    pub fn kind(&self) -> TemplateKind {
        self.template.kind()
    }
}
