use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::any::Any;

use crate::events::DomainEvent;
use crate::shared::UserId;

/// Macro to implement DomainEvent trait with type name
macro_rules! impl_domain_event {
    ($type:ty) => {
        impl DomainEvent for $type {
            fn as_any(&self) -> &(dyn Any + Send + Sync) {
                self
            }

            fn event_type_name(&self) -> &'static str {
                std::any::type_name::<Self>()
            }
        }
    };
}

/// Fired when a user links a platform handle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalHandleLinked {
    pub user_id: UserId,
    pub handle: String,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(ExternalHandleLinked);

/// Fired when a user removes their platform handle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalHandleUnlinked {
    pub user_id: UserId,
    pub previous_handle: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(ExternalHandleUnlinked);

/// Fired after reminder settings are written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderSettingsUpdated {
    pub user_id: UserId,
    pub reminder_enabled: bool,
    pub reminder_times: Vec<String>,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(ReminderSettingsUpdated);
