mod delivery;
mod message;
mod sender;
mod value_objects;

pub use delivery::{DeliveryEvent, DeliveryLogRepository, DeliveryRecord};
pub use message::{
    NotificationMessage, NotificationTemplate, ReminderContent, TemplateKind, WelcomeContent,
};
pub use sender::NotificationSender;
pub use value_objects::{ChannelConfig, ChannelType};
