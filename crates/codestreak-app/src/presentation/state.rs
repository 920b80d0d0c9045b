use std::sync::Arc;

use codestreak_domain::events::EventBus;
use codestreak_domain::notification::DeliveryLogRepository;
use codestreak_domain::schedule::TickMarkerRepository;
use codestreak_domain::shared::Clock;
use codestreak_domain::streak::StreakRepository;
use codestreak_domain::user::UserRepository;
use codestreak_infrastructure::persistence::Database;

use crate::application::commands::handlers::{
    LinkExternalHandleCommandHandler, UnlinkExternalHandleCommandHandler,
    UpdateReminderSettingsCommandHandler,
};
use crate::application::queries::{ActivityQueries, ReminderQueries};
use crate::application::services::{
    ActivityService, NotificationService, ReminderScheduler, ReminderTicker, StreakService,
};

/// Command handlers container
pub struct CommandHandlers {
    pub update_reminder_settings: Arc<UpdateReminderSettingsCommandHandler>,
    pub link_handle: Arc<LinkExternalHandleCommandHandler>,
    pub unlink_handle: Arc<UnlinkExternalHandleCommandHandler>,
}

pub struct Runtime {
    pub db: Arc<Database>,
    pub event_bus: Arc<dyn EventBus>,
    pub clock: Arc<dyn Clock>,
    /// Bearer secret for the cron trigger; `None` rejects every cron call
    pub cron_secret: Option<String>,
}

pub struct Repositories {
    pub user: Arc<dyn UserRepository>,
    pub streak: Arc<dyn StreakRepository>,
    pub tick_marker: Arc<dyn TickMarkerRepository>,
    pub delivery_log: Arc<dyn DeliveryLogRepository>,
}

pub struct Services {
    pub activity: Arc<ActivityService>,
    pub streak: Arc<StreakService>,
    pub notification: Arc<NotificationService>,
    pub scheduler: Arc<ReminderScheduler>,
    pub ticker: Arc<ReminderTicker>,
}

pub struct Queries {
    pub reminders: Arc<ReminderQueries>,
    pub activity: Arc<ActivityQueries>,
}

/// Shared handler state. Cloning is cheap; every part sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<Runtime>,
    pub repositories: Arc<Repositories>,
    pub services: Arc<Services>,
    pub queries: Arc<Queries>,
    pub command_handlers: Arc<CommandHandlers>,
}
