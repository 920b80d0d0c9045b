use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use codestreak_domain::activity::ActivitySource;
use codestreak_domain::events::user_events::ExternalHandleLinked;
use codestreak_domain::events::EventBus;
use codestreak_domain::notification::{DeliveryLogRepository, NotificationSender};
use codestreak_domain::schedule::TickMarkerRepository;
use codestreak_domain::shared::{Clock, DomainError, SystemClock};
use codestreak_domain::streak::StreakRepository;
use codestreak_domain::user::UserRepository;
use codestreak_infrastructure::config::AppConfig;
use codestreak_infrastructure::events::InMemoryEventBus;
use codestreak_infrastructure::http::LeetCodeClient;
use codestreak_infrastructure::notification::create_sender;
use codestreak_infrastructure::persistence::{
    repositories::{
        SqliteDeliveryLogRepository, SqliteStreakRepository, SqliteTickMarkerRepository,
        SqliteUserRepository,
    },
    Database,
};

use crate::application::commands::handlers::{
    LinkExternalHandleCommandHandler, UnlinkExternalHandleCommandHandler,
    UpdateReminderSettingsCommandHandler,
};
use crate::application::event_handlers::WelcomeNotificationHandler;
use crate::application::queries::{ActivityQueries, ReminderQueries};
use crate::application::services::{
    ActivityService, NotificationService, ReminderScheduler, ReminderTicker, StreakService,
};
use crate::presentation::state::{
    AppState, CommandHandlers, Queries, Repositories, Runtime, Services,
};

/// The parts of the graph that talk to the outside world
pub struct ExternalAdapters {
    pub activity_source: Arc<dyn ActivitySource>,
    pub sender: Arc<dyn NotificationSender>,
    pub clock: Arc<dyn Clock>,
}

pub async fn build_app_state(config: &AppConfig) -> Result<AppState, DomainError> {
    info!("Database path: {}", config.database_path.display());

    info!("🔌 Connecting to database...");
    let started_at = Instant::now();
    let database = Database::new(&config.database_path, config.timeouts.db_query).await?;
    info!(
        "✓ Database connection established ({}ms)",
        started_at.elapsed().as_millis()
    );

    let activity_source = LeetCodeClient::new(
        config.leetcode.graphql_url.clone(),
        config.timeouts.http_request,
    )
    .map_err(|e| DomainError::Configuration(format!("Failed to create LeetCode client: {}", e)))?;

    let sender = create_sender(&config.email, config.timeouts.dispatch)?;
    info!("📧 Email channel: {}", sender.channel_name());

    let adapters = ExternalAdapters {
        activity_source: Arc::new(activity_source),
        sender,
        clock: Arc::new(SystemClock::new(config.scheduler.time_basis)),
    };

    assemble_app_state(config, database, adapters).await
}

/// Wire repositories, services and handlers around an open database
pub async fn assemble_app_state(
    config: &AppConfig,
    database: Database,
    adapters: ExternalAdapters,
) -> Result<AppState, DomainError> {
    let startup_started_at = Instant::now();

    info!("🔄 Running migrations...");
    let started_at = Instant::now();
    database.run_migrations().await?;
    info!(
        "✓ Migrations completed ({}ms)",
        started_at.elapsed().as_millis()
    );

    let pool = Arc::new(database.pool().clone());

    let user_repo = Arc::new(SqliteUserRepository::new(pool.clone())) as Arc<dyn UserRepository>;
    let streak_repo =
        Arc::new(SqliteStreakRepository::new(pool.clone())) as Arc<dyn StreakRepository>;
    let tick_marker_repo =
        Arc::new(SqliteTickMarkerRepository::new(pool.clone())) as Arc<dyn TickMarkerRepository>;
    let delivery_log_repo = Arc::new(SqliteDeliveryLogRepository::new(pool.clone()))
        as Arc<dyn DeliveryLogRepository>;

    let ExternalAdapters {
        activity_source,
        sender,
        clock,
    } = adapters;

    let activity_service = Arc::new(ActivityService::new(
        activity_source,
        clock.clone(),
        config.timeouts.activity_query,
    ));
    let streak_service = Arc::new(StreakService::new(
        streak_repo.clone(),
        config.scheduler.streak_policy,
    ));
    let notification_service = Arc::new(NotificationService::new(
        sender,
        delivery_log_repo.clone(),
        config.timeouts.dispatch,
    ));

    let scheduler = Arc::new(ReminderScheduler::new(
        activity_service.clone(),
        streak_service.clone(),
        notification_service.clone(),
        streak_repo.clone(),
        tick_marker_repo.clone(),
        clock.clone(),
    ));
    let ticker = Arc::new(ReminderTicker::new(scheduler.clone()));
    info!(
        "⏰ Reminder scheduler ready (policy: {:?}, basis: {:?})",
        config.scheduler.streak_policy, config.scheduler.time_basis
    );

    let event_bus = Arc::new(InMemoryEventBus::new());
    let welcome_handler =
        WelcomeNotificationHandler::new(user_repo.clone(), notification_service.clone());
    event_bus
        .subscribe::<ExternalHandleLinked, _>(welcome_handler)
        .await;
    let event_bus = event_bus as Arc<dyn EventBus>;

    let command_handlers = CommandHandlers {
        update_reminder_settings: Arc::new(UpdateReminderSettingsCommandHandler::new(
            user_repo.clone(),
            streak_repo.clone(),
            event_bus.clone(),
        )),
        link_handle: Arc::new(LinkExternalHandleCommandHandler::new(
            user_repo.clone(),
            streak_repo.clone(),
            activity_service.clone(),
            event_bus.clone(),
            config.leetcode.validate_handles,
        )),
        unlink_handle: Arc::new(UnlinkExternalHandleCommandHandler::new(
            user_repo.clone(),
            event_bus.clone(),
        )),
    };

    let queries = Queries {
        reminders: Arc::new(ReminderQueries::new(
            streak_repo.clone(),
            notification_service.clone(),
        )),
        activity: Arc::new(ActivityQueries::new(
            user_repo.clone(),
            activity_service.clone(),
        )),
    };

    info!(
        "✓ Application state assembled ({}ms)",
        startup_started_at.elapsed().as_millis()
    );

    Ok(AppState {
        runtime: Arc::new(Runtime {
            db: Arc::new(database),
            event_bus,
            clock,
            cron_secret: config.cron_secret.clone(),
        }),
        repositories: Arc::new(Repositories {
            user: user_repo,
            streak: streak_repo,
            tick_marker: tick_marker_repo,
            delivery_log: delivery_log_repo,
        }),
        services: Arc::new(Services {
            activity: activity_service,
            streak: streak_service,
            notification: notification_service,
            scheduler,
            ticker,
        }),
        queries: Arc::new(queries),
        command_handlers: Arc::new(command_handlers),
    })
}
