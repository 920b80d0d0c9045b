pub mod delivery_log_repo;
pub mod streak_repo;
pub mod tick_marker_repo;
pub mod user_repo;

pub use delivery_log_repo::SqliteDeliveryLogRepository;
pub use streak_repo::SqliteStreakRepository;
pub use tick_marker_repo::SqliteTickMarkerRepository;
pub use user_repo::SqliteUserRepository;
