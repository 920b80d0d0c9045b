mod welcome_notification_handler;

pub use welcome_notification_handler::WelcomeNotificationHandler;
