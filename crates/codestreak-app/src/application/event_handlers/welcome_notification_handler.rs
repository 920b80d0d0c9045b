use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

use codestreak_domain::events::user_events::ExternalHandleLinked;
use codestreak_domain::events::EventHandler;
use codestreak_domain::notification::WelcomeContent;
use codestreak_domain::shared::{DomainError, UserId};
use codestreak_domain::user::UserRepository;

use crate::application::services::NotificationService;

/// Sends the one-shot welcome email after a handle is linked.
///
/// The send runs on a detached task so linking never waits on the mail
/// provider. Outcome is logged and recorded in the delivery log only.
#[derive(Clone)]
pub struct WelcomeNotificationHandler {
    user_repo: Arc<dyn UserRepository>,
    notifications: Arc<NotificationService>,
}

impl WelcomeNotificationHandler {
    pub fn new(user_repo: Arc<dyn UserRepository>, notifications: Arc<NotificationService>) -> Self {
        Self {
            user_repo,
            notifications,
        }
    }

    /// Look the user up again and send. Returns whether a welcome went out.
    pub async fn deliver(&self, user_id: &UserId) -> bool {
        let user = match self.user_repo.find_by_id(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!("⚠️  Welcome skipped: user {} no longer exists", user_id);
                return false;
            }
            Err(e) => {
                warn!("⚠️  Welcome skipped: could not load user {}: {}", user_id, e);
                return false;
            }
        };

        let Some(handle) = user.external_handle() else {
            info!("Welcome skipped: user {} has no linked handle any more", user_id);
            return false;
        };

        let content = WelcomeContent {
            username: user.username().to_string(),
            external_handle: handle.as_str().to_string(),
        };

        self.notifications
            .send_welcome(user.id(), user.email(), content)
            .await
    }
}

#[async_trait]
impl EventHandler<ExternalHandleLinked> for WelcomeNotificationHandler {
    async fn handle(&self, event: &ExternalHandleLinked) -> Result<(), DomainError> {
        info!(
            "Handling ExternalHandleLinked for user {} ({}), queueing welcome email",
            event.user_id, event.handle
        );

        let handler = self.clone();
        let user_id = event.user_id.clone();
        tokio::spawn(async move {
            handler.deliver(&user_id).await;
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codestreak_domain::notification::{
        DeliveryLogRepository, DeliveryRecord, NotificationMessage, NotificationSender,
        NotificationTemplate,
    };
    use codestreak_domain::user::{ExternalHandle, User};
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::sync::{mpsc, Mutex, RwLock};

    struct MockUserRepository {
        users: RwLock<HashMap<UserId, User>>,
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn save(&self, user: &User) -> Result<(), DomainError> {
            self.users.write().await.insert(user.id().clone(), user.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
            Ok(self.users.read().await.get(id).cloned())
        }
    }

    /// Forwards every message to a channel so tests can await delivery
    struct ChannelSender {
        tx: Mutex<mpsc::UnboundedSender<NotificationMessage>>,
    }

    #[async_trait]
    impl NotificationSender for ChannelSender {
        async fn send(&self, message: &NotificationMessage) -> Result<(), DomainError> {
            self.tx
                .lock()
                .await
                .send(message.clone())
                .map_err(|e| DomainError::Dispatch(e.to_string()))
        }

        fn channel_name(&self) -> &'static str {
            "channel"
        }
    }

    struct NullDeliveryLog;

    #[async_trait]
    impl DeliveryLogRepository for NullDeliveryLog {
        async fn append(&self, _record: &DeliveryRecord) -> Result<(), DomainError> {
            Ok(())
        }

        async fn recent_for_user(
            &self,
            _user_id: &UserId,
            _limit: u32,
        ) -> Result<Vec<DeliveryRecord>, DomainError> {
            Ok(Vec::new())
        }
    }

    async fn setup(
        handle: Option<&str>,
    ) -> (
        WelcomeNotificationHandler,
        User,
        mpsc::UnboundedReceiver<NotificationMessage>,
    ) {
        let mut user = User::new("alice@example.com".to_string(), "alice".to_string()).unwrap();
        if let Some(handle) = handle {
            user.link_handle(ExternalHandle::parse(handle).unwrap());
        }

        let repo = Arc::new(MockUserRepository {
            users: RwLock::new(HashMap::new()),
        });
        repo.save(&user).await.unwrap();

        let (tx, rx) = mpsc::unbounded_channel();
        let notifications = Arc::new(NotificationService::new(
            Arc::new(ChannelSender { tx: Mutex::new(tx) }),
            Arc::new(NullDeliveryLog),
            Duration::from_secs(1),
        ));

        (WelcomeNotificationHandler::new(repo, notifications), user, rx)
    }

    #[tokio::test]
    async fn test_linked_event_sends_welcome_in_background() {
        let (handler, user, mut rx) = setup(Some("alice_lc")).await;

        let event = ExternalHandleLinked {
            user_id: user.id().clone(),
            handle: "alice_lc".to_string(),
            occurred_at: chrono::Utc::now(),
        };
        handler.handle(&event).await.unwrap();

        let message = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("welcome was not sent")
            .unwrap();
        assert_eq!(message.recipient, "alice@example.com");
        match message.template {
            NotificationTemplate::Welcome(content) => {
                assert_eq!(content.username, "alice");
                assert_eq!(content.external_handle, "alice_lc");
            }
            other => panic!("expected welcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unlinked_user_gets_no_welcome() {
        let (handler, user, mut rx) = setup(None).await;

        assert!(!handler.deliver(user.id()).await);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unknown_user_gets_no_welcome() {
        let (handler, _user, _rx) = setup(Some("alice_lc")).await;

        assert!(!handler.deliver(&UserId::new()).await);
    }
}
