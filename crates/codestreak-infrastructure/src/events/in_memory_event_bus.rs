use async_trait::async_trait;
use log::{error, info};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::RwLock;

use codestreak_domain::events::{DomainEvent, EventBus, EventHandler};
use codestreak_domain::shared::DomainError;

/// Handler with its event type erased so handlers for different events can
/// share one map
#[async_trait]
trait Subscriber: Send + Sync {
    async fn deliver(&self, event: &(dyn Any + Send + Sync)) -> Result<(), DomainError>;
}

struct Subscription<E, H> {
    handler: H,
    _event: PhantomData<fn(E)>,
}

#[async_trait]
impl<E, H> Subscriber for Subscription<E, H>
where
    E: DomainEvent + 'static,
    H: EventHandler<E>,
{
    async fn deliver(&self, event: &(dyn Any + Send + Sync)) -> Result<(), DomainError> {
        match event.downcast_ref::<E>() {
            Some(event) => self.handler.handle(event).await,
            None => Err(DomainError::Infrastructure(format!(
                "Subscriber for {} received another event type",
                std::any::type_name::<E>()
            ))),
        }
    }
}

/// In-process event bus keyed by the event's concrete type.
///
/// Handlers run in subscription order on the publisher's task. A handler that
/// needs to do slow work spawns it and returns.
#[derive(Default)]
pub struct InMemoryEventBus {
    subscribers: RwLock<HashMap<TypeId, Vec<Arc<dyn Subscriber>>>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe<E, H>(&self, handler: H)
    where
        E: DomainEvent + 'static,
        H: EventHandler<E> + 'static,
    {
        let subscription: Arc<dyn Subscriber> = Arc::new(Subscription::<E, H> {
            handler,
            _event: PhantomData,
        });
        self.subscribers
            .write()
            .await
            .entry(TypeId::of::<E>())
            .or_default()
            .push(subscription);

        info!("Subscribed handler for {}", std::any::type_name::<E>());
    }

    pub async fn handler_count<E: DomainEvent + 'static>(&self) -> usize {
        self.subscribers
            .read()
            .await
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish(&self, event: Box<dyn DomainEvent>) -> Result<(), DomainError> {
        let payload = event.as_any();
        let name = event.event_type_name();

        // Snapshot so a handler can publish without deadlocking on the map
        let subscribers = self
            .subscribers
            .read()
            .await
            .get(&payload.type_id())
            .cloned()
            .unwrap_or_default();

        if subscribers.is_empty() {
            info!("No handlers registered for {}", name);
            return Ok(());
        }

        for subscriber in subscribers {
            if let Err(e) = subscriber.deliver(payload).await {
                error!("Handler failed on {}: {}", name, e);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use codestreak_domain::events::user_events::{ExternalHandleLinked, ExternalHandleUnlinked};
    use codestreak_domain::shared::UserId;

    struct CountingHandler {
        calls: Arc<RwLock<Vec<String>>>,
    }

    #[async_trait]
    impl EventHandler<ExternalHandleLinked> for CountingHandler {
        async fn handle(&self, event: &ExternalHandleLinked) -> Result<(), DomainError> {
            self.calls.write().await.push(event.handle.clone());
            Ok(())
        }
    }

    struct FailingHandler;

    #[async_trait]
    impl EventHandler<ExternalHandleLinked> for FailingHandler {
        async fn handle(&self, _event: &ExternalHandleLinked) -> Result<(), DomainError> {
            Err(DomainError::Infrastructure("boom".to_string()))
        }
    }

    fn linked(handle: &str) -> Box<ExternalHandleLinked> {
        Box::new(ExternalHandleLinked {
            user_id: UserId::new(),
            handle: handle.to_string(),
            occurred_at: Utc::now(),
        })
    }

    #[tokio::test]
    async fn test_event_bus_publishes_to_handlers() {
        let bus = InMemoryEventBus::new();
        let calls = Arc::new(RwLock::new(Vec::new()));

        bus.subscribe::<ExternalHandleLinked, _>(CountingHandler {
            calls: calls.clone(),
        })
        .await;

        assert_eq!(bus.handler_count::<ExternalHandleLinked>().await, 1);
        assert_eq!(bus.handler_count::<ExternalHandleUnlinked>().await, 0);

        bus.publish(linked("alice")).await.unwrap();

        assert_eq!(*calls.read().await, vec!["alice".to_string()]);
    }

    #[tokio::test]
    async fn test_failing_handler_does_not_stop_others() {
        let bus = InMemoryEventBus::new();
        let calls = Arc::new(RwLock::new(Vec::new()));

        bus.subscribe::<ExternalHandleLinked, _>(FailingHandler).await;
        bus.subscribe::<ExternalHandleLinked, _>(CountingHandler {
            calls: calls.clone(),
        })
        .await;

        assert!(bus.publish(linked("bob")).await.is_ok());
        assert_eq!(calls.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_unsubscribed_event_is_ignored() {
        let bus = InMemoryEventBus::new();
        let event = Box::new(ExternalHandleUnlinked {
            user_id: UserId::new(),
            previous_handle: None,
            occurred_at: Utc::now(),
        });

        assert!(bus.publish(event).await.is_ok());
    }
}
