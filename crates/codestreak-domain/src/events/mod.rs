use async_trait::async_trait;
use std::any::Any;

use crate::shared::DomainError;

pub mod user_events;

/// Something that happened to an aggregate, published after the write commits
pub trait DomainEvent: Send + Sync + Any {
    fn as_any(&self) -> &(dyn Any + Send + Sync);

    /// Concrete type name, used in logs
    fn event_type_name(&self) -> &'static str;
}

#[async_trait]
pub trait EventBus: Send + Sync {
    /// Deliver `event` to every subscriber of its concrete type.
    ///
    /// Subscriber failures are the bus's concern; publishers only see errors
    /// from the bus itself.
    async fn publish(&self, event: Box<dyn DomainEvent>) -> Result<(), DomainError>;
}

/// Reacts to one concrete event type
#[async_trait]
pub trait EventHandler<E: DomainEvent>: Send + Sync {
    async fn handle(&self, event: &E) -> Result<(), DomainError>;
}
