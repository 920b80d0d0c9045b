// Domain layer - Pure business logic
// No dependencies on infrastructure or presentation layers

pub mod activity;
pub mod events;
pub mod notification;
pub mod schedule;
pub mod shared;
pub mod streak;
pub mod user;

// Re-exports for convenience
pub use events::DomainEvent;
pub use shared::{DomainError, UserId};
