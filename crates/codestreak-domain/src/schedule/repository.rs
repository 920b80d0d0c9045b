use async_trait::async_trait;

use super::tick::TickSlot;
use crate::shared::DomainError;

/// Persisted "last processed minute" marker.
///
/// Lives in the store rather than in process memory so that a restarted or
/// second instance cannot process the same minute twice.
#[async_trait]
pub trait TickMarkerRepository: Send + Sync {
    /// Atomically claim `slot`. Succeeds only if `slot` is strictly later
    /// than the last claimed slot.
    async fn try_claim(&self, slot: &TickSlot) -> Result<bool, DomainError>;

    async fn last_claimed(&self) -> Result<Option<TickSlot>, DomainError>;
}
