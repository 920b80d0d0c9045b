use std::sync::Arc;

use codestreak_domain::schedule::{TickMarkerRepository, TickSlot};
use codestreak_infrastructure::persistence::repositories::SqliteTickMarkerRepository;

mod test_helpers;

#[tokio::test]
async fn tick_marker_claims_each_slot_once_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let repo = SqliteTickMarkerRepository::new(Arc::new(pool));

    let first = TickSlot::parse("2024-03-10 20:00").unwrap();
    let second = TickSlot::parse("2024-03-10 20:01").unwrap();

    assert!(repo.last_claimed().await.unwrap().is_none());

    assert!(repo.try_claim(&first).await.unwrap());
    assert!(!repo.try_claim(&first).await.unwrap());
    assert_eq!(repo.last_claimed().await.unwrap(), Some(first));

    assert!(repo.try_claim(&second).await.unwrap());

    // Older slots are never re-claimed
    assert!(!repo.try_claim(&first).await.unwrap());
    assert_eq!(repo.last_claimed().await.unwrap(), Some(second));
}

#[tokio::test]
async fn tick_marker_orders_across_days_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let repo = SqliteTickMarkerRepository::new(Arc::new(pool));

    assert!(repo
        .try_claim(&TickSlot::parse("2024-03-10 23:59").unwrap())
        .await
        .unwrap());
    assert!(repo
        .try_claim(&TickSlot::parse("2024-03-11 00:00").unwrap())
        .await
        .unwrap());
}
