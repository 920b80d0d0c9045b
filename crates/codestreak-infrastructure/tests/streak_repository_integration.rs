use chrono::NaiveDate;
use std::sync::Arc;

use codestreak_domain::shared::{DomainError, UserId};
use codestreak_domain::streak::{ReminderTime, StreakRecord, StreakRepository};
use codestreak_infrastructure::persistence::repositories::SqliteStreakRepository;

mod test_helpers;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn times(raw: &[&str]) -> Vec<ReminderTime> {
    raw.iter().map(|t| ReminderTime::parse(t).unwrap()).collect()
}

#[tokio::test]
async fn streak_repo_insert_and_optimistic_update_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let repo = SqliteStreakRepository::new(Arc::new(pool.clone()));
    let user = test_helpers::insert_user(&pool, "alice", Some("alice_lc")).await;

    let first = StreakRecord::first_evaluation(user.id().clone(), true, day(2024, 3, 10));
    assert!(repo.insert_if_absent(&first).await.unwrap());
    assert!(!repo.insert_if_absent(&first).await.unwrap());

    let stored = repo.find_by_user(user.id()).await.unwrap().unwrap();
    assert_eq!(stored.current_streak(), 1);
    assert_eq!(stored.last_solved_date(), Some(day(2024, 3, 10)));

    let mut next = stored.clone();
    next.register_solve(day(2024, 3, 11));

    // Stale expectations lose
    assert!(!repo
        .update_if_unchanged(&next, None, 0)
        .await
        .unwrap());

    assert!(repo
        .update_if_unchanged(&next, stored.last_solved_date(), stored.current_streak())
        .await
        .unwrap());

    let updated = repo.find_by_user(user.id()).await.unwrap().unwrap();
    assert_eq!(updated.current_streak(), 2);
    assert_eq!(updated.longest_streak(), 2);
    assert_eq!(updated.last_solved_date(), Some(day(2024, 3, 11)));
}

#[tokio::test]
async fn streak_repo_update_from_empty_record_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let repo = SqliteStreakRepository::new(Arc::new(pool.clone()));
    let user = test_helpers::insert_user(&pool, "bob", Some("bob_lc")).await;

    let empty = StreakRecord::new(user.id().clone());
    assert!(repo.insert_if_absent(&empty).await.unwrap());

    let mut solved = empty.clone();
    solved.register_solve(day(2024, 1, 1));

    // NULL last_solved_date must match an expected None
    assert!(repo.update_if_unchanged(&solved, None, 0).await.unwrap());
}

#[tokio::test]
async fn streak_repo_settings_roundtrip_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let repo = SqliteStreakRepository::new(Arc::new(pool.clone()));
    let user = test_helpers::insert_user(&pool, "carol", Some("carol_lc")).await;

    assert!(repo.find_settings(user.id()).await.unwrap().is_none());

    let saved = repo
        .save_settings(user.id(), Some(true), Some(times(&["22:00", "09:00"])))
        .await
        .unwrap();
    assert!(saved.reminder_enabled);
    assert_eq!(saved.reminder_times, times(&["09:00", "22:00"]));

    // Replacing the set drops old rows entirely
    repo.save_settings(user.id(), Some(false), Some(times(&["18:30"])))
        .await
        .unwrap();
    let settings = repo.find_settings(user.id()).await.unwrap().unwrap();
    assert!(!settings.reminder_enabled);
    assert_eq!(settings.reminder_times, times(&["18:30"]));

    // Omitted enabled flag defaults to true; omitted times are kept
    let defaulted = repo.save_settings(user.id(), None, None).await.unwrap();
    assert!(defaulted.reminder_enabled);
    assert_eq!(defaulted.reminder_times, times(&["18:30"]));
}

#[tokio::test]
async fn streak_repo_settings_keep_counters_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let repo = SqliteStreakRepository::new(Arc::new(pool.clone()));
    let user = test_helpers::insert_user(&pool, "dave", Some("dave_lc")).await;

    let record = StreakRecord::restore(user.id().clone(), 4, 9, Some(day(2024, 5, 1)), true, chrono::Utc::now())
        .unwrap();
    repo.insert_if_absent(&record).await.unwrap();

    repo.save_settings(user.id(), Some(false), Some(times(&["07:00"])))
        .await
        .unwrap();

    let stored = repo.find_by_user(user.id()).await.unwrap().unwrap();
    assert_eq!(stored.current_streak(), 4);
    assert_eq!(stored.longest_streak(), 9);
    assert!(!stored.is_reminder_enabled());
}

#[tokio::test]
async fn streak_repo_find_due_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let repo = SqliteStreakRepository::new(Arc::new(pool.clone()));

    let linked = test_helpers::insert_user(&pool, "erin", Some("erin_lc")).await;
    let unlinked = test_helpers::insert_user(&pool, "frank", None).await;
    let other_time = test_helpers::insert_user(&pool, "gina", Some("gina_lc")).await;

    repo.save_settings(linked.id(), Some(true), Some(times(&["20:00"])))
        .await
        .unwrap();
    repo.save_settings(unlinked.id(), Some(false), Some(times(&["20:00"])))
        .await
        .unwrap();
    repo.save_settings(other_time.id(), Some(true), Some(times(&["21:00"])))
        .await
        .unwrap();

    // Inactive rows are never due
    sqlx::query("UPDATE reminder_times SET is_active = 0 WHERE user_id = ?1")
        .bind(other_time.id().as_str())
        .execute(&pool)
        .await
        .unwrap();

    let due: Vec<_> = repo
        .find_due(&ReminderTime::parse("20:00").unwrap())
        .await
        .unwrap()
        .into_iter()
        .map(Result::unwrap)
        .collect();
    assert_eq!(due.len(), 2);

    let erin = due.iter().find(|d| &d.user_id == linked.id()).unwrap();
    assert_eq!(erin.email, "erin@example.com");
    assert_eq!(erin.external_handle.as_ref().map(|h| h.as_str()), Some("erin_lc"));
    assert!(erin.reminder_enabled);
    assert_eq!(erin.reminder_time.to_string(), "20:00");

    let frank = due.iter().find(|d| &d.user_id == unlinked.id()).unwrap();
    assert!(frank.external_handle.is_none());
    assert!(!frank.reminder_enabled);

    assert!(repo
        .find_due(&ReminderTime::parse("21:00").unwrap())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn streak_repo_find_due_decodes_rows_independently() {
    let pool = test_helpers::setup_in_memory_db().await;
    let repo = SqliteStreakRepository::new(Arc::new(pool.clone()));

    let good = test_helpers::insert_user(&pool, "hana", Some("hana_lc")).await;
    let blank = test_helpers::insert_user(&pool, "ivan", Some("ivan_lc")).await;
    let broken = test_helpers::insert_user(&pool, "jade", Some("jade_lc")).await;

    for user in [&good, &blank, &broken] {
        repo.save_settings(user.id(), Some(true), Some(times(&["21:00"])))
            .await
            .unwrap();
    }

    // Written behind our back by whatever owns the users table
    sqlx::query("UPDATE users SET leetcode_username = '' WHERE id = ?1")
        .bind(blank.id().as_str())
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("UPDATE users SET leetcode_username = ?1 WHERE id = ?2")
        .bind("x".repeat(80))
        .bind(broken.id().as_str())
        .execute(&pool)
        .await
        .unwrap();

    let due = repo
        .find_due(&ReminderTime::parse("21:00").unwrap())
        .await
        .unwrap();
    assert_eq!(due.len(), 3);

    let entry = |id: &UserId| {
        due.iter()
            .find(|e| match e {
                Ok(d) => &d.user_id == id,
                Err(u) => &u.user_id == id,
            })
            .unwrap()
    };

    let hana = entry(good.id()).as_ref().unwrap();
    assert_eq!(hana.external_handle.as_ref().map(|h| h.as_str()), Some("hana_lc"));

    let ivan = entry(blank.id()).as_ref().unwrap();
    assert!(ivan.external_handle.is_none());

    let jade = entry(broken.id()).as_ref().unwrap_err();
    assert!(jade.reason.contains("handle"));
}

#[tokio::test]
async fn streak_repo_settings_for_unknown_user_is_integrity_error() {
    let pool = test_helpers::setup_in_memory_db().await;
    let repo = SqliteStreakRepository::new(Arc::new(pool));

    let result = repo
        .save_settings(&UserId::new(), Some(true), Some(times(&["08:00"])))
        .await;

    assert!(matches!(result, Err(DomainError::DataIntegrity(_))));
}
