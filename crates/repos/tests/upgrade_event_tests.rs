#![cfg(test)]

use sqlx::PgPool;

use data::upgrade_event::*;
use repos::error::RepoError;
use repos::upgrade_event::*;

use testware::{at, at_time, create_test_device, create_test_upgrade_event};

#[sqlx::test(migrations = "../../migrations")]
async fn test_create(pool: PgPool) {
    create_test_device(&pool, "device-a", "0.14.0", at(2026, 1, 5)).await;

    let event = NewUpgradeEvent {
        device_id: "device-a".to_string(),
        old_version: "0.14.0".to_string(),
        new_version: "0.15.0".to_string(),
    };
    let id = UpgradeEventRepo::create(&pool, event, at_time(2026, 2, 3, 9, 0, 0))
        .await
        .expect("Failed to create upgrade event");

    let events = UpgradeEventRepo::get_by_device(&pool, "device-a")
        .await
        .expect("Failed to get upgrade events");

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, id);
    assert_eq!(events[0].old_version, "0.14.0");
    assert_eq!(events[0].new_version, "0.15.0");
    assert_eq!(events[0].created_at, at_time(2026, 2, 3, 9, 0, 0));
    assert!(!events[0].is_check_in());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_for_unknown_device(pool: PgPool) {
    let event = NewUpgradeEvent {
        device_id: "ghost".to_string(),
        old_version: "0.14.0".to_string(),
        new_version: "0.15.0".to_string(),
    };

    let result = UpgradeEventRepo::create(&pool, event, at(2026, 2, 3)).await;
    assert!(matches!(result, Err(RepoError::ForeignKeyViolation(_, _))));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_get_all_ordering(pool: PgPool) {
    create_test_device(&pool, "a", "0.13.0", at(2026, 1, 5)).await;
    create_test_device(&pool, "b", "0.13.0", at(2026, 1, 5)).await;

    let same_instant = at_time(2026, 2, 1, 12, 0, 0);
    create_test_upgrade_event(&pool, "a", "0.14.0", "0.15.0", at(2026, 3, 1)).await;
    let first = create_test_upgrade_event(&pool, "b", "0.13.0", "0.14.0", same_instant).await;
    let second = create_test_upgrade_event(&pool, "a", "0.13.0", "0.14.0", same_instant).await;

    let all = UpgradeEventRepo::get_all(&pool)
        .await
        .expect("Failed to get all upgrade events");

    assert_eq!(all.len(), 3);
    assert_eq!(all[0].id, first.id);
    assert_eq!(all[1].id, second.id);
    assert_eq!(all[2].created_at, at(2026, 3, 1));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_get_all_error(pool: PgPool) {
    pool.close().await;

    let result = UpgradeEventRepo::get_all(&pool).await;
    assert!(result.is_err(), "Expected an error when getting upgrade events with closed pool");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_count_by_week(pool: PgPool) {
    create_test_device(&pool, "a", "0.13.0", at(2025, 11, 3)).await;

    create_test_upgrade_event(&pool, "a", "0.12.0", "0.13.0", at(2025, 11, 10)).await;
    create_test_upgrade_event(&pool, "a", "0.13.0", "0.14.0", at(2026, 1, 6)).await;
    create_test_upgrade_event(&pool, "a", "0.14.0", "0.14.0", at(2026, 1, 9)).await;
    create_test_upgrade_event(&pool, "a", "0.14.0", "0.15.0", at(2026, 1, 20)).await;

    let weekly = UpgradeEventRepo::count_by_week(&pool, at(2026, 1, 1))
        .await
        .expect("Failed to count upgrades by week");

    let weekly: Vec<_> = weekly
        .into_iter()
        .map(|w| (w.week_start.to_string(), w.count))
        .collect();
    assert_eq!(
        weekly,
        vec![("2026-01-05".to_string(), 2), ("2026-01-19".to_string(), 1)]
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_count_by_week_and_version(pool: PgPool) {
    create_test_device(&pool, "a", "0.13.0", at(2025, 11, 3)).await;
    create_test_device(&pool, "b", "0.13.0", at(2025, 11, 3)).await;

    create_test_upgrade_event(&pool, "a", "0.13.0", "0.14.0", at(2026, 1, 6)).await;
    create_test_upgrade_event(&pool, "b", "0.13.0", "0.14.0", at(2026, 1, 7)).await;
    create_test_upgrade_event(&pool, "b", "0.14.0", "0.15.0", at(2026, 1, 8)).await;

    let weekly = UpgradeEventRepo::count_by_week_and_version(&pool, at(2026, 1, 1))
        .await
        .expect("Failed to count upgrades by week and version");

    let weekly: Vec<_> = weekly
        .into_iter()
        .map(|w| (w.week_start.to_string(), w.version, w.count))
        .collect();
    assert_eq!(
        weekly,
        vec![
            ("2026-01-05".to_string(), "0.14.0".to_string(), 2),
            ("2026-01-05".to_string(), "0.15.0".to_string(), 1),
        ]
    );
}
