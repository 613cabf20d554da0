use chrono::NaiveDateTime;
use data::stats::{WeeklyCount, WeeklyVersionCount};
use data::upgrade_event::{NewUpgradeEvent, UpgradeEvent};
use sqlx::Postgres;
use tracing::error;

use crate::error::{RepoError, handle_sql_error};

pub struct UpgradeEventRepo {}

impl UpgradeEventRepo {
    pub async fn create(
        executor: impl sqlx::Executor<'_, Database = Postgres>,
        event: NewUpgradeEvent,
        now: NaiveDateTime,
    ) -> Result<i64, RepoError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO upgrade_events
              (
                device_id,
                old_version,
                new_version,
                created_at
              )
            VALUES ($1, $2, $3, $4)
            RETURNING
              id
            "#,
        )
        .bind(event.device_id)
        .bind(event.old_version)
        .bind(event.new_version)
        .bind(now)
        .fetch_one(executor)
        .await
        .map_err(handle_sql_error)
    }

    /// All events, oldest first. Events sharing a timestamp come back in
    /// insertion order.
    pub async fn get_all(
        executor: impl sqlx::Executor<'_, Database = Postgres>,
    ) -> Result<Vec<UpgradeEvent>, RepoError> {
        sqlx::query_as::<_, UpgradeEvent>(
            r#"
            SELECT *
            FROM upgrade_events
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(executor)
        .await
        .map_err(|err| {
            error!("Failed to retrieve all upgrade events: {err}");
            RepoError::DatabaseError("Failed to retrieve upgrade events".to_string())
        })
    }

    pub async fn get_by_device(
        executor: impl sqlx::Executor<'_, Database = Postgres>,
        device_id: &str,
    ) -> Result<Vec<UpgradeEvent>, RepoError> {
        sqlx::query_as::<_, UpgradeEvent>(
            r#"
            SELECT *
            FROM upgrade_events
            WHERE device_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(device_id)
        .fetch_all(executor)
        .await
        .map_err(|err| {
            error!("Failed to retrieve upgrade events for device {device_id}: {err}");
            RepoError::DatabaseError("Failed to retrieve upgrade events".to_string())
        })
    }

    /// Upgrade reports per week since `since`, check-ins included.
    pub async fn count_by_week(
        executor: impl sqlx::Executor<'_, Database = Postgres>,
        since: NaiveDateTime,
    ) -> Result<Vec<WeeklyCount>, RepoError> {
        sqlx::query_as::<_, WeeklyCount>(
            r#"
            SELECT date_trunc('week', created_at)::date AS week_start, COUNT(*) AS count
            FROM upgrade_events
            WHERE created_at >= $1
            GROUP BY week_start
            ORDER BY week_start
            "#,
        )
        .bind(since)
        .fetch_all(executor)
        .await
        .map_err(|err| {
            error!("Failed to count upgrades by week: {err}");
            RepoError::DatabaseError("Failed to count upgrades by week".to_string())
        })
    }

    /// Upgrade reports per week since `since`, split by the version reported.
    pub async fn count_by_week_and_version(
        executor: impl sqlx::Executor<'_, Database = Postgres>,
        since: NaiveDateTime,
    ) -> Result<Vec<WeeklyVersionCount>, RepoError> {
        sqlx::query_as::<_, WeeklyVersionCount>(
            r#"
            SELECT date_trunc('week', created_at)::date AS week_start,
                   new_version AS version,
                   COUNT(*) AS count
            FROM upgrade_events
            WHERE created_at >= $1
            GROUP BY week_start, new_version
            ORDER BY week_start, new_version
            "#,
        )
        .bind(since)
        .fetch_all(executor)
        .await
        .map_err(|err| {
            error!("Failed to count upgrades by week and version: {err}");
            RepoError::DatabaseError("Failed to count upgrades by week and version".to_string())
        })
    }
}
