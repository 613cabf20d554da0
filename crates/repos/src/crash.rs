use chrono::NaiveDateTime;
use sqlx::Postgres;
use tracing::error;

use crate::error::{RepoError, handle_sql_error};
use data::crash::{CrashInstance, CrashReport, NewCrashInstance, NewCrashReport};

pub struct CrashRepo {}

impl CrashRepo {
    pub async fn get_by_hash(
        executor: impl sqlx::Executor<'_, Database = Postgres>,
        stack_trace_hash: &str,
    ) -> Result<Option<CrashReport>, RepoError> {
        sqlx::query_as::<_, CrashReport>(
            r#"
            SELECT *
            FROM crash_reports
            WHERE stack_trace_hash = $1
            "#,
        )
        .bind(stack_trace_hash)
        .fetch_optional(executor)
        .await
        .map_err(|err| {
            error!("Failed to retrieve crash report {stack_trace_hash}: {err}");
            RepoError::DatabaseError("Failed to retrieve crash report".to_string())
        })
    }

    /// Inserts the report unless one with the same hash already exists, and
    /// returns the id of the stored report either way. A report inserted by a
    /// concurrent transaction is waited for and its id returned.
    pub async fn find_or_create(
        executor: impl sqlx::Executor<'_, Database = Postgres>,
        report: NewCrashReport,
        now: NaiveDateTime,
    ) -> Result<i64, RepoError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO crash_reports
              (
                stack_trace_hash,
                raw_stack_trace,
                exception_cause,
                first_seen
              )
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (stack_trace_hash)
              DO UPDATE SET stack_trace_hash = EXCLUDED.stack_trace_hash
            RETURNING
              id
            "#,
        )
        .bind(report.stack_trace_hash)
        .bind(report.raw_stack_trace)
        .bind(report.exception_cause)
        .bind(now)
        .fetch_one(executor)
        .await
        .map_err(handle_sql_error)
    }

    pub async fn create_instance(
        executor: impl sqlx::Executor<'_, Database = Postgres>,
        instance: NewCrashInstance,
        now: NaiveDateTime,
    ) -> Result<i64, RepoError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO crash_instances
              (
                crash_report_id,
                device_id,
                version,
                chip,
                country_code,
                reported_at
              )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING
              id
            "#,
        )
        .bind(instance.crash_report_id)
        .bind(instance.device_id)
        .bind(instance.version)
        .bind(instance.chip)
        .bind(instance.country_code)
        .bind(now)
        .fetch_one(executor)
        .await
        .map_err(handle_sql_error)
    }

    pub async fn get_instances(
        executor: impl sqlx::Executor<'_, Database = Postgres>,
        crash_report_id: i64,
    ) -> Result<Vec<CrashInstance>, RepoError> {
        sqlx::query_as::<_, CrashInstance>(
            r#"
            SELECT *
            FROM crash_instances
            WHERE crash_report_id = $1
            ORDER BY reported_at, id
            "#,
        )
        .bind(crash_report_id)
        .fetch_all(executor)
        .await
        .map_err(|err| {
            error!("Failed to retrieve instances of crash report {crash_report_id}: {err}");
            RepoError::DatabaseError("Failed to retrieve crash instances".to_string())
        })
    }
}
