use chrono::NaiveDateTime;
use sqlx::Postgres;
use tracing::error;

use crate::error::{RepoError, handle_sql_error};
use data::crash::{MapFile, NewMapFile};

pub struct MapFileRepo {}

impl MapFileRepo {
    pub async fn get_by_version(
        executor: impl sqlx::Executor<'_, Database = Postgres>,
        version: &str,
    ) -> Result<Option<MapFile>, RepoError> {
        sqlx::query_as::<_, MapFile>(
            r#"
            SELECT *
            FROM map_files
            WHERE version = $1
            "#,
        )
        .bind(version)
        .fetch_optional(executor)
        .await
        .map_err(|err| {
            error!("Failed to retrieve map file for version {version}: {err}");
            RepoError::DatabaseError("Failed to retrieve map file".to_string())
        })
    }

    /// Stores the map file for its version, replacing any earlier upload.
    pub async fn upsert(
        executor: impl sqlx::Executor<'_, Database = Postgres>,
        map_file: NewMapFile,
        now: NaiveDateTime,
    ) -> Result<i64, RepoError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO map_files
              (
                version,
                release_name,
                chip,
                content,
                uploaded_at
              )
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (version) DO UPDATE
            SET release_name = EXCLUDED.release_name,
                chip = EXCLUDED.chip,
                content = EXCLUDED.content,
                uploaded_at = EXCLUDED.uploaded_at
            RETURNING
              id
            "#,
        )
        .bind(map_file.version)
        .bind(map_file.release_name)
        .bind(map_file.chip)
        .bind(map_file.content)
        .bind(now)
        .fetch_one(executor)
        .await
        .map_err(handle_sql_error)
    }
}
