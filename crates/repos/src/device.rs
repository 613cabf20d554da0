use chrono::NaiveDateTime;
use data::device::{Device, NewDevice};
use data::stats::{DeviceField, WeeklyCount, WeeklyVersionCount};
use sqlx::Postgres;
use tracing::error;

use crate::error::{RepoError, handle_sql_error};

pub struct DeviceRepo {}

impl DeviceRepo {
    pub async fn get_by_id(
        executor: impl sqlx::Executor<'_, Database = Postgres>,
        id: &str,
    ) -> Result<Option<Device>, RepoError> {
        sqlx::query_as::<_, Device>(
            r#"
            SELECT *
            FROM devices
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(|err| {
            error!("Failed to retrieve device {id}: {err}");
            RepoError::DatabaseError("Failed to retrieve device".to_string())
        })
    }

    /// Like [`DeviceRepo::get_by_id`], but locks the row for the rest of the
    /// transaction so concurrent reports for one device apply in sequence.
    pub async fn get_by_id_for_update(
        executor: impl sqlx::Executor<'_, Database = Postgres>,
        id: &str,
    ) -> Result<Option<Device>, RepoError> {
        sqlx::query_as::<_, Device>(
            r#"
            SELECT *
            FROM devices
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(|err| {
            error!("Failed to lock device {id}: {err}");
            RepoError::DatabaseError("Failed to retrieve device".to_string())
        })
    }

    pub async fn get_all(
        executor: impl sqlx::Executor<'_, Database = Postgres>,
    ) -> Result<Vec<Device>, RepoError> {
        sqlx::query_as::<_, Device>(
            r#"
            SELECT *
            FROM devices
            ORDER BY id
            "#,
        )
        .fetch_all(executor)
        .await
        .map_err(|err| {
            error!("Failed to retrieve all devices: {err}");
            RepoError::DatabaseError("Failed to retrieve devices".to_string())
        })
    }

    pub async fn create(
        executor: impl sqlx::Executor<'_, Database = Postgres>,
        device: NewDevice,
        now: NaiveDateTime,
    ) -> Result<String, RepoError> {
        Self::insert(executor, device, now, "")
            .await?
            .ok_or(RepoError::NotFound())
    }

    /// Creates the device unless a row with its id exists already, in which
    /// case `None` is returned and nothing is written. An insert racing a
    /// concurrent transaction for the same id waits for it to finish.
    pub async fn create_if_absent(
        executor: impl sqlx::Executor<'_, Database = Postgres>,
        device: NewDevice,
        now: NaiveDateTime,
    ) -> Result<Option<String>, RepoError> {
        Self::insert(executor, device, now, "ON CONFLICT (id) DO NOTHING").await
    }

    async fn insert(
        executor: impl sqlx::Executor<'_, Database = Postgres>,
        device: NewDevice,
        now: NaiveDateTime,
        on_conflict: &str,
    ) -> Result<Option<String>, RepoError> {
        let query = format!(
            r#"
            INSERT INTO devices
              (
                id,
                version,
                release_name,
                chip,
                led_count,
                is_matrix,
                bootloader_sha256,
                brand,
                product,
                flash_size,
                partition_sizes,
                psram_size,
                psram_present,
                country_code,
                repo,
                created_at,
                updated_at
              )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $16)
            {on_conflict}
            RETURNING
              id
            "#
        );

        sqlx::query_scalar::<_, String>(&query)
            .bind(device.id)
            .bind(device.version)
            .bind(device.release_name)
            .bind(device.chip)
            .bind(device.led_count)
            .bind(device.is_matrix)
            .bind(device.bootloader_sha256)
            .bind(device.brand)
            .bind(device.product)
            .bind(device.flash_size)
            .bind(device.partition_sizes)
            .bind(device.psram_size)
            .bind(device.psram_present)
            .bind(device.country_code)
            .bind(device.repo)
            .bind(now)
            .fetch_optional(executor)
            .await
            .map_err(handle_sql_error)
    }

    /// Overwrites the reported attributes of an existing device. `created_at`
    /// is left untouched.
    pub async fn update(
        executor: impl sqlx::Executor<'_, Database = Postgres>,
        device: NewDevice,
        now: NaiveDateTime,
    ) -> Result<Option<String>, RepoError> {
        let id = device.id.clone();
        sqlx::query_scalar::<_, String>(
            r#"
            UPDATE devices
            SET version = $2,
                release_name = $3,
                chip = $4,
                led_count = $5,
                is_matrix = $6,
                bootloader_sha256 = $7,
                brand = $8,
                product = $9,
                flash_size = $10,
                partition_sizes = $11,
                psram_size = $12,
                psram_present = $13,
                country_code = $14,
                repo = $15,
                updated_at = $16
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(device.id)
        .bind(device.version)
        .bind(device.release_name)
        .bind(device.chip)
        .bind(device.led_count)
        .bind(device.is_matrix)
        .bind(device.bootloader_sha256)
        .bind(device.brand)
        .bind(device.product)
        .bind(device.flash_size)
        .bind(device.partition_sizes)
        .bind(device.psram_size)
        .bind(device.psram_present)
        .bind(device.country_code)
        .bind(device.repo)
        .bind(now)
        .fetch_optional(executor)
        .await
        .map_err(|err| {
            error!("Failed to update device {id}: {err}");
            RepoError::DatabaseError("Failed to update device".to_string())
        })
    }

    pub async fn count(
        executor: impl sqlx::Executor<'_, Database = Postgres>,
    ) -> Result<i64, RepoError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM devices
            "#,
        )
        .fetch_one(executor)
        .await
        .map_err(|err| {
            error!("Failed to count devices: {err}");
            RepoError::DatabaseError("Failed to count devices".to_string())
        })
    }

    fn group_expression(field: DeviceField) -> String {
        match field {
            DeviceField::PsramSize => {
                "CASE WHEN psram_present = FALSE THEN 'None' ELSE psram_size END".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Number of devices per distinct value of `field`, largest group first.
    /// Devices without a value for `field` are left out.
    pub async fn count_grouped_by<K>(
        executor: impl sqlx::Executor<'_, Database = Postgres>,
        field: DeviceField,
    ) -> Result<Vec<(K, i64)>, RepoError>
    where
        K: for<'r> sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres> + Send + Unpin + 'static,
    {
        let key = Self::group_expression(field);
        let query = format!(
            r#"
            SELECT grouped.key, COUNT(*) AS device_count
            FROM (SELECT {key} AS key FROM devices) AS grouped
            WHERE grouped.key IS NOT NULL
            GROUP BY grouped.key
            ORDER BY device_count DESC, grouped.key
            "#
        );

        sqlx::query_as::<_, (K, i64)>(&query)
            .fetch_all(executor)
            .await
            .map_err(|err| {
                error!("Failed to count devices by {field}: {err}");
                RepoError::DatabaseError(format!("Failed to count devices by {field}"))
            })
    }

    /// Devices first seen in each week since `since`.
    pub async fn count_new_by_week(
        executor: impl sqlx::Executor<'_, Database = Postgres>,
        since: NaiveDateTime,
    ) -> Result<Vec<WeeklyCount>, RepoError> {
        sqlx::query_as::<_, WeeklyCount>(
            r#"
            SELECT date_trunc('week', created_at)::date AS week_start, COUNT(*) AS count
            FROM devices
            WHERE created_at >= $1
            GROUP BY week_start
            ORDER BY week_start
            "#,
        )
        .bind(since)
        .fetch_all(executor)
        .await
        .map_err(|err| {
            error!("Failed to count new devices by week: {err}");
            RepoError::DatabaseError("Failed to count new devices by week".to_string())
        })
    }

    /// Devices first seen in each week since `since`, split by the version
    /// they currently report.
    pub async fn count_new_by_week_and_version(
        executor: impl sqlx::Executor<'_, Database = Postgres>,
        since: NaiveDateTime,
    ) -> Result<Vec<WeeklyVersionCount>, RepoError> {
        sqlx::query_as::<_, WeeklyVersionCount>(
            r#"
            SELECT date_trunc('week', created_at)::date AS week_start, version, COUNT(*) AS count
            FROM devices
            WHERE created_at >= $1
            GROUP BY week_start, version
            ORDER BY week_start, version
            "#,
        )
        .bind(since)
        .fetch_all(executor)
        .await
        .map_err(|err| {
            error!("Failed to count new devices by week and version: {err}");
            RepoError::DatabaseError("Failed to count new devices by week and version".to_string())
        })
    }
}
