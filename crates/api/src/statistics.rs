use axum::Json;
use axum::extract::State;
use tracing::{debug, instrument};

use crate::error::ApiError;
use crate::state::AppState;
use data::stats::{
    ChipStats, CountryStats, DeviceField, FlashSizeStats, LedCountRangeStats, MatrixStats,
    PsramSizeStats, ReleaseNameStats, UpgradeVsInstallationWeeklyStats, VersionStats,
    VersionWeeklyStats,
};
use repos::Repo;
use repos::device::DeviceRepo;
use repos::upgrade_event::UpgradeEventRepo;
use stats::led_range::bucketize;
use stats::merge::{counts_by_week, merge_upgrades_and_installations, merge_version_counts};
use stats::running::running_versions;
use stats::week::window_start;

pub struct StatsApi;

impl StatsApi {
    async fn grouped<K, T>(repo: &Repo, field: DeviceField) -> Result<Json<Vec<T>>, ApiError>
    where
        K: for<'r> sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres> + Send + Unpin + 'static,
        T: From<(K, i64)>,
    {
        let rows = DeviceRepo::count_grouped_by::<K>(&repo.pool, field).await?;
        debug!(%field, groups = rows.len(), "Grouped device counts");
        Ok(Json(rows.into_iter().map(T::from).collect()))
    }

    #[instrument(skip(state))]
    pub async fn country(State(state): State<AppState>) -> Result<Json<Vec<CountryStats>>, ApiError> {
        Self::grouped::<String, _>(&state.repo, DeviceField::CountryCode).await
    }

    #[instrument(skip(state))]
    pub async fn version(State(state): State<AppState>) -> Result<Json<Vec<VersionStats>>, ApiError> {
        Self::grouped::<String, _>(&state.repo, DeviceField::Version).await
    }

    #[instrument(skip(state))]
    pub async fn chip(State(state): State<AppState>) -> Result<Json<Vec<ChipStats>>, ApiError> {
        Self::grouped::<String, _>(&state.repo, DeviceField::Chip).await
    }

    #[instrument(skip(state))]
    pub async fn matrix(State(state): State<AppState>) -> Result<Json<Vec<MatrixStats>>, ApiError> {
        Self::grouped::<bool, _>(&state.repo, DeviceField::IsMatrix).await
    }

    #[instrument(skip(state))]
    pub async fn flash_size(
        State(state): State<AppState>,
    ) -> Result<Json<Vec<FlashSizeStats>>, ApiError> {
        Self::grouped::<String, _>(&state.repo, DeviceField::FlashSize).await
    }

    #[instrument(skip(state))]
    pub async fn psram_size(
        State(state): State<AppState>,
    ) -> Result<Json<Vec<PsramSizeStats>>, ApiError> {
        Self::grouped::<String, _>(&state.repo, DeviceField::PsramSize).await
    }

    #[instrument(skip(state))]
    pub async fn release_name(
        State(state): State<AppState>,
    ) -> Result<Json<Vec<ReleaseNameStats>>, ApiError> {
        Self::grouped::<String, _>(&state.repo, DeviceField::ReleaseName).await
    }

    #[instrument(skip(state))]
    pub async fn led_count(
        State(state): State<AppState>,
    ) -> Result<Json<Vec<LedCountRangeStats>>, ApiError> {
        let rows =
            DeviceRepo::count_grouped_by::<i32>(&state.repo.pool, DeviceField::LedCount).await?;
        Ok(Json(bucketize(&rows)))
    }

    #[instrument(skip(state))]
    pub async fn upgrade_vs_installation(
        State(state): State<AppState>,
    ) -> Result<Json<Vec<UpgradeVsInstallationWeeklyStats>>, ApiError> {
        let since = window_start(state.clock.now(), state.settings.stats.window_months);

        let upgrades = UpgradeEventRepo::count_by_week(&state.repo.pool, since).await?;
        let installations = DeviceRepo::count_new_by_week(&state.repo.pool, since).await?;

        Ok(Json(merge_upgrades_and_installations(
            &counts_by_week(&upgrades),
            &counts_by_week(&installations),
        )))
    }

    #[instrument(skip(state))]
    pub async fn version_over_time(
        State(state): State<AppState>,
    ) -> Result<Json<Vec<VersionWeeklyStats>>, ApiError> {
        let since = window_start(state.clock.now(), state.settings.stats.window_months);

        let upgrades = UpgradeEventRepo::count_by_week_and_version(&state.repo.pool, since).await?;
        let installations =
            DeviceRepo::count_new_by_week_and_version(&state.repo.pool, since).await?;

        Ok(Json(merge_version_counts(&upgrades, &installations)))
    }

    /// Devices and events are read inside one transaction so both come from
    /// the same snapshot.
    #[instrument(skip(state))]
    pub async fn running_versions(
        State(state): State<AppState>,
    ) -> Result<Json<Vec<VersionWeeklyStats>>, ApiError> {
        let now = state.clock.now();
        let since = window_start(now, state.settings.stats.window_months);

        let mut tx = state.repo.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(repos::error::handle_sql_error)?;
        let devices = DeviceRepo::get_all(&mut *tx).await?;
        let events = UpgradeEventRepo::get_all(&mut *tx).await?;
        state.repo.end(tx).await?;

        debug!(devices = devices.len(), events = events.len(), %since, "Resolving running versions");
        Ok(Json(running_versions(&devices, &events, since, now)))
    }
}
