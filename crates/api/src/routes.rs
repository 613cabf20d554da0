use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    crash::CrashApi, health, state::AppState, statistics::StatsApi, usage::UsageApi,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        // Ingestion
        .route("/usage/upgrade", post(UsageApi::upgrade))
        .route("/crash/report", post(CrashApi::report))
        .route("/crash/map", post(CrashApi::map))
        // Aggregated statistics
        .route("/stats/country", get(StatsApi::country))
        .route("/stats/version", get(StatsApi::version))
        .route("/stats/chip", get(StatsApi::chip))
        .route("/stats/matrix", get(StatsApi::matrix))
        .route("/stats/flash-size", get(StatsApi::flash_size))
        .route("/stats/psram-size", get(StatsApi::psram_size))
        .route("/stats/release-name", get(StatsApi::release_name))
        .route("/stats/led-count", get(StatsApi::led_count))
        .route("/stats/upgrade-vs-installation", get(StatsApi::upgrade_vs_installation))
        .route("/stats/version-over-time", get(StatsApi::version_over_time))
        .route("/stats/running-versions", get(StatsApi::running_versions))
        .route("/live", get(health::live))
        .route("/ready", get(health::ready))
}
