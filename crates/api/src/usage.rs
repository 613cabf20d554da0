use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum_extra::extract::WithRejection;
use serde::Serialize;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::state::AppState;
use crate::utils::{country_code, sanitize_device_id};
use data::usage::UpgradeEventRequest;
use repos::device::DeviceRepo;
use repos::error::RepoError;
use repos::upgrade_event::UpgradeEventRepo;
use stats::install::reconcile;

#[derive(Debug, Serialize)]
pub struct UsageResponse {
    pub result: String,
}

pub struct UsageApi;

impl UsageApi {
    /// Records one upgrade report: creates the device on first contact,
    /// otherwise appends the version transition and refreshes the device.
    #[instrument(skip(state, headers, request), fields(device_id))]
    pub async fn upgrade(
        State(state): State<AppState>,
        headers: HeaderMap,
        WithRejection(Json(mut request), _): WithRejection<Json<UpgradeEventRequest>, ApiError>,
    ) -> Result<Json<UsageResponse>, ApiError> {
        request.device_id = sanitize_device_id(&request.device_id)?;
        tracing::Span::current().record("device_id", request.device_id.as_str());

        let now = state.clock.now();
        let country_code = country_code(&headers);
        let default_led_count = state.settings.stats.default_led_count;
        let mut tx = state.repo.begin().await?;

        let mut existing = DeviceRepo::get_by_id_for_update(&mut *tx, &request.device_id).await?;
        if existing.is_none() {
            let reconciliation = reconcile(None, &request, country_code.clone(), default_led_count);
            if DeviceRepo::create_if_absent(&mut *tx, reconciliation.device, now)
                .await?
                .is_some()
            {
                info!(version = %request.version, "Registered new device");
                state.repo.end(tx).await?;
                return Ok(Json(UsageResponse {
                    result: "ok".to_string(),
                }));
            }

            // A concurrent first report created the device meanwhile.
            existing = DeviceRepo::get_by_id_for_update(&mut *tx, &request.device_id).await?;
        }

        let Some(existing) = existing else {
            return Err(ApiError::RepoError(RepoError::NotFound()));
        };
        let reconciliation = reconcile(Some(&existing), &request, country_code, default_led_count);
        if let Some(event) = reconciliation.upgrade_event {
            info!(
                old_version = %event.old_version,
                new_version = %event.new_version,
                "Recorded upgrade event"
            );
            UpgradeEventRepo::create(&mut *tx, event, now).await?;
        }
        DeviceRepo::update(&mut *tx, reconciliation.device, now).await?;

        state.repo.end(tx).await?;

        Ok(Json(UsageResponse {
            result: "ok".to_string(),
        }))
    }
}
