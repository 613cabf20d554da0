use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum_extra::extract::WithRejection;
use data_encoding::HEXLOWER;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::state::AppState;
use crate::utils::{country_code, sanitize_device_id};
use data::crash::{CrashReportRequest, NewCrashInstance, NewCrashReport, NewMapFile};
use repos::crash::CrashRepo;
use repos::device::DeviceRepo;
use repos::map_file::MapFileRepo;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrashResponse {
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crash_report_id: Option<i64>,
}

/// Identity of a crash: SHA-256 of the raw stack trace as lower-case hex.
pub fn stack_trace_hash(stack_trace: &str) -> String {
    HEXLOWER.encode(&Sha256::digest(stack_trace.as_bytes()))
}

pub struct CrashApi;

impl CrashApi {
    #[instrument(skip(state, headers, request), fields(stack_trace_hash))]
    pub async fn report(
        State(state): State<AppState>,
        headers: HeaderMap,
        WithRejection(Json(request), _): WithRejection<Json<CrashReportRequest>, ApiError>,
    ) -> Result<Json<CrashResponse>, ApiError> {
        if request.stack_trace.trim().is_empty() {
            return Err(ApiError::Failure("stack trace cannot be empty".to_string()));
        }
        if request.version.trim().is_empty() {
            return Err(ApiError::Failure("version cannot be empty".to_string()));
        }

        let hash = stack_trace_hash(&request.stack_trace);
        tracing::Span::current().record("stack_trace_hash", hash.as_str());

        let now = state.clock.now();
        let mut tx = state.repo.begin().await?;

        let report = NewCrashReport {
            stack_trace_hash: hash,
            raw_stack_trace: request.stack_trace,
            exception_cause: request.exception_cause,
        };
        let crash_report_id = CrashRepo::find_or_create(&mut *tx, report, now).await?;

        // Only link devices we know about; unknown or unusable ids are dropped.
        let device_id = match request.device_id.as_deref().map(sanitize_device_id) {
            Some(Ok(id)) => DeviceRepo::get_by_id(&mut *tx, &id).await?.map(|device| device.id),
            _ => None,
        };

        let instance = NewCrashInstance {
            crash_report_id,
            device_id,
            version: request.version,
            chip: request.chip,
            country_code: country_code(&headers),
        };
        CrashRepo::create_instance(&mut *tx, instance, now).await?;

        state.repo.end(tx).await?;
        info!(crash_report_id, "Recorded crash report");

        Ok(Json(CrashResponse {
            result: "ok".to_string(),
            crash_report_id: Some(crash_report_id),
        }))
    }

    #[instrument(skip(state, request))]
    pub async fn map(
        State(state): State<AppState>,
        WithRejection(Json(request), _): WithRejection<Json<NewMapFile>, ApiError>,
    ) -> Result<Json<CrashResponse>, ApiError> {
        if request.version.trim().is_empty() {
            return Err(ApiError::Failure("version cannot be empty".to_string()));
        }

        let version = request.version.clone();
        MapFileRepo::upsert(&state.repo.pool, request, state.clock.now()).await?;
        info!(version = %version, "Stored map file");

        Ok(Json(CrashResponse {
            result: "ok".to_string(),
            crash_report_id: None,
        }))
    }
}
