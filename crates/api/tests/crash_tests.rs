#![cfg(test)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::trace::TraceLayer;

use api::crash::stack_trace_hash;
use api::routes::routes;
use api::state::AppState;
use repos::Repo;
use repos::crash::CrashRepo;
use repos::map_file::MapFileRepo;
use stats::clock::FixedClock;
use testware::{at, at_time, create_settings, create_test_device};

const STACK_TRACE: &str = "Guru Meditation Error: Core 1 panic'ed (LoadProhibited)\nBacktrace: 0x400d1234:0x3ffb1f20 0x400d5678:0x3ffb1f40";

fn setup(pool: &PgPool) -> Router {
    let state = AppState {
        repo: Repo::new(pool.clone()),
        settings: create_settings(),
        clock: Arc::new(FixedClock(at_time(2026, 4, 15, 10, 0, 0))),
    };

    Router::new()
        .nest("/api", routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn post_json(
    app: Router,
    uri: &str,
    body: Value,
    country_code: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(country_code) = country_code {
        builder = builder.header("X-Country-Code", country_code);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_crash_report_ok(pool: PgPool) {
    create_test_device(&pool, "device-1", "0.15.0", at(2026, 1, 5)).await;

    let request = json!({
        "deviceId": "device-1",
        "version": "0.15.0",
        "chip": "ESP32",
        "stackTrace": STACK_TRACE,
        "exceptionCause": "LoadProhibited"
    });
    let (status, body) = post_json(setup(&pool), "/api/crash/report", request, Some("NL")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "ok");

    let report = CrashRepo::get_by_hash(&pool, &stack_trace_hash(STACK_TRACE))
        .await
        .expect("Failed to get crash report")
        .expect("Crash report not stored");
    assert_eq!(body["crashReportId"], report.id);
    assert_eq!(report.raw_stack_trace, STACK_TRACE);
    assert_eq!(report.decoded_stack_trace, None);
    assert_eq!(report.exception_cause, Some("LoadProhibited".to_string()));

    let instances = CrashRepo::get_instances(&pool, report.id)
        .await
        .expect("Failed to get crash instances");
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].device_id, Some("device-1".to_string()));
    assert_eq!(instances[0].country_code, Some("NL".to_string()));
    assert_eq!(instances[0].chip, Some("ESP32".to_string()));
    assert_eq!(instances[0].reported_at, at_time(2026, 4, 15, 10, 0, 0));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_same_trace_is_grouped(pool: PgPool) {
    let first = json!({ "version": "0.15.0", "stackTrace": STACK_TRACE });
    let second = json!({ "deviceId": "unknown-device", "version": "0.15.1", "stackTrace": STACK_TRACE });

    let (_, first) = post_json(setup(&pool), "/api/crash/report", first, None).await;
    let (status, second) = post_json(setup(&pool), "/api/crash/report", second, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["crashReportId"], second["crashReportId"]);

    let report_id = second["crashReportId"].as_i64().unwrap();
    let instances = CrashRepo::get_instances(&pool, report_id)
        .await
        .expect("Failed to get crash instances");
    assert_eq!(instances.len(), 2);
    assert!(instances.iter().all(|i| i.device_id.is_none()));
    assert_eq!(instances[1].version, "0.15.1");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_crash_report_requires_stack_trace(pool: PgPool) {
    let request = json!({ "version": "0.15.0", "stackTrace": "   " });
    let (status, body) = post_json(setup(&pool), "/api/crash/report", request, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "result": "failed", "error": "general failure : stack trace cannot be empty" })
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_map_upload_replaces_previous(pool: PgPool) {
    let first = json!({ "version": "0.15.0", "releaseName": "Kuuki", "chip": "ESP32", "content": "0x400d0000 setup" });
    let second = json!({ "version": "0.15.0", "chip": "ESP32", "content": "0x400d0000 loop" });

    let (status, body) = post_json(setup(&pool), "/api/crash/map", first, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "result": "ok" }));

    post_json(setup(&pool), "/api/crash/map", second, None).await;

    let stored = MapFileRepo::get_by_version(&pool, "0.15.0")
        .await
        .expect("Failed to get map file")
        .expect("Map file not stored");
    assert_eq!(stored.release_name, None);
    assert_eq!(stored.content, "0x400d0000 loop");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_map_upload_requires_version(pool: PgPool) {
    let request = json!({ "version": "", "content": "0x400d0000 setup" });
    let (status, body) = post_json(setup(&pool), "/api/crash/map", request, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["result"], "failed");
}
