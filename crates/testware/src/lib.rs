pub mod setup;

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use common::settings::Settings;
use sqlx::PgPool;

// Data models
use data::crash::{CrashReport, NewCrashReport};
use data::device::{Device, NewDevice};
use data::upgrade_event::{NewUpgradeEvent, UpgradeEvent};

// Repos
use repos::crash::CrashRepo;
use repos::device::DeviceRepo;
use repos::upgrade_event::UpgradeEventRepo;

/// Midnight UTC on the given day.
pub fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    at_time(year, month, day, 0, 0, 0)
}

pub fn at_time(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, min, sec))
        .expect("Invalid test timestamp")
}

/// A device as a typical ESP32 build reports it.
pub fn new_test_device(id: &str, version: &str) -> NewDevice {
    NewDevice {
        id: id.to_string(),
        version: version.to_string(),
        release_name: "Kuuki".to_string(),
        chip: "ESP32".to_string(),
        led_count: Some(120),
        is_matrix: Some(false),
        bootloader_sha256: "0f1e2d3c4b5a69788796a5b4c3d2e1f0".to_string(),
        brand: Some("WLED".to_string()),
        product: Some("FOSS".to_string()),
        flash_size: Some("4MB".to_string()),
        partition_sizes: Some("0x300000".to_string()),
        psram_size: Some("2MB".to_string()),
        psram_present: Some(true),
        country_code: Some("NL".to_string()),
        repo: Some("wled/WLED".to_string()),
    }
}

/// Insert a device first seen at `created_at`.
pub async fn create_test_device(
    pool: &PgPool,
    id: &str,
    version: &str,
    created_at: NaiveDateTime,
) -> Device {
    insert_test_device(pool, new_test_device(id, version), created_at).await
}

/// Insert an arbitrary device record first seen at `created_at`.
pub async fn insert_test_device(
    pool: &PgPool,
    device: NewDevice,
    created_at: NaiveDateTime,
) -> Device {
    let id = DeviceRepo::create(pool, device, created_at)
        .await
        .expect("Failed to insert test device");

    DeviceRepo::get_by_id(pool, &id)
        .await
        .expect("Failed to retrieve created device")
        .expect("Created device not found")
}

/// Record a version transition for an existing device at `created_at`.
pub async fn create_test_upgrade_event(
    pool: &PgPool,
    device_id: &str,
    old_version: &str,
    new_version: &str,
    created_at: NaiveDateTime,
) -> UpgradeEvent {
    let event = NewUpgradeEvent {
        device_id: device_id.to_string(),
        old_version: old_version.to_string(),
        new_version: new_version.to_string(),
    };

    let id = UpgradeEventRepo::create(pool, event, created_at)
        .await
        .expect("Failed to insert test upgrade event");

    UpgradeEventRepo::get_by_device(pool, device_id)
        .await
        .expect("Failed to retrieve upgrade events")
        .into_iter()
        .find(|event| event.id == id)
        .expect("Created upgrade event not found")
}

pub async fn create_test_crash_report(
    pool: &PgPool,
    stack_trace_hash: &str,
    raw_stack_trace: &str,
    first_seen: NaiveDateTime,
) -> CrashReport {
    let report = NewCrashReport {
        stack_trace_hash: stack_trace_hash.to_string(),
        raw_stack_trace: raw_stack_trace.to_string(),
        exception_cause: None,
    };

    CrashRepo::find_or_create(pool, report, first_seen)
        .await
        .expect("Failed to insert test crash report");

    CrashRepo::get_by_hash(pool, stack_trace_hash)
        .await
        .expect("Failed to retrieve created crash report")
        .expect("Created crash report not found")
}

pub fn create_settings() -> Arc<Settings> {
    Arc::new(Settings::default())
}
