#![cfg(test)]

use chrono::NaiveDate;
use data::device::Device;
use data::usage::UpgradeEventRequest;

use stats::install::{DEFAULT_LED_COUNT, is_fresh_install, reconcile};

fn request(previous_version: Option<&str>, led_count: i32, is_matrix: bool) -> UpgradeEventRequest {
    UpgradeEventRequest {
        device_id: "test-device-123".to_string(),
        version: "1.0.0".to_string(),
        previous_version: previous_version.map(str::to_string),
        release_name: "stable".to_string(),
        chip: "ESP32".to_string(),
        led_count: Some(led_count),
        is_matrix: Some(is_matrix),
        bootloader_sha256: "abc123".to_string(),
        ..Default::default()
    }
}

fn stored_device() -> Device {
    let created = NaiveDate::from_ymd_opt(2025, 11, 3)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    Device {
        id: "test-device-123".to_string(),
        version: "0.9.0".to_string(),
        release_name: "beta".to_string(),
        chip: "ESP32".to_string(),
        led_count: Some(50),
        is_matrix: Some(false),
        country_code: Some("DE".to_string()),
        created_at: created,
        updated_at: created,
        ..Default::default()
    }
}

#[test]
fn test_fresh_install_with_empty_previous_version() {
    assert!(is_fresh_install(&request(Some(""), 30, false), DEFAULT_LED_COUNT));
    assert!(is_fresh_install(&request(None, 30, false), DEFAULT_LED_COUNT));
}

#[test]
fn test_fresh_install_with_blank_previous_version() {
    assert!(is_fresh_install(&request(Some("   "), 30, false), DEFAULT_LED_COUNT));
}

#[test]
fn test_fresh_install_when_previous_version_equals_version() {
    assert!(is_fresh_install(&request(Some("1.0.0"), 30, false), DEFAULT_LED_COUNT));
}

#[test]
fn test_not_fresh_install_with_different_previous_version() {
    assert!(!is_fresh_install(&request(Some("0.9.0"), 30, false), DEFAULT_LED_COUNT));
}

#[test]
fn test_not_fresh_install_with_non_default_led_count() {
    assert!(!is_fresh_install(&request(Some(""), 100, true), DEFAULT_LED_COUNT));
}

#[test]
fn test_not_fresh_install_without_led_count() {
    let mut request = request(None, 30, false);
    request.led_count = None;
    assert!(!is_fresh_install(&request, DEFAULT_LED_COUNT));
}

#[test]
fn test_reconcile_fresh_install_clears_hardware_defaults() {
    let result = reconcile(None, &request(Some(""), 30, false), None, DEFAULT_LED_COUNT);

    assert_eq!(result.device.led_count, None);
    assert_eq!(result.device.is_matrix, None);
}

#[test]
fn test_reconcile_upgrade_preserves_reported_hardware() {
    let result = reconcile(None, &request(Some("0.9.0"), 30, false), None, DEFAULT_LED_COUNT);

    assert_eq!(result.device.led_count, Some(30));
    assert_eq!(result.device.is_matrix, Some(false));
}

#[test]
fn test_reconcile_non_default_led_count_preserved() {
    let result = reconcile(None, &request(Some(""), 100, true), None, DEFAULT_LED_COUNT);

    assert_eq!(result.device.led_count, Some(100));
    assert_eq!(result.device.is_matrix, Some(true));
}

#[test]
fn test_reconcile_new_device_has_no_upgrade_event() {
    let result = reconcile(
        None,
        &request(Some("0.9.0"), 50, false),
        Some("US".to_string()),
        DEFAULT_LED_COUNT,
    );

    assert!(result.is_new_device());
    assert_eq!(result.upgrade_event, None);
    assert_eq!(result.device.id, "test-device-123");
    assert_eq!(result.device.version, "1.0.0");
    assert_eq!(result.device.country_code.as_deref(), Some("US"));
}

#[test]
fn test_reconcile_existing_device_records_transition() {
    let stored = stored_device();
    let result = reconcile(
        Some(&stored),
        &request(Some("0.9.0"), 50, false),
        Some("US".to_string()),
        DEFAULT_LED_COUNT,
    );

    let event = result.upgrade_event.clone().expect("expected an upgrade event");
    assert!(!result.is_new_device());
    assert_eq!(event.device_id, "test-device-123");
    assert_eq!(event.old_version, "0.9.0");
    assert_eq!(event.new_version, "1.0.0");
    assert_eq!(result.device.version, "1.0.0");
    assert_eq!(result.device.release_name, "stable");
    assert_eq!(result.device.country_code.as_deref(), Some("US"));
}

#[test]
fn test_reconcile_existing_device_check_in() {
    let mut stored = stored_device();
    stored.version = "1.0.0".to_string();

    let result = reconcile(Some(&stored), &request(Some("1.0.0"), 50, false), None, DEFAULT_LED_COUNT);

    let event = result.upgrade_event.expect("expected a check-in event");
    assert_eq!(event.old_version, event.new_version);
    assert_eq!(result.device.country_code, None);
}

#[test]
fn test_reconcile_keeps_psram_presence() {
    let mut with_psram = request(Some("0.9.0"), 50, false);
    with_psram.psram_present = Some(true);
    with_psram.psram_size = Some("2MB".to_string());

    let result = reconcile(None, &with_psram, None, DEFAULT_LED_COUNT);
    assert_eq!(result.device.psram_present, Some(true));
    assert_eq!(result.device.psram_size.as_deref(), Some("2MB"));

    let result = reconcile(None, &request(Some("0.9.0"), 50, false), None, DEFAULT_LED_COUNT);
    assert_eq!(result.device.psram_present, None);
}
