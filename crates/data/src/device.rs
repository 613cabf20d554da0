use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One physical unit, keyed by the identifier the firmware reports.
///
/// Everything except `id` and `created_at` reflects the most recent report.
/// `led_count` and `is_matrix` are `None` when the last report carried
/// firmware defaults rather than real hardware data.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[cfg_attr(feature = "ssr", derive(sqlx::FromRow))]
pub struct Device {
    pub id: String,
    pub version: String,
    pub release_name: String,
    pub chip: String,
    pub led_count: Option<i32>,
    pub is_matrix: Option<bool>,
    pub bootloader_sha256: String,
    pub brand: Option<String>,
    pub product: Option<String>,
    pub flash_size: Option<String>,
    pub partition_sizes: Option<String>,
    pub psram_size: Option<String>,
    pub psram_present: Option<bool>,
    pub country_code: Option<String>,
    pub repo: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Device state as written on insert or update. Timestamps are assigned by
/// the store.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[cfg_attr(feature = "ssr", derive(sqlx::FromRow))]
pub struct NewDevice {
    pub id: String,
    pub version: String,
    pub release_name: String,
    pub chip: String,
    pub led_count: Option<i32>,
    pub is_matrix: Option<bool>,
    pub bootloader_sha256: String,
    pub brand: Option<String>,
    pub product: Option<String>,
    pub flash_size: Option<String>,
    pub partition_sizes: Option<String>,
    pub psram_size: Option<String>,
    pub psram_present: Option<bool>,
    pub country_code: Option<String>,
    pub repo: Option<String>,
}

impl From<Device> for NewDevice {
    fn from(device: Device) -> Self {
        Self {
            id: device.id,
            version: device.version,
            release_name: device.release_name,
            chip: device.chip,
            led_count: device.led_count,
            is_matrix: device.is_matrix,
            bootloader_sha256: device.bootloader_sha256,
            brand: device.brand,
            product: device.product,
            flash_size: device.flash_size,
            partition_sizes: device.partition_sizes,
            psram_size: device.psram_size,
            psram_present: device.psram_present,
            country_code: device.country_code,
            repo: device.repo,
        }
    }
}
