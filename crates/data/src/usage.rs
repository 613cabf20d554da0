use serde::{Deserialize, Serialize};

/// Body of an upgrade report as sent by the firmware.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeEventRequest {
    pub device_id: String,
    pub version: String,
    #[serde(default)]
    pub previous_version: Option<String>,
    #[serde(default)]
    pub release_name: String,
    #[serde(default)]
    pub chip: String,
    #[serde(default)]
    pub led_count: Option<i32>,
    #[serde(default)]
    pub is_matrix: Option<bool>,
    #[serde(default, rename = "bootloaderSHA256")]
    pub bootloader_sha256: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub flash_size: Option<String>,
    #[serde(default)]
    pub partition_sizes: Option<String>,
    #[serde(default)]
    pub psram_size: Option<String>,
    #[serde(default)]
    pub psram_present: Option<bool>,
    #[serde(default)]
    pub repo: Option<String>,
}
