use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Device attributes that support a plain grouped count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum DeviceField {
    #[strum(serialize = "country_code")]
    CountryCode,
    #[strum(serialize = "version")]
    Version,
    #[strum(serialize = "chip")]
    Chip,
    #[strum(serialize = "is_matrix")]
    IsMatrix,
    #[strum(serialize = "flash_size")]
    FlashSize,
    #[strum(serialize = "psram_size")]
    PsramSize,
    #[strum(serialize = "release_name")]
    ReleaseName,
    #[strum(serialize = "led_count")]
    LedCount,
}

/// Count of events or devices that fall in one Monday-aligned week.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[cfg_attr(feature = "ssr", derive(sqlx::FromRow))]
pub struct WeeklyCount {
    pub week_start: NaiveDate,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[cfg_attr(feature = "ssr", derive(sqlx::FromRow))]
pub struct WeeklyVersionCount {
    pub week_start: NaiveDate,
    pub version: String,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CountryStats {
    pub country_code: String,
    pub device_count: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VersionStats {
    pub version: String,
    pub device_count: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChipStats {
    pub chip: String,
    pub device_count: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MatrixStats {
    pub is_matrix: bool,
    pub device_count: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FlashSizeStats {
    pub flash_size: String,
    pub device_count: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PsramSizeStats {
    pub psram_size: String,
    pub device_count: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseNameStats {
    pub release_name: String,
    pub device_count: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LedCountRangeStats {
    pub range: String,
    pub device_count: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeVsInstallationWeeklyStats {
    pub week: String,
    pub upgrades: i64,
    pub new_installations: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VersionWeeklyStats {
    pub week: String,
    pub version: String,
    pub count: i64,
}

macro_rules! grouped_count {
    ($stats:ident, $field:ident, $key:ty) => {
        impl From<($key, i64)> for $stats {
            fn from((key, device_count): ($key, i64)) -> Self {
                Self {
                    $field: key,
                    device_count,
                }
            }
        }
    };
}

grouped_count!(CountryStats, country_code, String);
grouped_count!(VersionStats, version, String);
grouped_count!(ChipStats, chip, String);
grouped_count!(MatrixStats, is_matrix, bool);
grouped_count!(FlashSizeStats, flash_size, String);
grouped_count!(PsramSizeStats, psram_size, String);
grouped_count!(ReleaseNameStats, release_name, String);
