use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A unique crash, identified by the SHA-256 of its raw stack trace.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[cfg_attr(feature = "ssr", derive(sqlx::FromRow))]
pub struct CrashReport {
    pub id: i64,
    pub stack_trace_hash: String,
    pub raw_stack_trace: String,
    pub decoded_stack_trace: Option<String>,
    pub exception_cause: Option<String>,
    pub first_seen: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct NewCrashReport {
    pub stack_trace_hash: String,
    pub raw_stack_trace: String,
    pub exception_cause: Option<String>,
}

/// One occurrence of a crash on a device.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[cfg_attr(feature = "ssr", derive(sqlx::FromRow))]
pub struct CrashInstance {
    pub id: i64,
    pub crash_report_id: i64,
    pub device_id: Option<String>,
    pub version: String,
    pub chip: Option<String>,
    pub country_code: Option<String>,
    pub reported_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct NewCrashInstance {
    pub crash_report_id: i64,
    pub device_id: Option<String>,
    pub version: String,
    pub chip: Option<String>,
    pub country_code: Option<String>,
}

/// Linker map for one firmware version, used to symbolize crash addresses.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[cfg_attr(feature = "ssr", derive(sqlx::FromRow))]
pub struct MapFile {
    pub id: i64,
    pub version: String,
    pub release_name: Option<String>,
    pub chip: Option<String>,
    pub content: String,
    pub uploaded_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewMapFile {
    pub version: String,
    #[serde(default)]
    pub release_name: Option<String>,
    #[serde(default)]
    pub chip: Option<String>,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CrashReportRequest {
    #[serde(default)]
    pub device_id: Option<String>,
    pub version: String,
    #[serde(default)]
    pub chip: Option<String>,
    pub stack_trace: String,
    #[serde(default)]
    pub exception_cause: Option<String>,
}
