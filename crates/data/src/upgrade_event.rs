use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[cfg_attr(feature = "ssr", derive(sqlx::FromRow))]
pub struct UpgradeEvent {
    pub id: i64,
    pub device_id: String,
    pub old_version: String,
    pub new_version: String,
    pub created_at: NaiveDateTime,
}

impl UpgradeEvent {
    /// A report where the device is still alive but did not change version.
    pub fn is_check_in(&self) -> bool {
        self.old_version == self.new_version
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[cfg_attr(feature = "ssr", derive(sqlx::FromRow))]
pub struct NewUpgradeEvent {
    pub device_id: String,
    pub old_version: String,
    pub new_version: String,
}
