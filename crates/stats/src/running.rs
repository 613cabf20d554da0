use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use data::device::Device;
use data::stats::VersionWeeklyStats;
use data::upgrade_event::UpgradeEvent;
use std::collections::BTreeMap;
use tracing::debug;

use crate::resolver::{DeviceTimeline, EventIndex};
use crate::week::{week_key, week_starts};

/// Number of devices running each version, per week, from the week containing
/// `since` through the week containing `now`.
///
/// A device counts toward a week only if it was created before the week ended,
/// and it counts with the version it ran at the end of that week. Devices that
/// upgraded later are therefore still reported on their old version for the
/// earlier weeks. Rows are ordered by week, then version; pairs without
/// devices are omitted.
pub fn running_versions(
    devices: &[Device],
    events: &[UpgradeEvent],
    since: NaiveDateTime,
    now: NaiveDateTime,
) -> Vec<VersionWeeklyStats> {
    if devices.is_empty() {
        return Vec::new();
    }

    let index = EventIndex::new(events);
    let no_events = DeviceTimeline::default();
    let weeks = week_starts(since, now);

    let mut tally: BTreeMap<(NaiveDate, &str), i64> = BTreeMap::new();
    for week_start in &weeks {
        let week_end = *week_start + TimeDelta::weeks(1);
        for device in devices.iter().filter(|device| device.created_at < week_end) {
            let timeline = index.timeline(&device.id).unwrap_or(&no_events);
            let version = timeline.version_before(&device.version, week_end);
            *tally.entry((week_start.date(), version)).or_insert(0) += 1;
        }
    }

    debug!(
        devices = devices.len(),
        devices_with_events = index.len(),
        weeks = weeks.len(),
        rows = tally.len(),
        "Computed running versions"
    );

    tally
        .into_iter()
        .map(|((week, version), count)| VersionWeeklyStats {
            week: week_key(week),
            version: version.to_string(),
            count,
        })
        .collect()
}
