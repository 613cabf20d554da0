use chrono::NaiveDateTime;
use data::device::Device;
use data::upgrade_event::UpgradeEvent;
use std::collections::HashMap;

/// Upgrade events of a single device in chronological order.
///
/// Events sharing a timestamp keep the order in which they were handed in, so
/// among ties the one supplied last counts as the most recent. The store
/// returns events ordered by `(created_at, id)`, which makes that the insertion
/// order.
#[derive(Debug, Default, Clone)]
pub struct DeviceTimeline<'a> {
    events: Vec<&'a UpgradeEvent>,
}

impl<'a> DeviceTimeline<'a> {
    pub fn new(events: impl IntoIterator<Item = &'a UpgradeEvent>) -> Self {
        let mut events: Vec<_> = events.into_iter().collect();
        // stable: ties stay in input order
        events.sort_by_key(|event| event.created_at);
        Self { events }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Version the device ran at `at`, counting events created at or before it.
    pub fn version_at<'s>(&'s self, current: &'s str, at: NaiveDateTime) -> &'s str {
        let split = self.events.partition_point(|event| event.created_at <= at);
        self.resolve(current, split)
    }

    /// Version the device ran just before `end`, counting only events created
    /// strictly earlier.
    pub fn version_before<'s>(&'s self, current: &'s str, end: NaiveDateTime) -> &'s str {
        let split = self.events.partition_point(|event| event.created_at < end);
        self.resolve(current, split)
    }

    fn resolve<'s>(&'s self, current: &'s str, split: usize) -> &'s str {
        if split > 0 {
            return &self.events[split - 1].new_version;
        }
        match self.events.first() {
            Some(earliest) => &earliest.old_version,
            None => current,
        }
    }
}

/// Per-device timelines built once from a full event list.
#[derive(Debug, Default)]
pub struct EventIndex<'a> {
    timelines: HashMap<&'a str, DeviceTimeline<'a>>,
}

impl<'a> EventIndex<'a> {
    pub fn new(events: &'a [UpgradeEvent]) -> Self {
        let mut grouped: HashMap<&'a str, Vec<&'a UpgradeEvent>> = HashMap::new();
        for event in events {
            grouped.entry(event.device_id.as_str()).or_default().push(event);
        }

        let timelines = grouped
            .into_iter()
            .map(|(device_id, events)| (device_id, DeviceTimeline::new(events)))
            .collect();

        Self { timelines }
    }

    pub fn timeline(&self, device_id: &str) -> Option<&DeviceTimeline<'a>> {
        self.timelines.get(device_id)
    }

    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }
}

/// Determines the firmware version `device` was running at `at`.
///
/// Only events belonging to `device` are considered. The newest event at or
/// before `at` gives its new version; failing that, the oldest later event
/// gives the version the device held before it; with no events at all the
/// stored version is used.
pub fn determine_version_at_time(
    device: &Device,
    events: &[UpgradeEvent],
    at: NaiveDateTime,
) -> String {
    let timeline = DeviceTimeline::new(events.iter().filter(|event| event.device_id == device.id));
    timeline.version_at(&device.version, at).to_string()
}
