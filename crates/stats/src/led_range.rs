use std::collections::BTreeMap;

use data::stats::LedCountRangeStats;

const BASE_BOUNDARIES: [i64; 7] = [0, 10, 50, 100, 250, 500, 1000];

/// Step between boundaries past the fixed ladder, as `(below, step)` bands.
const STEP_BANDS: [(i64, i64); 3] = [(5000, 1000), (10000, 2500), (i64::MAX, 5000)];

fn step_after(boundary: i64) -> i64 {
    STEP_BANDS
        .iter()
        .find(|(below, _)| boundary < *below)
        .map_or(5000, |(_, step)| *step)
}

/// Range boundaries covering LED counts up to `max_led_count`.
///
/// Past the fixed ladder the step grows with the boundary: 1000 below 5000,
/// 2500 below 10000 and 5000 from there on.
pub fn boundaries(max_led_count: i64) -> Vec<i64> {
    let mut boundaries = BASE_BOUNDARIES.to_vec();
    let mut current = BASE_BOUNDARIES[BASE_BOUNDARIES.len() - 1];
    while current < max_led_count {
        current += step_after(current);
        boundaries.push(current);
    }
    boundaries
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct LedRange {
    start: i64,
    end: i64,
}

impl LedRange {
    /// The range of [`boundaries`] holding `led_count`, computed without
    /// walking the boundaries below it.
    fn containing(led_count: i64) -> Option<LedRange> {
        if led_count <= 0 {
            return None;
        }

        let mut lower = BASE_BOUNDARIES[BASE_BOUNDARIES.len() - 1];
        if led_count <= lower {
            let index = BASE_BOUNDARIES.partition_point(|boundary| *boundary < led_count);
            return Some(LedRange {
                start: BASE_BOUNDARIES[index - 1] + 1,
                end: BASE_BOUNDARIES[index],
            });
        }

        for (below, step) in STEP_BANDS {
            if led_count <= below {
                let end = lower + (led_count - lower + step - 1) / step * step;
                return Some(LedRange {
                    start: end - step + 1,
                    end,
                });
            }
            lower = below;
        }
        None
    }

    fn label(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }
}

/// Aggregates `(led_count, device_count)` pairs into LED-count ranges.
///
/// Only ranges holding at least one device are returned, smallest first. An
/// LED count of zero (or below) falls outside every range and is not
/// reported.
pub fn bucketize(pairs: &[(i32, i64)]) -> Vec<LedCountRangeStats> {
    let mut ranges: BTreeMap<LedRange, i64> = BTreeMap::new();
    for (led_count, device_count) in pairs {
        if let Some(range) = LedRange::containing(i64::from(*led_count)) {
            *ranges.entry(range).or_default() += device_count;
        }
    }

    ranges
        .into_iter()
        .filter(|(_, device_count)| *device_count > 0)
        .map(|(range, device_count)| LedCountRangeStats {
            range: range.label(),
            device_count,
        })
        .collect()
}
