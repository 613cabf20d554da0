use data::stats::{UpgradeVsInstallationWeeklyStats, VersionWeeklyStats, WeeklyCount, WeeklyVersionCount};
use itertools::{EitherOrBoth, Itertools};
use std::collections::{BTreeMap, HashMap};

use crate::week::week_key;

/// Folds weekly rows into a week-key map, summing duplicate weeks.
pub fn counts_by_week(rows: &[WeeklyCount]) -> HashMap<String, i64> {
    let mut counts = HashMap::new();
    for row in rows {
        *counts.entry(week_key(row.week_start)).or_insert(0) += row.count;
    }
    counts
}

/// Joins upgrade and new-install counts into one series ordered by week.
///
/// Every week present in either input appears once; the side without data
/// for that week reports zero.
pub fn merge_upgrades_and_installations(
    upgrades: &HashMap<String, i64>,
    installations: &HashMap<String, i64>,
) -> Vec<UpgradeVsInstallationWeeklyStats> {
    let upgrades = upgrades.iter().sorted_by(|a, b| a.0.cmp(b.0));
    let installations = installations.iter().sorted_by(|a, b| a.0.cmp(b.0));

    upgrades
        .merge_join_by(installations, |(a, _), (b, _)| a.cmp(b))
        .map(|pair| match pair {
            EitherOrBoth::Both((week, upgrades), (_, installations)) => {
                UpgradeVsInstallationWeeklyStats {
                    week: week.clone(),
                    upgrades: *upgrades,
                    new_installations: *installations,
                }
            }
            EitherOrBoth::Left((week, upgrades)) => UpgradeVsInstallationWeeklyStats {
                week: week.clone(),
                upgrades: *upgrades,
                new_installations: 0,
            },
            EitherOrBoth::Right((week, installations)) => UpgradeVsInstallationWeeklyStats {
                week: week.clone(),
                upgrades: 0,
                new_installations: *installations,
            },
        })
        .collect()
}

/// Adds up per-(week, version) counts from upgrade events and new installs.
///
/// Both sources describe devices confirmed to run a version in a given week,
/// so counts for the same pair are summed. Output is ordered by week, then
/// version.
pub fn merge_version_counts(
    upgrades: &[WeeklyVersionCount],
    installations: &[WeeklyVersionCount],
) -> Vec<VersionWeeklyStats> {
    let mut counts: BTreeMap<(String, &str), i64> = BTreeMap::new();
    for row in upgrades.iter().chain(installations) {
        *counts
            .entry((week_key(row.week_start), row.version.as_str()))
            .or_insert(0) += row.count;
    }

    counts
        .into_iter()
        .map(|((week, version), count)| VersionWeeklyStats {
            week,
            version: version.to_string(),
            count,
        })
        .collect()
}
