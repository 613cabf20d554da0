use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

/// Midnight of the Monday on or before `instant`.
pub fn floor_to_monday(instant: NaiveDateTime) -> NaiveDateTime {
    let date = instant.date();
    let offset = i64::from(date.weekday().num_days_from_monday());
    (date - TimeDelta::days(offset)).and_time(NaiveTime::MIN)
}

/// Week starts from the week containing `since` up to and including the week
/// containing `now`, seven days apart.
///
/// Returns an empty sequence when `since` lies in a later week than `now`.
pub fn week_starts(since: NaiveDateTime, now: NaiveDateTime) -> Vec<NaiveDateTime> {
    let mut starts = Vec::new();
    let mut current = floor_to_monday(since);
    while current <= now {
        starts.push(current);
        current += TimeDelta::weeks(1);
    }
    starts
}

/// Start of the trailing window of `months` months that ends at `now`.
///
/// A window reaching past the representable calendar collapses to `now`.
pub fn window_start(now: NaiveDateTime, months: u32) -> NaiveDateTime {
    now.checked_sub_months(Months::new(months)).unwrap_or(now)
}

/// `YYYY-MM-DD`, the key used for weeks in every emitted series.
pub fn week_key(week_start: NaiveDate) -> String {
    week_start.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_floor_to_monday_mid_week() {
        // 2026-01-08 is a Thursday
        assert_eq!(floor_to_monday(at(2026, 1, 8, 15, 30)), at(2026, 1, 5, 0, 0));
    }

    #[test]
    fn test_floor_to_monday_sunday_goes_back_six_days() {
        assert_eq!(floor_to_monday(at(2026, 1, 11, 23, 59)), at(2026, 1, 5, 0, 0));
    }

    #[test]
    fn test_floor_to_monday_is_identity_on_monday_midnight() {
        assert_eq!(floor_to_monday(at(2026, 1, 5, 0, 0)), at(2026, 1, 5, 0, 0));
    }

    #[test]
    fn test_week_key_format() {
        assert_eq!(week_key(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()), "2026-01-05");
    }

    #[test]
    fn test_window_start_three_months() {
        assert_eq!(window_start(at(2026, 4, 15, 12, 0), 3), at(2026, 1, 15, 12, 0));
    }
}
