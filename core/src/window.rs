//! Calendar windows used to select records for aggregation.
//!
//! All windows are closed intervals. Day and week end at "now" (so far);
//! the month window always ends at the last instant of the month.
//!
//! WEEK START: Sunday (day index 0), fixed here rather than taken from
//! whatever locale the host runs in.

use crate::types::Timestamp;
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A closed interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Interval {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: &Timestamp) -> bool {
        in_interval(date, self)
    }
}

/// The three per-user reporting windows for one reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Windows {
    pub day: Interval,
    pub week: Interval,
    pub month: Interval,
}

/// Compute the day / week / month windows around `now`.
pub fn windows(now: Timestamp) -> Windows {
    Windows {
        day: Interval::new(start_of_day(now), now),
        week: Interval::new(start_of_week(now), now),
        month: month_containing(now.date()),
    }
}

/// Inclusive on both ends, compared at full timestamp precision.
pub fn in_interval(date: &Timestamp, window: &Interval) -> bool {
    window.start <= *date && *date <= window.end
}

pub fn start_of_day(now: Timestamp) -> Timestamp {
    now.date().and_time(NaiveTime::MIN)
}

/// Midnight of the most recent Sunday on or before `now`.
pub fn start_of_week(now: Timestamp) -> Timestamp {
    let back = i64::from(now.weekday().num_days_from_sunday());
    start_of_day(now) - Duration::days(back)
}

/// `[first day 00:00, the instant before the next month begins]`.
pub fn month_containing(date: NaiveDate) -> Interval {
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);
    let end = first
        .checked_add_months(Months::new(1))
        .map(|next| next.and_time(NaiveTime::MIN) - Duration::nanoseconds(1))
        .unwrap_or(NaiveDateTime::MAX);
    Interval::new(first.and_time(NaiveTime::MIN), end)
}

/// The one month-membership primitive. Both the interval path and the
/// calendar-field path resolve through `month_containing`.
pub fn is_within_month(date: &Timestamp, year: i32, month: u32) -> bool {
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(first) => month_containing(first).contains(date),
        None => false,
    }
}

/// Calendar year and month of `date` equal those of `now`.
pub fn is_current_calendar_month(date: &Timestamp, now: Timestamp) -> bool {
    is_within_month(date, now.year(), now.month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Weekday};

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").unwrap()
    }

    #[test]
    fn day_window_runs_from_midnight_to_now() {
        let now = at("2026-10-21 14:30:00.0");
        let w = windows(now);

        assert_eq!(w.day.start, at("2026-10-21 00:00:00.0"));
        assert_eq!(w.day.end, now);
    }

    #[test]
    fn week_starts_on_sunday() {
        // 2026-10-21 is a Wednesday.
        let now = at("2026-10-21 14:30:00.0");
        let w = windows(now);

        assert_eq!(w.week.start, at("2026-10-18 00:00:00.0"));
        assert_eq!(w.week.start.weekday(), Weekday::Sun);
        assert_eq!(w.week.end, now);
    }

    #[test]
    fn week_on_a_sunday_starts_that_morning() {
        let now = at("2026-10-18 08:00:00.0");
        assert_eq!(start_of_week(now), at("2026-10-18 00:00:00.0"));
    }

    #[test]
    fn week_can_cross_a_month_boundary() {
        // Saturday 2026-08-01 -> Sunday 2026-07-26.
        let now = at("2026-08-01 10:00:00.0");
        assert_eq!(start_of_week(now), at("2026-07-26 00:00:00.0"));
    }

    #[test]
    fn month_window_has_a_fixed_end() {
        let now = at("2026-10-05 09:00:00.0");
        let w = windows(now);

        assert_eq!(w.month.start, at("2026-10-01 00:00:00.0"));
        assert_eq!(w.month.end.date(), NaiveDate::from_ymd_opt(2026, 10, 31).unwrap());
        assert_eq!(
            (w.month.end.hour(), w.month.end.minute(), w.month.end.second()),
            (23, 59, 59)
        );
        assert!(w.month.end > now);
        assert!(w.month.end.nanosecond() >= 999_000_000);
    }

    #[test]
    fn february_length_follows_leap_years() {
        let leap = month_containing(NaiveDate::from_ymd_opt(2028, 2, 10).unwrap());
        let plain = month_containing(NaiveDate::from_ymd_opt(2026, 2, 10).unwrap());

        assert_eq!(leap.end.date().day(), 29);
        assert_eq!(plain.end.date().day(), 28);
    }

    #[test]
    fn december_rolls_into_next_year() {
        let dec = month_containing(NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
        assert_eq!(dec.end.date(), NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
        assert!(!dec.contains(&at("2027-01-01 00:00:00.0")));
    }

    #[test]
    fn month_end_dates_resolve_to_their_own_month() {
        let jan = month_containing(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap());
        assert_eq!(jan.start, at("2026-01-01 00:00:00.0"));
        assert_eq!(jan.end, at("2026-01-31 23:59:59.999999999"));

        let leap_day = month_containing(NaiveDate::from_ymd_opt(2028, 2, 29).unwrap());
        assert_eq!(leap_day.start, at("2028-02-01 00:00:00.0"));
        assert_eq!(leap_day.end, at("2028-02-29 23:59:59.999999999"));
    }

    #[test]
    fn interval_is_inclusive_at_both_ends() {
        let w = Interval::new(at("2026-10-01 00:00:00.0"), at("2026-10-02 00:00:00.0"));

        assert!(in_interval(&at("2026-10-01 00:00:00.0"), &w));
        assert!(in_interval(&at("2026-10-02 00:00:00.0"), &w));
        assert!(!in_interval(&at("2026-10-02 00:00:00.001"), &w));
        assert!(!in_interval(&at("2026-09-30 23:59:59.999"), &w));
    }

    #[test]
    fn month_predicates_agree_at_the_edges() {
        let now = at("2026-10-15 12:00:00.0");
        let month = windows(now).month;
        let edges = [
            "2026-09-30 23:59:59.999999999",
            "2026-10-01 00:00:00.0",
            "2026-10-01 00:00:00.001",
            "2026-10-31 23:59:59.999",
            "2026-10-31 23:59:59.999999999",
            "2026-11-01 00:00:00.0",
        ];
        for edge in edges {
            let date = at(edge);
            assert_eq!(
                month.contains(&date),
                is_current_calendar_month(&date, now),
                "predicates disagree at {edge}"
            );
        }
    }

    #[test]
    fn invalid_month_matches_nothing() {
        assert!(!is_within_month(&at("2026-10-15 12:00:00.0"), 2026, 13));
    }
}
