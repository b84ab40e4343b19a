//! Same-day proximity grouping of likely duplicate reports.
//!
//! The grouping is a single greedy pass in input order. Each report not
//! yet claimed seeds a group, and every later unclaimed report within the
//! radius of *that seed* (strictly less than) and on the same calendar
//! day joins it. Membership is never tested against other members, so
//! proximity does not chain: with A-B and B-C inside the radius but A-C
//! outside it, C stays out of A's group. The result therefore depends on
//! input order, and the pass is O(n^2) over the day-scoped input.

use aquawatch_analytics_models::DuplicateGroup;
use aquawatch_geography_models::{distance_approx, meters_to_degrees};
use aquawatch_report_models::ReportSummary;
use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset as _, TimeDelta, Utc,
};

use crate::AnalyticsError;

/// Physical radius within which two same-day reports are considered
/// duplicates.
pub const DUPLICATE_RADIUS_METERS: f64 = 200.0;

/// Tunables for [`find_duplicate_groups`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuplicateOptions {
    radius_meters: f64,
    offset: FixedOffset,
}

impl DuplicateOptions {
    /// Creates options with a radius in meters and the deployment's
    /// reference timezone as minutes east of UTC.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError`] if the radius is not a positive finite
    /// number or the offset is not within +/- 24 hours.
    pub fn new(radius_meters: f64, utc_offset_minutes: i32) -> Result<Self, AnalyticsError> {
        if !radius_meters.is_finite() || radius_meters <= 0.0 {
            return Err(AnalyticsError::InvalidRadius(radius_meters));
        }
        let offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(AnalyticsError::InvalidUtcOffset(utc_offset_minutes))?;

        Ok(Self {
            radius_meters,
            offset,
        })
    }

    /// Grouping radius in meters.
    #[must_use]
    pub const fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    /// Reference timezone used to decide calendar days.
    #[must_use]
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    fn local_day(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }
}

impl Default for DuplicateOptions {
    /// 200 m in UTC.
    fn default() -> Self {
        Self {
            radius_meters: DUPLICATE_RADIUS_METERS,
            offset: Utc.fix(),
        }
    }
}

/// The instants of one calendar day `[day 00:00, day+1 00:00)` in a
/// reference timezone.
///
/// Bounds are stored inclusively and saturate at the ends of the
/// representable `DateTime<Utc>` range, so every `NaiveDate` has a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    /// First instant of the day.
    pub start: DateTime<Utc>,
    /// Last instant of the day, one nanosecond before the next midnight.
    pub last: DateTime<Utc>,
}

impl DayWindow {
    /// The window covering `day` in `offset`.
    #[must_use]
    pub fn new(day: NaiveDate, offset: FixedOffset) -> Self {
        let to_utc = -TimeDelta::seconds(i64::from(offset.local_minus_utc()));
        let (last_time, _) = NaiveTime::MIN.overflowing_sub_signed(TimeDelta::nanoseconds(1));
        Self {
            start: saturating_shift(day.and_time(NaiveTime::MIN), to_utc),
            last: saturating_shift(day.and_time(last_time), to_utc),
        }
    }

    /// Whether `at` falls inside the window.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.last
    }
}

fn saturating_shift(local: NaiveDateTime, by: TimeDelta) -> DateTime<Utc> {
    local.checked_add_signed(by).map_or_else(
        || {
            if by < TimeDelta::zero() {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            }
        },
        |shifted| shifted.and_utc(),
    )
}

/// Proposes groups of likely duplicate reports.
///
/// When `day` is given, only reports created inside that calendar day are
/// considered. Either way, a candidate must fall on the same calendar day
/// as its seed (in the reference timezone of `options`) to join its group.
/// Only groups with two or more members are returned, in seed order.
#[must_use]
#[allow(clippy::needless_range_loop)]
pub fn find_duplicate_groups(
    reports: &[ReportSummary],
    day: Option<NaiveDate>,
    options: &DuplicateOptions,
) -> Vec<DuplicateGroup> {
    let scoped: Vec<&ReportSummary> = match day {
        Some(day) => {
            let window = DayWindow::new(day, options.offset());
            reports
                .iter()
                .filter(|report| window.contains(report.created_at))
                .collect()
        }
        None => reports.iter().collect(),
    };

    let days: Vec<NaiveDate> = scoped
        .iter()
        .map(|report| options.local_day(report.created_at))
        .collect();
    let radius = meters_to_degrees(options.radius_meters());

    let mut claimed = vec![false; scoped.len()];
    let mut groups = Vec::new();

    for i in 0..scoped.len() {
        if claimed[i] {
            continue;
        }
        claimed[i] = true;

        let seed = scoped[i];
        let mut members = vec![seed.id.clone()];

        for j in (i + 1)..scoped.len() {
            if claimed[j] || days[j] != days[i] {
                continue;
            }
            if distance_approx(&seed.location, &scoped[j].location) < radius {
                claimed[j] = true;
                members.push(scoped[j].id.clone());
            }
        }

        if members.len() >= 2 {
            groups.push(DuplicateGroup(members));
        }
    }

    log::debug!(
        "Found {} duplicate groups among {} reports (day filter: {day:?})",
        groups.len(),
        scoped.len()
    );

    groups
}

#[cfg(test)]
mod tests {
    use aquawatch_geography_models::GeoPoint;
    use aquawatch_report_models::{ReportId, ReportStatus};
    use chrono::TimeZone as _;

    use super::*;

    fn report(id: &str, lng: f64, lat: f64, at: DateTime<Utc>) -> ReportSummary {
        ReportSummary {
            id: ReportId::new(id),
            location: GeoPoint::new(lng, lat),
            created_at: at,
            status: ReportStatus::Pending,
            notes: String::new(),
        }
    }

    fn morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap()
    }

    fn ids(group: &DuplicateGroup) -> Vec<&str> {
        group.ids().iter().map(ReportId::as_str).collect()
    }

    #[test]
    fn exactly_radius_apart_is_not_grouped() {
        let r = meters_to_degrees(200.0);
        let reports = vec![
            report("a", 0.0, 0.0, morning()),
            report("b", r, 0.0, morning()),
        ];
        let groups = find_duplicate_groups(&reports, None, &DuplicateOptions::default());
        assert!(groups.is_empty());
    }

    #[test]
    fn just_inside_radius_is_grouped() {
        let reports = vec![
            report("a", 36.8, -1.3, morning()),
            report("b", 36.8 + meters_to_degrees(199.9), -1.3, morning()),
        ];
        let groups = find_duplicate_groups(&reports, None, &DuplicateOptions::default());
        assert_eq!(groups.len(), 1);
        assert_eq!(ids(&groups[0]), vec!["a", "b"]);
    }

    #[test]
    fn compares_against_seed_only() {
        let step = meters_to_degrees(150.0);
        let reports = vec![
            report("A", 36.8, -1.3, morning()),
            report("B", 36.8, -1.3 + step, morning()),
            report("C", 36.8, -1.3 + 2.0 * step, morning()),
        ];
        let groups = find_duplicate_groups(&reports, None, &DuplicateOptions::default());
        assert_eq!(groups.len(), 1);
        assert_eq!(ids(&groups[0]), vec!["A", "B"]);
        assert_eq!(groups[0].seed().map(ReportId::as_str), Some("A"));
    }

    #[test]
    fn grouping_depends_on_input_order() {
        let step = meters_to_degrees(150.0);
        let reports = vec![
            report("B", 36.8, -1.3 + step, morning()),
            report("A", 36.8, -1.3, morning()),
            report("C", 36.8, -1.3 + 2.0 * step, morning()),
        ];
        let groups = find_duplicate_groups(&reports, None, &DuplicateOptions::default());
        assert_eq!(groups.len(), 1);
        assert_eq!(ids(&groups[0]), vec!["B", "A", "C"]);
    }

    #[test]
    fn seed_absorbs_everything_within_radius() {
        let near = meters_to_degrees(50.0);
        let reports = vec![
            report("a", 36.8, -1.3, morning()),
            report("b", 36.8 + near, -1.3, morning()),
            report("c", 36.8 + 2.0 * near, -1.3, morning()),
            report("far", 37.5, -1.0, morning()),
        ];
        let groups = find_duplicate_groups(&reports, None, &DuplicateOptions::default());
        assert_eq!(groups.len(), 1);
        assert_eq!(ids(&groups[0]), vec!["a", "b", "c"]);
    }

    #[test]
    fn different_days_never_group() {
        let next_day = morning() + TimeDelta::days(1);
        let reports = vec![
            report("a", 36.8, -1.3, morning()),
            report("b", 36.8, -1.3, next_day),
        ];
        let groups = find_duplicate_groups(&reports, None, &DuplicateOptions::default());
        assert!(groups.is_empty());
    }

    #[test]
    fn day_filter_scopes_input() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let reports = vec![
            report("a", 36.8, -1.3, morning()),
            report("b", 36.8, -1.3, morning() + TimeDelta::hours(3)),
            report("other", 36.8, -1.3, morning() + TimeDelta::days(1)),
            report("other2", 36.8, -1.3, morning() + TimeDelta::days(1)),
        ];
        let groups = find_duplicate_groups(&reports, Some(day), &DuplicateOptions::default());
        assert_eq!(groups.len(), 1);
        assert_eq!(ids(&groups[0]), vec!["a", "b"]);

        let unfiltered = find_duplicate_groups(&reports, None, &DuplicateOptions::default());
        assert_eq!(unfiltered.len(), 2);
        assert_eq!(ids(&unfiltered[1]), vec!["other", "other2"]);
    }

    #[test]
    fn day_boundaries_follow_reference_timezone() {
        // 22:30 and 23:30 UTC on the 10th. In UTC+3 they fall on the 11th.
        let late = Utc.with_ymd_and_hms(2024, 3, 10, 22, 30, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 3, 10, 23, 30, 0).unwrap();
        let reports = vec![
            report("a", 36.8, -1.3, late),
            report("b", 36.8, -1.3, later),
        ];

        let nairobi = DuplicateOptions::new(200.0, 180).unwrap();
        let tenth = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let eleventh = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();

        assert!(find_duplicate_groups(&reports, Some(tenth), &nairobi).is_empty());
        assert_eq!(
            find_duplicate_groups(&reports, Some(eleventh), &nairobi).len(),
            1
        );
        assert_eq!(
            find_duplicate_groups(&reports, Some(tenth), &DuplicateOptions::default()).len(),
            1
        );
    }

    #[test]
    fn day_window_is_half_open() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let window = DayWindow::new(day, FixedOffset::east_opt(0).unwrap());
        assert!(window.contains(Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap()));
        assert!(window.contains(Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 59).unwrap()));
        assert!(!window.contains(Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap()));
        assert_eq!(
            window.last + TimeDelta::nanoseconds(1),
            Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap()
        );

        let west = DayWindow::new(day, FixedOffset::west_opt(5 * 3600).unwrap());
        assert_eq!(
            west.start,
            Utc.with_ymd_and_hms(2024, 3, 10, 5, 0, 0).unwrap()
        );
    }

    #[test]
    fn day_window_saturates_at_calendar_limits() {
        let last_day = DayWindow::new(NaiveDate::MAX, FixedOffset::east_opt(0).unwrap());
        assert_eq!(last_day.last, DateTime::<Utc>::MAX_UTC);
        assert!(last_day.contains(DateTime::<Utc>::MAX_UTC));

        let first_day =
            DayWindow::new(NaiveDate::MIN, FixedOffset::east_opt(180 * 60).unwrap());
        assert_eq!(first_day.start, DateTime::<Utc>::MIN_UTC);
        assert!(first_day.contains(DateTime::<Utc>::MIN_UTC));

        let nairobi = DuplicateOptions::new(200.0, 180).unwrap();
        assert!(
            find_duplicate_groups(&[], Some(NaiveDate::MAX), &DuplicateOptions::default())
                .is_empty()
        );
        assert!(find_duplicate_groups(&[], Some(NaiveDate::MIN), &nairobi).is_empty());

        let reports = vec![
            report("a", 36.8, -1.3, DateTime::<Utc>::MAX_UTC),
            report("b", 36.8, -1.3, DateTime::<Utc>::MAX_UTC),
        ];
        let groups =
            find_duplicate_groups(&reports, Some(NaiveDate::MAX), &DuplicateOptions::default());
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn custom_radius() {
        let reports = vec![
            report("a", 36.8, -1.3, morning()),
            report("b", 36.8 + meters_to_degrees(400.0), -1.3, morning()),
        ];
        let wide = DuplicateOptions::new(500.0, 0).unwrap();
        assert_eq!(find_duplicate_groups(&reports, None, &wide).len(), 1);
        assert!(find_duplicate_groups(&reports, None, &DuplicateOptions::default()).is_empty());
    }

    #[test]
    fn rejects_bad_options() {
        assert_eq!(
            DuplicateOptions::new(0.0, 0),
            Err(AnalyticsError::InvalidRadius(0.0))
        );
        assert!(DuplicateOptions::new(f64::NAN, 0).is_err());
        assert_eq!(
            DuplicateOptions::new(200.0, 24 * 60),
            Err(AnalyticsError::InvalidUtcOffset(24 * 60))
        );
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(find_duplicate_groups(&[], None, &DuplicateOptions::default()).is_empty());
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert!(find_duplicate_groups(&[], Some(day), &DuplicateOptions::default()).is_empty());
    }
}
