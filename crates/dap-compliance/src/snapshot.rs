//! `DutySnapshot` — the per-duty summary the AZG rules evaluate (spec §4.5:
//! "builds per-duty snapshots").

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use dap_activity::{Activity, Duty};
use dap_core::{Owner, ServiceId};

/// One regular or short break placed within a duty, for break-rule
/// evaluation (`AZG_BREAK_*`).
#[derive(Clone, Copy, Debug)]
pub struct BreakInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub is_regular: bool,
}

impl BreakInterval {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes().max(0)
    }
}

/// A per-duty summary carrying everything the AZG rolling-window rules need,
/// without re-reading the duty's full activity list each time (spec §4.5).
#[derive(Clone, Debug)]
pub struct DutySnapshot {
    pub service_id: ServiceId,
    pub owner: Owner,
    pub day: NaiveDate,

    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,

    /// `dutySpanMinutes` (spec §4.5).
    pub duty_span_minutes: i64,
    /// `workMinutes = dutySpan − mergedBreakTime` (spec §4.5).
    pub work_minutes: i64,
    /// `true` if any work segment intersects `[00:00, 04:00)` UTC (spec
    /// §4.5).
    pub has_night_work: bool,

    pub breaks: Vec<BreakInterval>,
    pub is_absence: bool,
}

impl DutySnapshot {
    pub fn regular_break_count(&self) -> usize {
        self.breaks.iter().filter(|b| b.is_regular).count()
    }

    pub fn longest_regular_break_minutes(&self) -> i64 {
        self.breaks
            .iter()
            .filter(|b| b.is_regular)
            .map(BreakInterval::duration_minutes)
            .max()
            .unwrap_or(0)
    }

    /// The break whose midpoint is closest to the duty's work midpoint
    /// (spec §4.5: `AZG_BREAK_MIDPOINT` — "nearest qualifying break").
    pub fn break_nearest_midpoint(&self) -> Option<&BreakInterval> {
        let midpoint = self.start + (self.end - self.start) / 2;
        self.breaks
            .iter()
            .filter(|b| b.is_regular)
            .min_by_key(|b| (b.start + (b.end - b.start) / 2 - midpoint).num_minutes().abs())
    }
}

/// `true` if `[start, end)` intersects `[00:00, 04:00)` UTC on any calendar
/// day it spans (spec §4.5: "`hasNightWork` = any work segment intersects
/// [00:00, 04:00) UTC").
fn intersects_night_window(start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    interval_intersects_hour_window(start, end, 0, 4)
}

/// `true` if interval `[start, end)` overlaps the daily window
/// `[start_hour, end_hour)` UTC on any calendar day it spans, wrapping across
/// midnight when `start_hour > end_hour` (spec §4.5:
/// `AZG_BREAK_FORBIDDEN_NIGHT` — "break interval overlaps the forbidden daily
/// window"). Generalizes [`intersects_night_window`]'s fixed `[0, 4)` window.
pub fn interval_intersects_hour_window(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    start_hour: u32,
    end_hour: u32,
) -> bool {
    if end <= start {
        return false;
    }
    let mut day = start.date_naive() - Duration::days(1);
    let last_day = end.date_naive();
    while day <= last_day {
        let day_start = Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN));
        if start_hour <= end_hour {
            let window_start = day_start + Duration::hours(start_hour as i64);
            let window_end = day_start + Duration::hours(end_hour as i64);
            if start < window_end && window_start < end {
                return true;
            }
        } else {
            // Wraps past midnight: `[start_hour, 24)` on `day`, `[0, end_hour)` on `day + 1`.
            let window_start = day_start + Duration::hours(start_hour as i64);
            let window_end = day_start + Duration::days(1);
            if start < window_end && window_start < end {
                return true;
            }
            let wrapped_start = day_start + Duration::days(1);
            let wrapped_end = wrapped_start + Duration::hours(end_hour as i64);
            if start < wrapped_end && wrapped_start < end {
                return true;
            }
        }
        day += Duration::days(1);
    }
    false
}

/// Build the [`DutySnapshot`] for `duty` from its current activities (spec
/// §4.5). `duty_span` is `[first activity start, last activity end)` across
/// every activity the duty owns — boundaries included, since a duty with
/// synthesized `svcstart`/`svcend` markers has those as its true span ends.
///
/// Returns `None` for a duty with no activities (can't happen for a duty the
/// grouper produced, but callers need not panic on a pathological input).
pub fn build_duty_snapshot(duty: &Duty, activities: &BTreeMap<String, Activity>) -> Option<DutySnapshot> {
    let owned: Vec<&Activity> = duty.activity_ids.iter().filter_map(|id| activities.get(id)).collect();
    if owned.is_empty() {
        return None;
    }

    let start = owned.iter().map(|a| a.start).min().expect("non-empty");
    let end = owned.iter().map(|a| a.effective_end()).max().expect("non-empty");

    let breaks: Vec<BreakInterval> = owned
        .iter()
        .filter(|a| a.attributes.is_break || a.attributes.is_short_break)
        .map(|a| BreakInterval { start: a.start, end: a.effective_end(), is_regular: a.attributes.is_break })
        .collect();

    let regular_break_minutes: i64 = breaks.iter().filter(|b| b.is_regular).map(BreakInterval::duration_minutes).sum();

    let duty_span_minutes = (end - start).num_minutes().max(0);
    let work_minutes = (duty_span_minutes - regular_break_minutes).max(0);

    let has_night_work = owned
        .iter()
        .filter(|a| !a.attributes.is_break && !a.attributes.is_short_break)
        .any(|a| intersects_night_window(a.start, a.effective_end()));

    let is_absence = owned.iter().any(|a| a.attributes.is_absence);

    Some(DutySnapshot {
        service_id: duty.service_id.clone(),
        owner: duty.owner.clone(),
        day: duty.day_key,
        start,
        end,
        duty_span_minutes,
        work_minutes,
        has_night_work,
        breaks,
        is_absence,
    })
}

/// Build and sort-by-day the snapshots for one owner's duties (spec §4.5:
/// AZG rules evaluate "per owner across their full duty history").
pub fn build_owner_snapshots<'a>(
    duties: impl IntoIterator<Item = &'a Duty>,
    activities: &BTreeMap<String, Activity>,
) -> Vec<DutySnapshot> {
    let mut snapshots: Vec<DutySnapshot> =
        duties.into_iter().filter_map(|d| build_duty_snapshot(d, activities)).collect();
    snapshots.sort_by(|a, b| a.day.cmp(&b.day).then(a.service_id.cmp(&b.service_id)));
    snapshots
}
