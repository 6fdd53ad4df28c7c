//! AZG rolling-window labor-law rule evaluators (spec §4.5 table).
//!
//! Each function takes one owner's [`DutySnapshot`]s, already sorted
//! ascending by `day`, and returns the `(ServiceId, KnownCode, hint)` triples
//! to write back. [`evaluate_owner`] runs every enabled rule and folds the
//! results into one [`dap_autoframe::ConflictReport`] per duty.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use dap_activity::{Activity, Duty, ServiceByOwnerEntry};
use dap_autoframe::ConflictReport;
use dap_config::azg::AzgConfig;
use dap_config::resolved::Bounds;
use dap_core::{is_sunday_like, timetable_year_bounds, parse_variant_year, Code, KnownCode, Owner, OwnerKind, ServiceId};

use crate::snapshot::{build_owner_snapshots, interval_intersects_hour_window, DutySnapshot};

type Finding = (ServiceId, KnownCode, String);

fn is_azg_code(code: &str) -> bool {
    code.starts_with("AZG_")
}

/// Evaluate every enabled AZG rule across all owners' duty histories and
/// write the refreshed `AZG_*` codes onto each duty's activities, purging
/// stale `AZG_*` codes first so a fixed violation (e.g. a break added since
/// the last call) actually clears (spec §4.5: "idempotent and order-
/// insensitive").
pub fn recompute_azg_compliance(
    duties: &[Duty],
    activities: &mut BTreeMap<String, Activity>,
    bounds: &Bounds,
    config: &AzgConfig,
    variant_id: &str,
    extra_rest_dates: &[NaiveDate],
) {
    let mut by_owner: BTreeMap<Owner, Vec<&Duty>> = BTreeMap::new();
    for duty in duties {
        by_owner.entry(duty.owner.clone()).or_default().push(duty);
    }

    let mut findings_by_service: BTreeMap<ServiceId, ConflictReport> = BTreeMap::new();
    for (owner, owner_duties) in &by_owner {
        let snapshots: Vec<DutySnapshot> = build_owner_snapshots(owner_duties.iter().copied(), activities);
        let per_duty = evaluate_owner(owner.kind, &snapshots, config, bounds, variant_id, extra_rest_dates);
        for (service_id, report) in per_duty {
            findings_by_service.entry(service_id).or_default().merge(report);
        }
    }

    for duty in duties {
        let report = findings_by_service.get(&duty.service_id);
        let owner_key = duty.owner.resource_id.clone();
        for id in &duty.activity_ids {
            let Some(activity) = activities.get_mut(id) else { continue };
            let entry = activity
                .attributes
                .service_by_owner
                .entry(owner_key.clone())
                .or_insert_with(|| ServiceByOwnerEntry::new(Some(duty.service_id.clone())));
            entry.retain_codes(|c| !is_azg_code(c.as_str()));
            if let Some(report) = report {
                entry.merge_conflicts(report.codes.clone(), report.details.clone());
            }
            activity.attributes.recompute_global_conflicts();
        }
    }
}

/// Run every enabled AZG rule over one owner's duty history and fold the
/// results into a per-duty [`ConflictReport`] map.
pub fn evaluate_owner(
    owner_kind: OwnerKind,
    duties: &[DutySnapshot],
    config: &AzgConfig,
    bounds: &Bounds,
    variant_id: &str,
    extra_rest_dates: &[NaiveDate],
) -> BTreeMap<ServiceId, ConflictReport> {
    let mut findings: Vec<Finding> = Vec::new();

    if config.break_required.applies_to(owner_kind) {
        findings.extend(break_required(duties, bounds));
    }
    if config.break_standard_min.applies_to(owner_kind) {
        findings.extend(break_standard_min(duties, &config.break_standard_min.params));
    }
    if config.break_midpoint.applies_to(owner_kind) {
        findings.extend(break_midpoint(duties, &config.break_midpoint.params));
    }
    if config.break_max_count.applies_to(owner_kind) {
        findings.extend(break_max_count(duties, config.break_max_count.params.max_count));
    }
    if config.break_too_short.applies_to(owner_kind) {
        findings.extend(break_too_short(duties, bounds.min_break_minutes));
    }
    if config.break_forbidden_night.applies_to(owner_kind) {
        findings.extend(break_forbidden_night(
            duties,
            config.break_forbidden_night.params.start_hour,
            config.break_forbidden_night.params.end_hour,
        ));
    }
    if config.work_exceed_buffer.applies_to(owner_kind) {
        findings.extend(work_exceed_buffer(duties, bounds, config.work_exceed_buffer.params.buffer_minutes));
    }
    if config.duty_span_exceed_buffer.applies_to(owner_kind) {
        findings.extend(duty_span_exceed_buffer(duties, bounds, config.duty_span_exceed_buffer.params.buffer_minutes));
    }
    if config.work_avg_7d.applies_to(owner_kind) {
        findings.extend(work_avg_window(
            duties,
            config.work_avg_7d.params.window_days,
            config.work_avg_7d.params.max_avg_minutes,
            KnownCode::AzgWorkAvg7d,
        ));
    }
    if config.work_avg_365d.applies_to(owner_kind) {
        findings.extend(work_avg_overall(
            duties,
            config.work_avg_365d.params.window_days,
            config.work_avg_365d.params.max_avg_minutes,
        ));
    }
    if config.duty_span_avg_28d.applies_to(owner_kind) {
        findings.extend(span_avg_window(
            duties,
            config.duty_span_avg_28d.params.window_days,
            config.duty_span_avg_28d.params.max_avg_minutes,
        ));
    }
    if config.rest_avg_28d.applies_to(owner_kind) {
        findings.extend(rest_avg_window(
            duties,
            config.rest_avg_28d.params.window_days,
            config.rest_avg_28d.params.max_avg_minutes,
        ));
    }
    if config.rest_min.applies_to(owner_kind) {
        findings.extend(rest_min(duties, config.rest_min.params.min_rest_minutes));
    }
    if config.night_streak_max.applies_to(owner_kind) {
        findings.extend(night_streak_max(duties, config.night_streak_max.params.max_consecutive_days));
    }
    if config.night_28d_max.applies_to(owner_kind) {
        findings.extend(night_28d_max(
            duties,
            config.night_28d_max.params.window_days,
            config.night_28d_max.params.max_count,
        ));
    }
    if config.rest_days_year_min.applies_to(owner_kind) || config.rest_sundays_year_min.applies_to(owner_kind) {
        findings.extend(rest_days_year(
            duties,
            variant_id,
            extra_rest_dates,
            config.rest_days_year_min.applies_to(owner_kind).then_some(config.rest_days_year_min.params.min_count),
            config.rest_sundays_year_min.applies_to(owner_kind).then_some(config.rest_sundays_year_min.params.min_count),
        ));
    }

    let mut out: BTreeMap<ServiceId, ConflictReport> = BTreeMap::new();
    for (service_id, code, hint) in findings {
        let report = out.entry(service_id).or_default();
        report.codes.push(Code::Known(code));
        report.details.entry(code.as_str().to_string()).or_default().push(hint);
    }
    out
}

fn break_required(duties: &[DutySnapshot], bounds: &Bounds) -> Vec<Finding> {
    duties
        .iter()
        .filter(|d| d.work_minutes > bounds.max_continuous_work_minutes && d.regular_break_count() == 0)
        .map(|d| (d.service_id.clone(), KnownCode::AzgBreakRequired, format!("work {}m with no break", d.work_minutes)))
        .collect()
}

fn break_standard_min(duties: &[DutySnapshot], params: &dap_config::azg::BreakStandardMinParams) -> Vec<Finding> {
    duties
        .iter()
        .filter(|d| {
            d.regular_break_count() > 0
                && d.longest_regular_break_minutes() < params.standard_min_minutes
                && d.work_minutes > params.interruption_threshold_minutes
        })
        .map(|d| {
            (
                d.service_id.clone(),
                KnownCode::AzgBreakStandardMin,
                format!("longest break {}m < standard {}m", d.longest_regular_break_minutes(), params.standard_min_minutes),
            )
        })
        .collect()
}

fn break_midpoint(duties: &[DutySnapshot], params: &dap_config::azg::BreakMidpointParams) -> Vec<Finding> {
    duties
        .iter()
        .filter(|d| d.duty_span_minutes > params.long_duty_threshold_minutes)
        .filter_map(|d| {
            let midpoint = d.start + (d.end - d.start) / 2;
            let nearest = d.break_nearest_midpoint();
            let spans = nearest.is_some_and(|b| {
                let break_mid = b.start + (b.end - b.start) / 2;
                (break_mid - midpoint).num_minutes().abs() <= params.tolerance_minutes
            });
            (!spans).then(|| (d.service_id.clone(), KnownCode::AzgBreakMidpoint, "nearest break misses work midpoint".to_string()))
        })
        .collect()
}

fn break_max_count(duties: &[DutySnapshot], max_count: usize) -> Vec<Finding> {
    duties
        .iter()
        .filter(|d| d.regular_break_count() > max_count)
        .map(|d| (d.service_id.clone(), KnownCode::AzgBreakMaxCount, format!("{} regular breaks > max {max_count}", d.regular_break_count())))
        .collect()
}

fn break_too_short(duties: &[DutySnapshot], min_break_minutes: i64) -> Vec<Finding> {
    duties
        .iter()
        .filter(|d| d.breaks.iter().any(|b| b.duration_minutes() < min_break_minutes))
        .map(|d| (d.service_id.clone(), KnownCode::AzgBreakTooShort, "a break is shorter than the minimum".to_string()))
        .collect()
}

fn break_forbidden_night(duties: &[DutySnapshot], start_hour: u32, end_hour: u32) -> Vec<Finding> {
    duties
        .iter()
        .filter(|d| {
            d.breaks
                .iter()
                .any(|b| interval_intersects_hour_window(b.start, b.end, start_hour, end_hour))
        })
        .map(|d| (d.service_id.clone(), KnownCode::AzgBreakForbiddenNight, "break overlaps the forbidden window".to_string()))
        .collect()
}

fn work_exceed_buffer(duties: &[DutySnapshot], bounds: &Bounds, buffer_minutes: i64) -> Vec<Finding> {
    duties
        .iter()
        .filter(|d| d.work_minutes > bounds.max_work_minutes + buffer_minutes)
        .map(|d| (d.service_id.clone(), KnownCode::AzgWorkExceedBuffer, format!("work {}m exceeds buffer", d.work_minutes)))
        .collect()
}

fn duty_span_exceed_buffer(duties: &[DutySnapshot], bounds: &Bounds, buffer_minutes: i64) -> Vec<Finding> {
    duties
        .iter()
        .filter(|d| d.duty_span_minutes > bounds.max_duty_span_minutes + buffer_minutes)
        .map(|d| (d.service_id.clone(), KnownCode::AzgDutySpanExceedBuffer, format!("span {}m exceeds buffer", d.duty_span_minutes)))
        .collect()
}

/// Slide a `window_days`-wide window over consecutive-workday streaks,
/// flagging every duty in a window whose average work minutes exceeds
/// `max_avg_minutes` (spec §4.5: `AZG_WORK_AVG_7D`).
fn work_avg_window(duties: &[DutySnapshot], window_days: i64, max_avg_minutes: i64, code: KnownCode) -> Vec<Finding> {
    sliding_window_avg(duties, window_days, max_avg_minutes, code, |d| d.work_minutes)
}

/// A single overall average, not a sliding window (spec §4.5:
/// `AZG_WORK_AVG_365D` — "overall average work per distinct workday across
/// the owner's visible duties"). "Visible" is the trailing `window_days`-day
/// span ending on the owner's most recent duty day; duties on the same day
/// pool their work minutes into one distinct-workday total before averaging.
/// Unlike [`work_avg_window`]'s per-anchor sliding check, a single violation
/// flags every visible duty at once.
fn work_avg_overall(duties: &[DutySnapshot], window_days: i64, max_avg_minutes: i64) -> Vec<Finding> {
    let Some(latest_day) = duties.iter().map(|d| d.day).max() else { return Vec::new() };
    let earliest_visible = latest_day - chrono::Duration::days(window_days - 1);
    let visible: Vec<&DutySnapshot> = duties.iter().filter(|d| d.day >= earliest_visible).collect();
    if visible.is_empty() {
        return Vec::new();
    }

    let mut work_by_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for d in &visible {
        *work_by_day.entry(d.day).or_insert(0) += d.work_minutes;
    }
    let distinct_days = work_by_day.len() as i64;
    let total: i64 = work_by_day.values().sum();
    let avg = total / distinct_days;

    if avg > max_avg_minutes {
        visible
            .iter()
            .map(|d| (d.service_id.clone(), KnownCode::AzgWorkAvg365d, format!("overall avg {avg}m/workday > max {max_avg_minutes}m")))
            .collect()
    } else {
        Vec::new()
    }
}

fn span_avg_window(duties: &[DutySnapshot], window_days: i64, max_avg_minutes: i64) -> Vec<Finding> {
    sliding_window_avg(duties, window_days, max_avg_minutes, KnownCode::AzgDutySpanAvg28d, |d| d.duty_span_minutes)
}

fn sliding_window_avg(
    duties: &[DutySnapshot],
    window_days: i64,
    max_avg_minutes: i64,
    code: KnownCode,
    metric: impl Fn(&DutySnapshot) -> i64,
) -> Vec<Finding> {
    let mut flagged: Vec<Finding> = Vec::new();
    for (i, anchor) in duties.iter().enumerate() {
        let window_end = anchor.day + chrono::Duration::days(window_days - 1);
        let in_window: Vec<&DutySnapshot> = duties[i..].iter().take_while(|d| d.day <= window_end).collect();
        if in_window.is_empty() {
            continue;
        }
        let total: i64 = in_window.iter().map(|d| metric(d)).sum();
        let avg = total / in_window.len() as i64;
        if avg > max_avg_minutes {
            for d in &in_window {
                flagged.push((d.service_id.clone(), code, format!("window avg {avg}m > max {max_avg_minutes}m")));
            }
        }
    }
    flagged
}

/// Rest gap between consecutive duties, sliding-averaged over `window_days`
/// (spec §4.5: `AZG_REST_AVG_28D`).
fn rest_avg_window(duties: &[DutySnapshot], window_days: i64, max_avg_minutes: i64) -> Vec<Finding> {
    if duties.len() < 2 {
        return Vec::new();
    }
    let gaps: Vec<(NaiveDate, i64, ServiceId)> = duties
        .windows(2)
        .map(|w| ((w[1].start - w[0].end).num_minutes(), w[0].day, w[1].service_id.clone()))
        .map(|(gap, day, svc)| (day, gap, svc))
        .collect();

    let mut flagged = Vec::new();
    for (i, (anchor_day, _, _)) in gaps.iter().enumerate() {
        let window_end = *anchor_day + chrono::Duration::days(window_days - 1);
        let in_window: Vec<&(NaiveDate, i64, ServiceId)> = gaps[i..].iter().take_while(|(d, ..)| *d <= window_end).collect();
        if in_window.is_empty() {
            continue;
        }
        let total: i64 = in_window.iter().map(|(_, g, _)| g).sum();
        let avg = total / in_window.len() as i64;
        if avg < max_avg_minutes {
            for (_, _, svc) in &in_window {
                flagged.push((svc.clone(), KnownCode::AzgRestAvg28d, format!("rest window avg {avg}m < min {max_avg_minutes}m")));
            }
        }
    }
    flagged
}

fn rest_min(duties: &[DutySnapshot], min_rest_minutes: i64) -> Vec<Finding> {
    duties
        .windows(2)
        .filter(|w| (w[1].start - w[0].end).num_minutes() < min_rest_minutes)
        .map(|w| (w[1].service_id.clone(), KnownCode::AzgRestMin, format!("rest before this duty < min {min_rest_minutes}m")))
        .collect()
}

/// Consecutive calendar days (no gap) each with night work (spec §4.5:
/// `AZG_NIGHT_STREAK_MAX`).
fn night_streak_max(duties: &[DutySnapshot], max_consecutive_days: usize) -> Vec<Finding> {
    let mut flagged = Vec::new();
    let mut streak: Vec<&DutySnapshot> = Vec::new();
    let mut prev_day: Option<NaiveDate> = None;

    let mut flush = |streak: &mut Vec<&DutySnapshot>, flagged: &mut Vec<Finding>| {
        if streak.len() > max_consecutive_days {
            for d in streak.iter() {
                flagged.push((
                    d.service_id.clone(),
                    KnownCode::AzgNightStreakMax,
                    format!("{} consecutive night-work days > max {max_consecutive_days}", streak.len()),
                ));
            }
        }
        streak.clear();
    };

    for d in duties {
        if !d.has_night_work {
            flush(&mut streak, &mut flagged);
            prev_day = None;
            continue;
        }
        let contiguous = prev_day.is_some_and(|p| d.day == p + chrono::Duration::days(1));
        if !contiguous {
            flush(&mut streak, &mut flagged);
        }
        streak.push(d);
        prev_day = Some(d.day);
    }
    flush(&mut streak, &mut flagged);
    flagged
}

fn night_28d_max(duties: &[DutySnapshot], window_days: i64, max_count: usize) -> Vec<Finding> {
    let mut flagged = Vec::new();
    for (i, anchor) in duties.iter().enumerate() {
        let window_end = anchor.day + chrono::Duration::days(window_days - 1);
        let in_window: Vec<&DutySnapshot> = duties[i..].iter().take_while(|d| d.day <= window_end).collect();
        let night_count = in_window.iter().filter(|d| d.has_night_work).count();
        if night_count > max_count {
            for d in in_window.iter().filter(|d| d.has_night_work) {
                flagged.push((d.service_id.clone(), KnownCode::AzgNight28dMax, format!("{night_count} night-work days in window > max {max_count}")));
            }
        }
    }
    flagged
}

/// Year-bounds rest-day accounting (spec §4.5, last row). `variant_id`
/// supplies the timetable year via [`parse_variant_year`]; days not covered
/// by any duty are rest days, and [`is_sunday_like`] classifies the
/// Sunday-equivalent subset.
fn rest_days_year(
    duties: &[DutySnapshot],
    variant_id: &str,
    extra_rest_dates: &[NaiveDate],
    min_rest_days: Option<usize>,
    min_rest_sundays: Option<usize>,
) -> Vec<Finding> {
    let Some(year) = parse_variant_year(variant_id) else { return Vec::new() };
    let (start, end) = timetable_year_bounds(year);

    let worked: std::collections::BTreeSet<NaiveDate> = duties.iter().map(|d| d.day).collect();

    let mut rest_days = 0usize;
    let mut rest_sundays = 0usize;
    let mut day = start;
    while day <= end {
        if !worked.contains(&day) {
            rest_days += 1;
            if is_sunday_like(day, extra_rest_dates) {
                rest_sundays += 1;
            }
        }
        day += chrono::Duration::days(1);
    }

    let Some(last_duty) = duties.iter().max_by_key(|d| d.day) else { return Vec::new() };
    let mut flagged = Vec::new();
    if let Some(min) = min_rest_days {
        if rest_days < min {
            flagged.push((
                last_duty.service_id.clone(),
                KnownCode::AzgRestDaysYearMin,
                format!("{rest_days} rest days in timetable year {year} < min {min}"),
            ));
        }
    }
    if let Some(min) = min_rest_sundays {
        if rest_sundays < min {
            flagged.push((
                last_duty.service_id.clone(),
                KnownCode::AzgRestSundaysYearMin,
                format!("{rest_sundays} Sunday-like rest days in timetable year {year} < min {min}"),
            ));
        }
    }
    flagged
}
