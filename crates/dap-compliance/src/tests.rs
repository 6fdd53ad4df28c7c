use chrono::{NaiveDate, NaiveDateTime};

use dap_config::azg::AzgConfig;
use dap_config::resolved::Bounds;
use dap_core::{KnownCode, Owner, OwnerKind, ServiceId, Stage};

use crate::azg::evaluate_owner;
use crate::snapshot::{BreakInterval, DutySnapshot};

fn ts(s: &str) -> chrono::DateTime<chrono::Utc> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap().and_utc()
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn owner() -> Owner {
    Owner::new("PS-1", OwnerKind::Personnel)
}

fn bounds() -> Bounds {
    Bounds::default()
}

/// Disables every AZG rule except the one the test names, so the finding set
/// can only come from that one rule.
fn config_with_only(enable: impl Fn(&mut AzgConfig)) -> AzgConfig {
    let mut config = AzgConfig::default();
    config.break_required.enabled = false;
    config.break_standard_min.enabled = false;
    config.break_midpoint.enabled = false;
    config.break_max_count.enabled = false;
    config.break_too_short.enabled = false;
    config.break_forbidden_night.enabled = false;
    config.work_exceed_buffer.enabled = false;
    config.duty_span_exceed_buffer.enabled = false;
    config.work_avg_7d.enabled = false;
    config.work_avg_365d.enabled = false;
    config.duty_span_avg_28d.enabled = false;
    config.rest_avg_28d.enabled = false;
    config.rest_min.enabled = false;
    config.night_streak_max.enabled = false;
    config.night_28d_max.enabled = false;
    config.rest_days_year_min.enabled = false;
    config.rest_sundays_year_min.enabled = false;
    enable(&mut config);
    config
}

fn snapshot(svc_day: &str, start: &str, end: &str, work_minutes: i64, breaks: Vec<BreakInterval>) -> DutySnapshot {
    let d = day(svc_day);
    let start_ts = ts(start);
    let end_ts = ts(end);
    DutySnapshot {
        service_id: ServiceId::new(Stage::Base, "PS-1", d),
        owner: owner(),
        day: d,
        start: start_ts,
        end: end_ts,
        duty_span_minutes: (end_ts - start_ts).num_minutes(),
        work_minutes,
        has_night_work: false,
        breaks,
        is_absence: false,
    }
}

/// A break starting at 21:00 and ending at 23:00 against a forbidden window
/// of `[22, 6)` overlaps the window (22:00-23:00) even though its *start*
/// hour (21) is outside it — the rule must check interval overlap, not just
/// the start instant.
#[test]
fn forbidden_night_flags_break_whose_start_hour_is_clean_but_interval_overlaps() {
    let breaks = vec![BreakInterval { start: ts("2025-01-01T21:00:00"), end: ts("2025-01-01T23:00:00"), is_regular: true }];
    let duties = vec![snapshot("2025-01-01", "2025-01-01T14:00:00", "2025-01-02T00:00:00", 400, breaks)];

    let config = config_with_only(|c| {
        c.break_forbidden_night.enabled = true;
        c.break_forbidden_night.params.start_hour = 22;
        c.break_forbidden_night.params.end_hour = 6;
    });

    let report = evaluate_owner(OwnerKind::Personnel, &duties, &config, &bounds(), "PROD-2025", &[]);
    let codes = &report.get(&duties[0].service_id).expect("finding").codes;
    assert!(codes.iter().any(|c| c.as_str() == KnownCode::AzgBreakForbiddenNight.as_str()));
}

/// A break fully inside the daylight hours of the same wrapping window must
/// not be flagged.
#[test]
fn forbidden_night_clears_break_outside_window() {
    let breaks = vec![BreakInterval { start: ts("2025-01-01T12:00:00"), end: ts("2025-01-01T12:30:00"), is_regular: true }];
    let duties = vec![snapshot("2025-01-01", "2025-01-01T08:00:00", "2025-01-01T16:00:00", 450, breaks)];

    let config = config_with_only(|c| {
        c.break_forbidden_night.enabled = true;
        c.break_forbidden_night.params.start_hour = 22;
        c.break_forbidden_night.params.end_hour = 6;
    });

    let report = evaluate_owner(OwnerKind::Personnel, &duties, &config, &bounds(), "PROD-2025", &[]);
    assert!(report.get(&duties[0].service_id).is_none());
}

/// `AZG_WORK_AVG_365D` is a single overall average over distinct workdays,
/// not a sliding per-anchor window: two duties at 500m each average to 500m
/// overall, which should flag both even though neither duty's own 7-day-style
/// window would differ from the other.
#[test]
fn work_avg_365d_flags_all_visible_duties_on_overall_violation() {
    let duties = vec![
        snapshot("2025-01-01", "2025-01-01T06:00:00", "2025-01-01T14:20:00", 500, vec![]),
        snapshot("2025-01-02", "2025-01-02T06:00:00", "2025-01-02T14:20:00", 500, vec![]),
    ];

    let config = config_with_only(|c| {
        c.work_avg_365d.enabled = true;
        c.work_avg_365d.params.window_days = 365;
        c.work_avg_365d.params.max_avg_minutes = 450;
    });

    let report = evaluate_owner(OwnerKind::Personnel, &duties, &config, &bounds(), "PROD-2025", &[]);
    for d in &duties {
        let codes = &report.get(&d.service_id).expect("finding").codes;
        assert!(codes.iter().any(|c| c.as_str() == KnownCode::AzgWorkAvg365d.as_str()));
    }
}

/// A duty older than the 365-day visibility window must not pull the overall
/// average down and must not itself be flagged.
#[test]
fn work_avg_365d_ignores_duties_outside_the_visible_window() {
    let duties = vec![
        snapshot("2023-01-01", "2023-01-01T06:00:00", "2023-01-01T08:00:00", 100, vec![]),
        snapshot("2025-01-01", "2025-01-01T06:00:00", "2025-01-01T14:20:00", 500, vec![]),
    ];

    let config = config_with_only(|c| {
        c.work_avg_365d.enabled = true;
        c.work_avg_365d.params.window_days = 365;
        c.work_avg_365d.params.max_avg_minutes = 450;
    });

    let report = evaluate_owner(OwnerKind::Personnel, &duties, &config, &bounds(), "PROD-2025", &[]);
    assert!(report.get(&duties[0].service_id).is_none());
    assert!(report.get(&duties[1].service_id).is_some());
}

/// Overall average at or below the limit flags nothing.
#[test]
fn work_avg_365d_clears_when_overall_average_within_limit() {
    let duties = vec![
        snapshot("2025-01-01", "2025-01-01T06:00:00", "2025-01-01T13:00:00", 400, vec![]),
        snapshot("2025-01-02", "2025-01-02T06:00:00", "2025-01-02T13:00:00", 400, vec![]),
    ];

    let config = config_with_only(|c| {
        c.work_avg_365d.enabled = true;
        c.work_avg_365d.params.window_days = 365;
        c.work_avg_365d.params.max_avg_minutes = 450;
    });

    let report = evaluate_owner(OwnerKind::Personnel, &duties, &config, &bounds(), "PROD-2025", &[]);
    assert!(report.is_empty());
}
