//! Break and short-break planning (spec §4.4.5).
//!
//! Breaks are planned only for personnel owners. The planner walks the
//! timeline of work entries (boundaries, payload, commutes) and tries to
//! satisfy the continuous-work limit first, then makes a second greedy pass
//! to satisfy the total-work limit.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use dap_activity::Activity;
use dap_config::Bounds;
use dap_core::{ActivityTypeId, ManagedId, ServiceId};
use dap_masterdata::{HomeDepot, TransferNode, WalkTimeIndex};

/// Which site family a placed break drew from.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BreakKind {
    Regular,
    Short,
    /// Neither site set was configured; the raw gap itself was accepted
    /// (spec §4.4.5 step 3).
    RawGap,
}

/// One gap in the timeline that the planner considered.
#[derive(Clone, Debug)]
pub struct BreakPlanEntry {
    pub break_start: DateTime<Utc>,
    pub break_end: DateTime<Utc>,
    pub kind: BreakKind,
    pub site_id: Option<String>,
    /// `true` when the gap could not host any qualifying break (spec §4.4.5:
    /// "record the break as blocked").
    pub blocked: bool,
    /// `true` when this gap was consumed to satisfy `maxWorkMinutes`, not
    /// the continuous-work limit.
    pub for_total_work: bool,
}

/// Full report of the break planner's reasoning for one duty (SPEC_FULL.md
/// §5.3 introspection requirement — lets logging explain why a break was or
/// wasn't placed).
#[derive(Clone, Debug, Default)]
pub struct BreakPlan {
    pub entries: Vec<BreakPlanEntry>,
    pub activities: Vec<Activity>,
    /// Number of times extending the current work segment would have
    /// exceeded `maxContinuousWorkMinutes` (spec §4.4.6: `MAX_CONTINUOUS`).
    pub continuous_violation_count: u32,
    /// Of those, the number where no usable break window existed at all —
    /// either no gap, or a gap no site/raw-fallback could satisfy (spec
    /// §4.4.6: `NO_BREAK_WINDOW`).
    pub unresolved_continuous_count: u32,
}

impl BreakPlan {
    pub fn has_blocked(&self) -> bool {
        self.entries.iter().any(|e| e.blocked)
    }

    pub fn total_break_minutes(&self) -> i64 {
        self.entries
            .iter()
            .filter(|e| !e.blocked)
            .map(|e| (e.break_end - e.break_start).num_minutes())
            .sum()
    }
}

/// One work-bearing item in the duty's timeline (boundary, payload, or
/// commute activity) — whatever the caller decides belongs in the
/// break-planning pass, sorted by `(start, id)`.
#[derive(Clone, Copy, Debug)]
pub struct WorkEntry<'a> {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub start_location: Option<&'a str>,
    pub end_location: Option<&'a str>,
}

impl<'a> WorkEntry<'a> {
    pub fn from_activity(a: &'a Activity) -> Self {
        Self {
            start: a.start,
            end: a.effective_end(),
            start_location: a.start_location(),
            end_location: a.end_location(),
        }
    }

    fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes().max(0)
    }
}

/// Best site in `sites` minimizing `walk(from→site) + walk(site→to)`, such
/// that `gap_minutes - walk_in - walk_out >= min_duration` and both legs are
/// known. Ties break on ascending site id (`BTreeSet` iteration order).
fn best_break_site(
    sites: &BTreeSet<String>,
    walk_times: &WalkTimeIndex,
    from_loc: &str,
    to_loc: &str,
    gap_minutes: i64,
    min_duration: i64,
) -> Option<(String, i64, i64)> {
    let mut best: Option<(String, i64, i64, i64)> = None;
    for site in sites {
        let walk_in = walk_times
            .walk_time_minutes(&TransferNode::op(from_loc), &TransferNode::personnel_site(site.clone()));
        let walk_out = walk_times
            .walk_time_minutes(&TransferNode::personnel_site(site.clone()), &TransferNode::op(to_loc));
        let (Some(walk_in), Some(walk_out)) = (walk_in, walk_out) else {
            continue;
        };
        let duration = gap_minutes - walk_in - walk_out;
        if duration < min_duration {
            continue;
        }
        let cost = walk_in + walk_out;
        let better = match &best {
            None => true,
            Some((_, best_cost, ..)) => cost < *best_cost,
        };
        if better {
            best = Some((site.clone(), cost, walk_in, walk_out));
        }
    }
    best.map(|(site, _cost, walk_in, walk_out)| (site, walk_in, walk_out))
}

/// Try to place a break in `[gap_start, gap_end)` per spec §4.4.5 steps 1-3.
/// Returns `None` (blocked) only when no qualifying placement exists.
fn place_break_at_gap(
    depot: Option<&HomeDepot>,
    walk_times: &WalkTimeIndex,
    from_loc: Option<&str>,
    to_loc: Option<&str>,
    gap_start: DateTime<Utc>,
    gap_end: DateTime<Utc>,
    bounds: &Bounds,
) -> Option<(BreakKind, Option<String>, DateTime<Utc>, DateTime<Utc>)> {
    let gap_minutes = (gap_end - gap_start).num_minutes();

    if let (Some(depot), Some(from_loc), Some(to_loc)) = (depot, from_loc, to_loc) {
        if !depot.break_site_ids.is_empty() {
            if let Some((site, walk_in, walk_out)) = best_break_site(
                &depot.break_site_ids,
                walk_times,
                from_loc,
                to_loc,
                gap_minutes,
                bounds.min_break_minutes,
            ) {
                let start = gap_start + chrono::Duration::minutes(walk_in);
                let end = gap_end - chrono::Duration::minutes(walk_out);
                return Some((BreakKind::Regular, Some(site), start, end));
            }
        }
        if !depot.short_break_site_ids.is_empty() {
            if let Some((site, walk_in, walk_out)) = best_break_site(
                &depot.short_break_site_ids,
                walk_times,
                from_loc,
                to_loc,
                gap_minutes,
                bounds.min_short_break_minutes,
            ) {
                let start = gap_start + chrono::Duration::minutes(walk_in);
                let end = gap_end - chrono::Duration::minutes(walk_out);
                return Some((BreakKind::Short, Some(site), start, end));
            }
        }
        if depot.break_site_ids.is_empty()
            && depot.short_break_site_ids.is_empty()
            && gap_minutes >= bounds.min_break_minutes
        {
            return Some((BreakKind::RawGap, None, gap_start, gap_end));
        }
        None
    } else if gap_minutes >= bounds.min_break_minutes {
        Some((BreakKind::RawGap, None, gap_start, gap_end))
    } else {
        None
    }
}

/// Plan regular/short breaks across `timeline` for one duty (spec §4.4.5).
///
/// `timeline` must be sorted by `(start, id)` and contain every boundary,
/// payload, and commute activity already placed for this duty — but no
/// pre-existing break activities, which this pass replaces wholesale.
pub fn plan_breaks(
    timeline: &[WorkEntry<'_>],
    depot: Option<&HomeDepot>,
    walk_times: &WalkTimeIndex,
    bounds: &Bounds,
) -> BreakPlan {
    let mut plan = BreakPlan::default();
    if timeline.len() < 2 {
        return plan;
    }

    let mut segment_work = 0i64;
    let mut consumed_gap = vec![false; timeline.len() - 1];

    for i in 0..timeline.len() - 1 {
        let cur = timeline[i];
        let next = timeline[i + 1];
        segment_work += cur.duration_minutes();
        let gap_minutes = (next.start - cur.end).num_minutes();
        if segment_work + next.duration_minutes() <= bounds.max_continuous_work_minutes {
            continue;
        }

        plan.continuous_violation_count += 1;

        if gap_minutes <= 0 {
            plan.unresolved_continuous_count += 1;
            continue;
        }

        match place_break_at_gap(depot, walk_times, cur.end_location, next.start_location, cur.end, next.start, bounds) {
            Some((kind, site_id, start, end)) => {
                plan.entries.push(BreakPlanEntry {
                    break_start: start,
                    break_end: end,
                    kind,
                    site_id,
                    blocked: false,
                    for_total_work: false,
                });
                consumed_gap[i] = true;
                segment_work = 0;
            }
            None => {
                plan.unresolved_continuous_count += 1;
                plan.entries.push(BreakPlanEntry {
                    break_start: cur.end,
                    break_end: next.start,
                    kind: BreakKind::RawGap,
                    site_id: None,
                    blocked: true,
                    for_total_work: false,
                });
            }
        }
    }

    // Greedy max-work satisfaction pass (spec §4.4.5: "if total work still
    // exceeds maxWorkMinutes ... consumed from remaining gaps sorted by
    // descending pause duration").
    let span_minutes = (timeline.last().unwrap().end - timeline.first().unwrap().start).num_minutes();
    let mut work_minutes = span_minutes - plan.total_break_minutes();

    if work_minutes > bounds.max_work_minutes {
        let mut candidates: Vec<(usize, i64)> = (0..timeline.len() - 1)
            .filter(|&i| !consumed_gap[i])
            .filter_map(|i| {
                let cur = timeline[i];
                let next = timeline[i + 1];
                let gap = (next.start - cur.end).num_minutes();
                (gap > 0).then_some((i, gap))
            })
            .collect();
        candidates.sort_by(|a, b| b.1.cmp(&a.1));

        for (i, _gap) in candidates {
            if work_minutes <= bounds.max_work_minutes {
                break;
            }
            let cur = timeline[i];
            let next = timeline[i + 1];
            if let Some((kind, site_id, start, end)) =
                place_break_at_gap(depot, walk_times, cur.end_location, next.start_location, cur.end, next.start, bounds)
            {
                let minutes = (end - start).num_minutes();
                plan.entries.push(BreakPlanEntry {
                    break_start: start,
                    break_end: end,
                    kind,
                    site_id,
                    blocked: false,
                    for_total_work: true,
                });
                consumed_gap[i] = true;
                work_minutes -= minutes;
            }
        }
    }

    plan
}

/// Stamp the accepted (non-blocked) entries as managed activities with
/// per-kind ascending ordinals, assigned in chronological order (spec
/// §4.4.5: "assigned ids of the form `svc{break|shortbreak}:<svc>:<ordinal>`").
/// A raw-gap break (no configured site sets) is stamped with the regular
/// break type id and id grammar, since it stands in for a regular break.
pub fn stamp_activities(
    plan: &mut BreakPlan,
    service_id: &ServiceId,
    break_type_id: &ActivityTypeId,
    short_break_type_id: &ActivityTypeId,
) {
    let mut order: Vec<usize> = (0..plan.entries.len()).filter(|&i| !plan.entries[i].blocked).collect();
    order.sort_by_key(|&i| plan.entries[i].break_start);

    let mut regular_ordinal = 0u32;
    let mut short_ordinal = 0u32;
    let mut activities = Vec::with_capacity(order.len());

    for i in order {
        let entry = &plan.entries[i];
        let (id, type_id) = match entry.kind {
            BreakKind::Regular | BreakKind::RawGap => {
                regular_ordinal += 1;
                (ManagedId::Break(service_id.clone(), regular_ordinal).to_string(), break_type_id.clone())
            }
            BreakKind::Short => {
                short_ordinal += 1;
                (ManagedId::ShortBreak(service_id.clone(), short_ordinal).to_string(), short_break_type_id.clone())
            }
        };
        let mut a = Activity::new(id, entry.break_start, type_id);
        a.end = Some(entry.break_end);
        a.service_id = Some(service_id.clone());
        match entry.kind {
            BreakKind::Regular | BreakKind::RawGap => a.attributes.is_break = true,
            BreakKind::Short => a.attributes.is_short_break = true,
        }
        if let Some(site) = &entry.site_id {
            a.from = Some(site.clone());
            a.to = Some(site.clone());
        }
        activities.push(a);
    }

    plan.activities = activities;
}
