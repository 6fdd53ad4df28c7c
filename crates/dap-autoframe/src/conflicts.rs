//! Local conflict emission: worktime, capacity, location, home-depot (spec
//! §4.4.6).

use std::collections::BTreeMap;

use dap_activity::Activity;
use dap_config::Bounds;
use dap_core::{Code, KnownCode};
use dap_masterdata::HomeDepot;

use crate::breaks::BreakPlan;
use crate::depot::DepotSelection;
use crate::window::DutyWindow;

/// Accumulated codes plus per-code hint strings for one duty (spec §4.4.6 —
/// these feed `ServiceByOwnerEntry::merge_conflicts`).
#[derive(Clone, Debug, Default)]
pub struct ConflictReport {
    pub codes: Vec<Code>,
    pub details: BTreeMap<String, Vec<String>>,
}

impl ConflictReport {
    fn push(&mut self, code: KnownCode, hint: impl Into<String>) {
        self.codes.push(code.into());
        self.details.entry(code.as_str().to_string()).or_default().push(hint.into());
    }

    fn extend_codes(&mut self, codes: impl IntoIterator<Item = Code>) {
        self.codes.extend(codes);
    }

    pub fn merge(&mut self, other: ConflictReport) {
        self.codes.extend(other.codes);
        for (code, hints) in other.details {
            self.details.entry(code).or_default().extend(hints);
        }
    }
}

/// Worktime codes: `MAX_DUTY_SPAN`, `MAX_WORK`, `MAX_CONTINUOUS`,
/// `NO_BREAK_WINDOW` (spec §4.4.6).
pub fn worktime_conflicts(window: &DutyWindow, bounds: &Bounds, break_plan: &BreakPlan) -> ConflictReport {
    let mut report = ConflictReport::default();

    let span = window.span_minutes();
    if span > bounds.max_duty_span_minutes {
        report.push(KnownCode::MaxDutySpan, format!("span {span}m > max {}m", bounds.max_duty_span_minutes));
    }

    let work_minutes = span - break_plan.total_break_minutes();
    if work_minutes > bounds.max_work_minutes {
        report.push(KnownCode::MaxWork, format!("work {work_minutes}m > max {}m", bounds.max_work_minutes));
    }

    if break_plan.continuous_violation_count > 0 {
        report.push(
            KnownCode::MaxContinuous,
            format!("{} continuous-work breach(es)", break_plan.continuous_violation_count),
        );
    }
    if break_plan.unresolved_continuous_count > 0 {
        report.push(
            KnownCode::NoBreakWindow,
            format!("{} breach(es) with no usable break window", break_plan.unresolved_continuous_count),
        );
    }

    report
}

/// `CAPACITY_OVERLAP`: any two activities within the same owner/duty whose
/// intervals half-open-overlap, when both opt in via
/// `consider_capacity_conflicts` (spec §4.4.6).
pub fn capacity_overlap_conflicts(duty_activities: &[&Activity]) -> ConflictReport {
    let mut report = ConflictReport::default();
    let mut sorted: Vec<&&Activity> = duty_activities.iter().collect();
    sorted.sort_by_key(|a| (a.start, a.id.clone()));

    for i in 0..sorted.len() {
        let a = sorted[i];
        if !a.attributes.consider_capacity_conflicts {
            continue;
        }
        for b in sorted.iter().skip(i + 1) {
            if !b.attributes.consider_capacity_conflicts {
                continue;
            }
            if a.start < b.effective_end() && b.start < a.effective_end() {
                report.push(KnownCode::CapacityOverlap, format!("{} overlaps {}", a.id, b.id));
            }
        }
    }

    report
}

/// `LOCATION_SEQUENCE`: `prev.to ≠ next.from` for consecutive payload
/// activities that opt in via `consider_location_conflicts` (spec §4.4.6).
pub fn location_sequence_conflicts(payload: &[&Activity]) -> ConflictReport {
    let mut report = ConflictReport::default();
    let mut sorted: Vec<&&Activity> = payload.iter().collect();
    sorted.sort_by_key(|a| (a.start, a.id.clone()));

    for pair in sorted.windows(2) {
        let [prev, next] = pair else { continue };
        if !prev.attributes.consider_location_conflicts || !next.attributes.consider_location_conflicts {
            continue;
        }
        let (Some(prev_to), Some(next_from)) = (prev.to.as_deref(), next.from.as_deref()) else {
            continue;
        };
        if prev_to != next_from {
            report.push(
                KnownCode::LocationSequence,
                format!("{} ends at {prev_to} but {} starts at {next_from}", prev.id, next.id),
            );
        }
    }

    report
}

/// Home-depot codes: the selector's own findings, plus
/// `HOME_DEPOT_NOT_IN_DEPOT` (boundary/break placed outside the depot's
/// allowed sites) and the overnight pair (spec §4.4.6).
pub fn home_depot_conflicts(
    selection: &DepotSelection,
    depot: Option<&HomeDepot>,
    boundary_site_ids: &[Option<&str>],
    is_overnight: bool,
    overnight_site_id: Option<&str>,
) -> ConflictReport {
    let mut report = ConflictReport::default();
    report.extend_codes(selection.codes.iter().cloned());

    if let Some(depot) = depot {
        for site in boundary_site_ids.iter().flatten() {
            if !depot.site_ids.is_empty() && !depot.allows_start_end(site) {
                report.push(KnownCode::HomeDepotNotInDepot, format!("site {site} not in depot {}", depot.id));
            }
        }

        if is_overnight {
            match overnight_site_id {
                Some(site) if !depot.allows_overnight(site) => {
                    report.push(
                        KnownCode::HomeDepotOvernightSiteForbidden,
                        format!("site {site} not allowed for overnight stay"),
                    );
                }
                None => {
                    report.push(KnownCode::HomeDepotOvernightLocationMissing, "overnight duty has no resolved site");
                }
                _ => {}
            }
        }
    }

    report
}
