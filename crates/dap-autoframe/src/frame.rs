//! Per-duty orchestration (spec §4.4.7): ties window, boundary, depot,
//! commute, break, and conflict logic into one `{upserts, deletedIds,
//! managedIds}` result.

use std::collections::{BTreeSet, HashSet};

use dap_activity::Activity;
use dap_config::ResolvedConfig;
use dap_core::{ManagedId, OwnerKind, ServiceId};
use dap_masterdata::{HomeDepot, WalkTimeIndex};

use crate::boundary::{self, BoundaryPlan};
use crate::breaks::{self, BreakPlan, WorkEntry};
use crate::commute;
use crate::conflicts::{self, ConflictReport};
use crate::depot::{self, DepotSelection};
use crate::window::DutyWindow;

/// Everything one autoframer pass over a single duty produces.
#[derive(Clone, Debug)]
pub struct AutoframeResult {
    /// Activities to upsert: the payload activities (with merged conflict
    /// writeback) plus every synthesized managed activity.
    pub upserts: Vec<Activity>,
    /// Ids of managed activities that no longer belong to this duty and
    /// should be deleted (spec §4.4.2, §4.4.5).
    pub deleted_ids: Vec<String>,
    /// The full set of managed ids this duty now owns.
    pub managed_ids: Vec<String>,
    pub window: DutyWindow,
    pub depot_selection: DepotSelection,
    pub break_plan: BreakPlan,
}

/// Run the autoframer for one duty.
///
/// `duty_activities` is every activity currently grouped into this duty
/// (payload plus any pre-existing managed activities); `payload` is the
/// subset the grouper classified as ordinary payload (non-managed).
pub fn autoframe_duty(
    service_id: &ServiceId,
    owner_kind: OwnerKind,
    owner_key: &str,
    duty_activities: &[&Activity],
    config: &ResolvedConfig,
    depot: Option<&HomeDepot>,
    walk_times: &WalkTimeIndex,
) -> AutoframeResult {
    let payload: Vec<&Activity> = duty_activities.iter().filter(|a| !a.is_managed()).copied().collect();

    let boundary_plan: BoundaryPlan = boundary::reconcile(service_id, duty_activities, config);

    // §4.4.1 — duty window, widened only by a manual boundary.
    let mut window = DutyWindow::from_payload(payload.iter().copied());
    let manual_start = boundary_plan.existing_start.as_ref().is_some_and(|a| a.attributes.manual_service_boundary);
    let manual_end = boundary_plan.existing_end.as_ref().is_some_and(|a| a.attributes.manual_service_boundary);
    if manual_start {
        if let Some(a) = &boundary_plan.existing_start {
            window.widen_start(a.start);
        }
    }
    if manual_end {
        if let Some(a) = &boundary_plan.existing_end {
            window.widen_end(a.effective_end());
        }
    }

    let mut by_start: Vec<&Activity> = payload.clone();
    by_start.sort_by_key(|a| (a.start, a.id.clone()));
    let start_op = by_start.first().and_then(|a| a.start_location()).map(str::to_string);
    let mut by_end: Vec<&Activity> = payload.clone();
    by_end.sort_by_key(|a| (a.effective_end(), a.id.clone()));
    let end_op = by_end.last().and_then(|a| a.end_location()).map(str::to_string);

    // §4.4.3 — home-depot site selection.
    let selection = depot::select_home_depot_site(depot, walk_times, start_op.as_deref(), end_op.as_deref());

    // §4.4.4 — commute synthesis (widens `window` further).
    let commute_activities = commute::synthesize_commutes(
        service_id,
        &mut window,
        &selection,
        start_op.as_deref(),
        end_op.as_deref(),
        &config.commute_type_id,
    );

    // §4.4.2 — build the final canonical boundary pair.
    let start_type_id = boundary::boundary_type_id(config, owner_kind, true);
    let end_type_id = boundary::boundary_type_id(config, owner_kind, false);

    let mut start_activity = boundary_plan
        .existing_start
        .clone()
        .unwrap_or_else(|| Activity::new(ManagedId::Start(service_id.clone()).to_string(), window.start, start_type_id.clone()));
    start_activity.start = window.start;
    start_activity.end = Some(window.start);
    start_activity.type_id = start_type_id;
    start_activity.service_id = Some(service_id.clone());
    start_activity.attributes.is_service_start = true;
    if !manual_start {
        if let Some(site) = &selection.site_id {
            start_activity.from = Some(site.clone());
            start_activity.to = Some(site.clone());
            start_activity.location_id = Some(site.clone());
        }
    }

    let mut end_activity = boundary_plan
        .existing_end
        .clone()
        .unwrap_or_else(|| Activity::new(ManagedId::End(service_id.clone()).to_string(), window.end, end_type_id.clone()));
    end_activity.start = window.end;
    end_activity.end = Some(window.end);
    end_activity.type_id = end_type_id;
    end_activity.service_id = Some(service_id.clone());
    end_activity.attributes.is_service_end = true;
    if !manual_end {
        if let Some(site) = &selection.site_id {
            end_activity.from = Some(site.clone());
            end_activity.to = Some(site.clone());
            end_activity.location_id = Some(site.clone());
        }
    }

    // §4.4.5 — break planning (personnel only).
    let mut timeline_owned: Vec<Activity> = Vec::new();
    timeline_owned.push(start_activity.clone());
    for a in &payload {
        timeline_owned.push((*a).clone());
    }
    timeline_owned.extend(commute_activities.iter().cloned());
    timeline_owned.push(end_activity.clone());
    timeline_owned.sort_by_key(|a| (a.start, a.id.clone()));
    let timeline: Vec<WorkEntry<'_>> = timeline_owned.iter().map(WorkEntry::from_activity).collect();

    let mut break_plan = if owner_kind == OwnerKind::Personnel {
        breaks::plan_breaks(&timeline, depot, walk_times, &config.bounds)
    } else {
        BreakPlan::default()
    };
    breaks::stamp_activities(&mut break_plan, service_id, config.primary_break_type_id(), &config.short_break_type_id);

    // §4.4.6 — conflict emission.
    let mut combined = ConflictReport::default();
    combined.merge(conflicts::worktime_conflicts(&window, &config.bounds, &break_plan));

    let all_for_capacity: Vec<&Activity> = std::iter::once(&start_activity)
        .chain(std::iter::once(&end_activity))
        .chain(payload.iter().copied())
        .chain(commute_activities.iter())
        .chain(break_plan.activities.iter())
        .collect();
    combined.merge(conflicts::capacity_overlap_conflicts(&all_for_capacity));
    combined.merge(conflicts::location_sequence_conflicts(&payload));

    let is_overnight = duty_activities.iter().any(|a| a.attributes.is_overnight);
    let overnight_site_id = duty_activities
        .iter()
        .find(|a| a.attributes.is_overnight)
        .and_then(|a| a.start_location())
        .map(str::to_string);
    combined.merge(conflicts::home_depot_conflicts(
        &selection,
        depot,
        &[start_activity.start_location(), end_activity.end_location()],
        is_overnight,
        overnight_site_id.as_deref(),
    ));

    // Writeback: merge the combined report onto every duty-owned activity
    // under this owner's key (spec §4.4.7).
    let mut upserts: Vec<Activity> = Vec::new();
    for mut a in payload.into_iter().cloned() {
        write_owner_conflicts(&mut a, owner_key, service_id, &combined);
        upserts.push(a);
    }
    write_owner_conflicts(&mut start_activity, owner_key, service_id, &combined);
    write_owner_conflicts(&mut end_activity, owner_key, service_id, &combined);
    upserts.push(start_activity.clone());
    upserts.push(end_activity.clone());
    for mut a in commute_activities {
        write_owner_conflicts(&mut a, owner_key, service_id, &combined);
        upserts.push(a);
    }
    for mut a in break_plan.activities.clone() {
        write_owner_conflicts(&mut a, owner_key, service_id, &combined);
        upserts.push(a);
    }

    // Managed ids this duty now owns, and which previously-managed ids are
    // stale (spec §4.4.2, §4.4.5).
    let mut managed_ids: BTreeSet<String> = BTreeSet::new();
    managed_ids.insert(start_activity.id.clone());
    managed_ids.insert(end_activity.id.clone());
    for a in upserts.iter().filter(|a| a.is_managed()) {
        managed_ids.insert(a.id.clone());
    }

    let mut deleted_ids: HashSet<String> = boundary_plan.stale_ids.into_iter().collect();
    for a in duty_activities {
        if a.is_managed() && a.service_id.as_ref() == Some(service_id) && !managed_ids.contains(&a.id) {
            deleted_ids.insert(a.id.clone());
        }
    }

    AutoframeResult {
        upserts,
        deleted_ids: deleted_ids.into_iter().collect(),
        managed_ids: managed_ids.into_iter().collect(),
        window,
        depot_selection: selection,
        break_plan,
    }
}

/// Codes this function fully recomputes every call from the duty's current
/// activities alone (spec §4.4.6) — purged before merging so a resolved
/// violation (e.g. a break added since the last call) actually clears,
/// rather than accumulating forever in a cloned boundary's carried-over
/// `service_by_owner` entry.
fn is_autoframe_local_code(code: &str) -> bool {
    code.starts_with("MAX_")
        || code == "NO_BREAK_WINDOW"
        || code == "CAPACITY_OVERLAP"
        || code == "LOCATION_SEQUENCE"
        || code.starts_with("HOME_DEPOT_")
        || code.starts_with("WALK_TIME_")
}

fn write_owner_conflicts(activity: &mut Activity, owner_key: &str, service_id: &ServiceId, report: &ConflictReport) {
    let entry = activity
        .attributes
        .service_by_owner
        .entry(owner_key.to_string())
        .or_insert_with(|| dap_activity::ServiceByOwnerEntry::new(Some(service_id.clone())));
    entry.retain_codes(|c| !is_autoframe_local_code(c.as_str()));
    entry.merge_conflicts(report.codes.clone(), report.details.clone());
    activity.attributes.recompute_global_conflicts();
}
