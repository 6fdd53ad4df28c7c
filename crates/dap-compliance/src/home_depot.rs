//! Home-depot compliance: re-selects the depot per duty using the duty's
//! actual payload, purging only `HOME_DEPOT_*`/`WALK_TIME_*` codes before
//! merging new findings (spec §4.5).

use std::collections::BTreeMap;

use dap_activity::{Activity, Duty, ServiceByOwnerEntry};
use dap_autoframe::{home_depot_conflicts, select_home_depot_site};
use dap_core::ServiceId;
use dap_masterdata::{HomeDepot, WalkTimeIndex};

fn is_home_depot_code(code: &str) -> bool {
    code.starts_with("HOME_DEPOT_") || code.starts_with("WALK_TIME_")
}

/// Re-run home-depot selection for every duty in `duties` and write the
/// refreshed `HOME_DEPOT_*`/`WALK_TIME_*` codes onto each duty's activities,
/// preserving every other code already present (spec §4.5).
pub fn recompute_home_depot_compliance(
    duties: &[Duty],
    activities: &mut BTreeMap<String, Activity>,
    depot_by_owner: &BTreeMap<String, HomeDepot>,
    walk_times: &WalkTimeIndex,
) {
    for duty in duties {
        let depot = depot_by_owner.get(&duty.owner.resource_id);
        let owner_key = duty.owner.resource_id.clone();

        let mut payload_ids: Vec<&String> = duty
            .activity_ids
            .iter()
            .filter(|id| activities.get(*id).map(|a| !a.is_managed()).unwrap_or(false))
            .collect();
        payload_ids.sort_by_key(|id| activities[*id].start);

        let start_op = payload_ids.first().and_then(|id| activities[*id].start_location()).map(str::to_string);
        let end_op = payload_ids.last().and_then(|id| activities[*id].end_location()).map(str::to_string);

        let selection = select_home_depot_site(depot, walk_times, start_op.as_deref(), end_op.as_deref());

        let boundary_sites: Vec<Option<String>> = duty
            .activity_ids
            .iter()
            .filter_map(|id| activities.get(id))
            .filter(|a| a.attributes.is_service_start || a.attributes.is_service_end || a.attributes.is_break || a.attributes.is_short_break)
            .map(|a| a.start_location().map(str::to_string))
            .collect();
        let boundary_sites_ref: Vec<Option<&str>> = boundary_sites.iter().map(|s| s.as_deref()).collect();

        let overnight = duty.activity_ids.iter().filter_map(|id| activities.get(id)).find(|a| a.attributes.is_overnight);
        let is_overnight = overnight.is_some();
        let overnight_site = overnight.and_then(|a| a.start_location()).map(str::to_string);

        let report = home_depot_conflicts(&selection, depot, &boundary_sites_ref, is_overnight, overnight_site.as_deref());

        for id in &duty.activity_ids {
            if let Some(activity) = activities.get_mut(id) {
                purge_and_merge(activity, &owner_key, &duty.service_id, report.codes.clone(), report.details.clone());
            }
        }
    }
}

fn purge_and_merge(
    activity: &mut Activity,
    owner_key: &str,
    service_id: &ServiceId,
    codes: Vec<dap_core::Code>,
    details: std::collections::BTreeMap<String, Vec<String>>,
) {
    let entry = activity
        .attributes
        .service_by_owner
        .entry(owner_key.to_string())
        .or_insert_with(|| ServiceByOwnerEntry::new(Some(service_id.clone())));
    entry.retain_codes(|c| !is_home_depot_code(c.as_str()));
    entry.merge_conflicts(codes, details);
    activity.attributes.recompute_global_conflicts();
}
