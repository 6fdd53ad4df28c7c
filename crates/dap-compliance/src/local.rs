//! Local conflicts, recomputed globally across the whole input (spec §4.5:
//! "Recomputes capacity and location conflicts globally per owner (catches
//! conflicts across duties)").

use std::collections::BTreeMap;

use dap_activity::{Activity, ServiceByOwnerEntry};
use dap_autoframe::{capacity_overlap_conflicts, location_sequence_conflicts, ConflictReport};

fn is_local_code(code: &str) -> bool {
    matches!(code, "CAPACITY_OVERLAP" | "LOCATION_SEQUENCE")
}

/// Re-evaluate `CAPACITY_OVERLAP`/`LOCATION_SEQUENCE` across every activity
/// in `activities`, grouped by owner rather than by duty, and merge the
/// findings back onto each activity's `service_by_owner` entry — purging
/// stale findings first, the same self-healing contract
/// [`crate::azg::recompute_azg_compliance`] and
/// [`crate::home_depot::recompute_home_depot_compliance`] give their own
/// codes (spec §4.5: a resolved conflict must actually clear).
pub fn recompute_local_conflicts(activities: &mut BTreeMap<String, Activity>) {
    let mut by_owner: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for activity in activities.values() {
        for owner in activity.all_owners() {
            by_owner.entry(owner.resource_id.clone()).or_default().push(activity.id.clone());
        }
    }

    let mut findings: BTreeMap<String, ConflictReport> = BTreeMap::new();
    for (owner_key, ids) in &by_owner {
        let owned: Vec<&Activity> = ids.iter().filter_map(|id| activities.get(id)).collect();
        let payload: Vec<&Activity> = owned.iter().filter(|a| !a.is_managed()).copied().collect();

        let mut report = ConflictReport::default();
        report.merge(capacity_overlap_conflicts(&owned));
        report.merge(location_sequence_conflicts(&payload));
        findings.insert(owner_key.clone(), report);
    }

    for (owner_key, ids) in &by_owner {
        let Some(report) = findings.get(owner_key) else { continue };
        for id in ids {
            if let Some(activity) = activities.get_mut(id) {
                let service_id = activity.service_id.clone();
                let entry = activity
                    .attributes
                    .service_by_owner
                    .entry(owner_key.clone())
                    .or_insert_with(|| ServiceByOwnerEntry::new(service_id));
                entry.retain_codes(|c| !is_local_code(c.as_str()));
                entry.merge_conflicts(report.codes.clone(), report.details.clone());
                activity.attributes.recompute_global_conflicts();
            }
        }
    }
}
