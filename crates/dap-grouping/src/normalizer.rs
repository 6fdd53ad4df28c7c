//! Metadata Normalizer (spec §4.2).
//!
//! For each non-managed, non-boundary activity: clears `serviceId`, shrinks
//! `service_by_owner` to the owners actually listed on the activity, and
//! drops the mapping entirely when `is_within_service == outside`.
//! Idempotent by construction: every step only ever narrows existing state
//! to a function of the activity's own current fields, so running it twice
//! in a row is a no-op the second time.

use std::collections::BTreeMap;
use std::collections::HashSet;

use dap_activity::{Activity, WithinService};
use dap_config::ResolvedConfig;

/// Run the normalizer over every activity in `activities` (spec §4.2).
pub fn normalize(activities: &mut BTreeMap<String, Activity>, config: &ResolvedConfig) {
    let boundary_type_ids = config.boundary_type_ids();
    for activity in activities.values_mut() {
        if activity.is_managed() || boundary_type_ids.contains(&activity.type_id) {
            continue;
        }
        normalize_one(activity);
    }
}

fn normalize_one(activity: &mut Activity) {
    activity.service_id = None;

    let owner_ids: HashSet<String> =
        activity.all_owners().into_iter().map(|o| o.resource_id).collect();
    activity.attributes.service_by_owner.retain(|owner_id, _| owner_ids.contains(owner_id));

    if activity.attributes.is_within_service == WithinService::Outside {
        activity.attributes.service_by_owner.clear();
    }

    activity.attributes.recompute_global_conflicts();
}
