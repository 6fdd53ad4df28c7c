//! Managed boundary reconciliation (spec §4.4.2).

use dap_activity::Activity;
use dap_config::ResolvedConfig;
use dap_core::{ManagedId, OwnerKind, ServiceId};

/// What the duty's existing activities say about its start/end boundaries,
/// before the final canonical pair is (re)built.
#[derive(Clone, Debug, Default)]
pub struct BoundaryPlan {
    /// The existing canonical `svcstart:<svc>` activity, if present.
    pub existing_start: Option<Activity>,
    /// The existing canonical `svcend:<svc>` activity, if present.
    pub existing_end: Option<Activity>,
    /// Any other boundary-typed activity in the duty whose id does not match
    /// the canonical grammar — superseded (spec §4.4.2: "become deletedIds").
    pub stale_ids: Vec<String>,
}

/// Scan `duty_activities` for existing boundaries and classify them.
pub fn reconcile(
    service_id: &ServiceId,
    duty_activities: &[&Activity],
    config: &ResolvedConfig,
) -> BoundaryPlan {
    let start_id = ManagedId::Start(service_id.clone()).to_string();
    let end_id = ManagedId::End(service_id.clone()).to_string();
    let boundary_type_ids = config.boundary_type_ids();

    let mut plan = BoundaryPlan::default();
    for activity in duty_activities {
        if activity.id == start_id {
            plan.existing_start = Some((*activity).clone());
        } else if activity.id == end_id {
            plan.existing_end = Some((*activity).clone());
        } else if boundary_type_ids.contains(&activity.type_id) || activity.managed_id().map(|m| m.is_boundary()).unwrap_or(false) {
            plan.stale_ids.push(activity.id.clone());
        }
    }
    plan
}

/// The catalog type id to use for a boundary of `role` for `owner_kind`.
pub fn boundary_type_id(config: &ResolvedConfig, owner_kind: OwnerKind, is_start: bool) -> dap_core::ActivityTypeId {
    match (owner_kind, is_start) {
        (OwnerKind::Personnel, true) => config.personnel_start_type_id.clone(),
        (OwnerKind::Personnel, false) => config.personnel_end_type_id.clone(),
        (OwnerKind::Vehicle, true) => config.vehicle_start_type_id.clone(),
        (OwnerKind::Vehicle, false) => config.vehicle_end_type_id.clone(),
    }
}
