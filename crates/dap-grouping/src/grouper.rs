//! Grouper (spec §4.3): partitions activities into duties keyed by
//! `(stageId, ownerId, UTC day)`.
//!
//! # Two passes
//!
//! **Pass 1** bins activities per owner: outside-service payload activities
//! are dropped from the bins (but not from the working map — they stay
//! ungrouped, still eligible for local conflict reporting in
//! `dap-compliance`), while managed/boundary/break activities are always
//! kept since they anchor duty reconstruction even when a payload neighbor
//! is filtered out.
//!
//! **Pass 2** walks each owner's payload in `(start, end, id)` order and
//! assigns a `ServiceId`, implementing the cross-midnight carry rule and the
//! own-serviceId override (spec §4.3).
//!
//! Boundaries/breaks/managed activities resolve their duty by parsing their
//! own managed id first, falling back to an explicit `serviceId`, then to a
//! UTC-day fallback; boundaries whose parsed owner/stage disagrees with
//! their resolved owner are discarded (spec §4.3, "protects against
//! drag-and-drop leftovers").

use std::collections::BTreeMap;

use dap_activity::{Activity, Duty, WithinService};
use dap_config::ResolvedConfig;
use dap_core::{ManagedId, Owner, ServiceId, Stage};

/// Output of [`group`]: the duties built this call, plus the ids of managed
/// activities discarded as drag-and-drop leftovers (spec §4.3) and the ids
/// of activities omitted because no owner could be resolved.
#[derive(Clone, Debug, Default)]
pub struct GroupingResult {
    pub duties: BTreeMap<ServiceId, Duty>,
    pub discarded_managed_ids: Vec<String>,
    pub unowned_ids: Vec<String>,
}

/// Run the grouper, writing `service_id`/`service_by_owner` assignments
/// directly onto `activities` and returning the resulting duty index.
pub fn group(
    activities: &mut BTreeMap<String, Activity>,
    stage: Stage,
    config: &ResolvedConfig,
) -> GroupingResult {
    let boundary_type_ids = config.boundary_type_ids();
    let mut result = GroupingResult::default();

    // ── Pass 1: bin ids per owner ──────────────────────────────────────────
    let mut payload_by_owner: BTreeMap<Owner, Vec<String>> = BTreeMap::new();
    let mut managed_ids: Vec<String> = Vec::new();

    for (id, activity) in activities.iter() {
        let is_boundary_like = boundary_type_ids.contains(&activity.type_id);
        if activity.is_managed() || is_boundary_like {
            managed_ids.push(id.clone());
            continue;
        }
        let Some(owner) = activity.owner() else {
            result.unowned_ids.push(id.clone());
            continue;
        };
        if activity.attributes.is_within_service == WithinService::Outside {
            continue;
        }
        payload_by_owner.entry(owner).or_default().push(id.clone());
    }

    // ── Pass 2: assign duties to payload activities ────────────────────────
    for (owner, mut ids) in payload_by_owner {
        ids.sort_by(|a, b| {
            let (act_a, act_b) = (&activities[a], &activities[b]);
            act_a
                .start
                .cmp(&act_b.start)
                .then(act_a.effective_end().cmp(&act_b.effective_end()))
                .then(a.cmp(b))
        });

        let mut current: Option<(ServiceId, chrono::DateTime<chrono::Utc>)> = None;

        for id in ids {
            let activity = &activities[&id];
            let day = activity.start.date_naive();

            let assigned = match own_service_override(activity, &owner, stage) {
                Some(sid) => sid,
                None => match &current {
                    None => ServiceId::new(stage, owner.resource_id.clone(), day),
                    Some((cur_sid, cur_start)) => {
                        if day == cur_sid.day {
                            cur_sid.clone()
                        } else if (activity.start - *cur_start).num_minutes()
                            <= config.bounds.max_duty_span_minutes
                        {
                            cur_sid.clone()
                        } else {
                            ServiceId::new(stage, owner.resource_id.clone(), day)
                        }
                    }
                },
            };

            match &current {
                Some((cur_sid, _)) if *cur_sid == assigned => {}
                _ => current = Some((assigned.clone(), activity.start)),
            }

            let duty = result
                .duties
                .entry(assigned.clone())
                .or_insert_with(|| Duty::new(assigned.clone(), owner.clone()));
            duty.activity_ids.push(id.clone());

            let activity = activities.get_mut(&id).expect("activity present");
            let entry = activity
                .attributes
                .service_by_owner
                .entry(owner.resource_id.clone())
                .or_default();
            entry.service_id = Some(assigned);
        }
    }

    // ── Managed/boundary resolution ─────────────────────────────────────────
    for id in managed_ids {
        let activity = &activities[&id];
        let is_boundary = boundary_type_ids.contains(&activity.type_id)
            && activity.managed_id().as_ref().map(ManagedId::is_boundary).unwrap_or(true);

        let resolved = resolve_managed_service_id(activity, stage);
        let Some(sid) = resolved else {
            result.unowned_ids.push(id);
            continue;
        };

        if is_boundary {
            if let Some(owner) = activity.owner() {
                if owner.resource_id != sid.owner_id || stage != sid.stage {
                    result.discarded_managed_ids.push(id);
                    continue;
                }
            }
        }

        let owner = activity
            .owner()
            .unwrap_or_else(|| Owner::new(sid.owner_id.clone(), infer_owner_kind(activity)));

        let duty = result
            .duties
            .entry(sid.clone())
            .or_insert_with(|| Duty::new(sid.clone(), owner));
        duty.activity_ids.push(id.clone());

        let activity = activities.get_mut(&id).expect("activity present");
        activity.service_id = Some(sid);
    }

    result
}

/// An activity's own `serviceId` (or its `service_by_owner[owner].serviceId`)
/// overrides the derived assignment when it already names `(stage, owner)`
/// (spec §4.3).
fn own_service_override(activity: &Activity, owner: &Owner, stage: Stage) -> Option<ServiceId> {
    let candidate = activity.service_id.clone().or_else(|| {
        activity
            .attributes
            .service_by_owner
            .get(&owner.resource_id)
            .and_then(|e| e.service_id.clone())
    })?;
    if candidate.stage == stage && candidate.owner_id == owner.resource_id {
        Some(candidate)
    } else {
        None
    }
}

/// Resolve a managed/boundary activity's `ServiceId`: parse its own id
/// first, then an explicit `serviceId`, then fall back to the UTC day of
/// its start against its resolved owner (spec §4.3).
fn resolve_managed_service_id(activity: &Activity, stage: Stage) -> Option<ServiceId> {
    if let Some(mid) = activity.managed_id() {
        return Some(mid.service_id().clone());
    }
    if let Some(sid) = &activity.service_id {
        return Some(sid.clone());
    }
    let owner = activity.owner()?;
    Some(ServiceId::new(stage, owner.resource_id, activity.start.date_naive()))
}

fn infer_owner_kind(activity: &Activity) -> dap_core::OwnerKind {
    activity.owner().map(|o| o.kind).unwrap_or(dap_core::OwnerKind::Personnel)
}
