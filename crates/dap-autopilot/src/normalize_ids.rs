//! `normalizeManagedServiceActivities` (spec §6): rewrites managed activity
//! ids to the canonical grammar (spec §6) when they don't already match it.
//!
//! Only activities carrying a `serviceId` and a recognized managed role flag
//! (`is_service_start`/`is_service_end`/`is_break`/`is_short_break`/
//! `is_commute`) are candidates; everything else passes through untouched.
//! Break/short-break ordinals and commute-pause ordinals are assigned by
//! ascending start time within the activity's `serviceId` group, which is
//! the same order the autoframer itself assigns them in (spec §4.4.5).
//!
//! Commute role is the one case the reserved-attribute set can't fully
//! disambiguate (start vs. end vs. a mid-duty pause all set `is_commute`):
//! an existing parseable `svccommute:` id keeps its own role and ordinal;
//! otherwise the earliest commute in the group is treated as the start leg,
//! the latest as the end leg, and everything between as sequential pauses —
//! an engineering call recorded in DESIGN.md, since the distilled spec is
//! silent on how to re-derive commute role from scratch.

use std::collections::BTreeMap;

use dap_activity::Activity;
use dap_core::{ManagedId, PauseDirection, ServiceId};

#[derive(Clone, Debug, PartialEq)]
pub struct NormalizeEntry {
    pub old_id: String,
    pub new_id: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizeReport {
    pub upserts: Vec<Activity>,
    pub deleted_ids: Vec<String>,
    pub entries: Vec<NormalizeEntry>,
}

fn managed_role_flagged(a: &Activity) -> bool {
    a.attributes.is_service_start
        || a.attributes.is_service_end
        || a.attributes.is_break
        || a.attributes.is_short_break
        || a.attributes.is_commute
}

pub(crate) fn normalize_managed_service_activities(activities: Vec<Activity>) -> NormalizeReport {
    let mut by_service: BTreeMap<ServiceId, Vec<Activity>> = BTreeMap::new();
    let mut report = NormalizeReport::default();

    for activity in activities {
        if let Some(service_id) = activity.service_id.clone() {
            if managed_role_flagged(&activity) {
                by_service.entry(service_id).or_default().push(activity);
                continue;
            }
        }
        // Not a rewrite candidate; the caller already has this activity
        // unchanged, so it is neither an upsert nor a deletion here.
    }

    for (service_id, mut group) in by_service {
        group.sort_by(|a, b| a.start.cmp(&b.start).then(a.id.cmp(&b.id)));

        let commute_count = group.iter().filter(|a| a.attributes.is_commute).count();
        let mut commute_seen = 0usize;
        // 1-based, matching the autoframer's own ordinal assignment
        // (`dap_autoframe::breaks::stamp_activities`) so re-normalizing an
        // already-canonical id is a no-op.
        let mut break_ord = 1u32;
        let mut short_break_ord = 1u32;
        let mut pause_ord = 1u32;

        for mut activity in group {
            let canonical = if activity.attributes.is_service_start {
                ManagedId::Start(service_id.clone())
            } else if activity.attributes.is_service_end {
                ManagedId::End(service_id.clone())
            } else if activity.attributes.is_break {
                let n = break_ord;
                break_ord += 1;
                ManagedId::Break(service_id.clone(), n)
            } else if activity.attributes.is_short_break {
                let n = short_break_ord;
                short_break_ord += 1;
                ManagedId::ShortBreak(service_id.clone(), n)
            } else {
                // is_commute
                let existing = activity.managed_id();
                let resolved = match existing {
                    Some(m @ (ManagedId::CommuteStart(_) | ManagedId::CommuteEnd(_) | ManagedId::CommutePause(..))) => m,
                    _ => {
                        let idx = commute_seen;
                        if idx == 0 {
                            ManagedId::CommuteStart(service_id.clone())
                        } else if idx == commute_count - 1 {
                            ManagedId::CommuteEnd(service_id.clone())
                        } else {
                            let n = pause_ord;
                            pause_ord += 1;
                            ManagedId::CommutePause(service_id.clone(), PauseDirection::Out, n)
                        }
                    }
                };
                commute_seen += 1;
                resolved
            };

            let new_id = canonical.to_string();
            if new_id != activity.id {
                let old_id = activity.id.clone();
                activity.id = new_id.clone();
                report.entries.push(NormalizeEntry { old_id: old_id.clone(), new_id });
                report.deleted_ids.push(old_id);
                report.upserts.push(activity);
            }
        }
    }

    report.deleted_ids.sort();
    report.entries.sort_by(|a, b| a.old_id.cmp(&b.old_id));
    report
}
