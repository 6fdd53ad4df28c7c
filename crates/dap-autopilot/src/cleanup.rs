//! `cleanupServiceBoundaries` (spec §6): enforces one start and one end
//! boundary per `(owner, dayKey)`, preferring earlier starts / later ends
//! and, at ties, manual boundaries.
//!
//! Spec §9 flags the tie-break order as an Open Question ("confirm that
//! this is the intended canonical order") and separately notes that "the
//! cleanup pass's preference for manual boundaries on ties may conflict
//! with the autoframer's widen-only rule". DESIGN.md records the decision:
//! earlier-start / later-end is the primary key (matching the autoframer's
//! own widen-only bias — a manual boundary only wins a tie on the *same*
//! instant, so it never fights widen-only in practice), and manual-wins is
//! the tie-break only when two boundaries land on the exact same instant.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use dap_activity::Activity;
use dap_config::ResolvedConfig;
use dap_core::{Owner, Stage};

/// What happened to one `(owner, day)`'s boundaries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CleanupEntry {
    pub owner: Owner,
    pub day: NaiveDate,
    pub kept_start_id: Option<String>,
    pub kept_end_id: Option<String>,
    pub removed_ids: Vec<String>,
}

/// Result of a `cleanup_service_boundaries` call (spec §6).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CleanupReport {
    pub deleted_ids: Vec<String>,
    pub entries: Vec<CleanupEntry>,
}

fn is_manual(a: &Activity) -> bool {
    a.attributes.manual_service_boundary
}

pub(crate) fn cleanup_service_boundaries(
    activities: &[Activity],
    _stage: Stage,
    config: &ResolvedConfig,
) -> CleanupReport {
    let start_type_ids = config.start_type_ids();
    let end_type_ids = config.end_type_ids();

    let mut starts: BTreeMap<(Owner, NaiveDate), Vec<&Activity>> = BTreeMap::new();
    let mut ends: BTreeMap<(Owner, NaiveDate), Vec<&Activity>> = BTreeMap::new();

    for activity in activities {
        let Some(owner) = activity.owner() else { continue };
        let day = activity.start.date_naive();
        if start_type_ids.contains(&activity.type_id) {
            starts.entry((owner.clone(), day)).or_default().push(activity);
        } else if end_type_ids.contains(&activity.type_id) {
            ends.entry((owner, day)).or_default().push(activity);
        }
    }

    let mut keys: BTreeSet<(Owner, NaiveDate)> = starts.keys().cloned().collect();
    keys.extend(ends.keys().cloned());

    let mut deleted_ids: Vec<String> = Vec::new();
    let mut entries: Vec<CleanupEntry> = Vec::new();

    for key @ (owner, day) in keys {
        let mut entry = CleanupEntry { owner: owner.clone(), day, ..Default::default() };

        if let Some(mut candidates) = starts.remove(&key) {
            // Earlier start preferred; ties prefer the manual boundary.
            candidates.sort_by_key(|a| (a.start, !is_manual(a), a.id.clone()));
            let (keep, rest) = candidates.split_first().expect("non-empty bucket");
            entry.kept_start_id = Some(keep.id.clone());
            for a in rest {
                deleted_ids.push(a.id.clone());
                entry.removed_ids.push(a.id.clone());
            }
        }

        if let Some(mut candidates) = ends.remove(&key) {
            // Later end preferred; ties prefer the manual boundary.
            candidates.sort_by_key(|a| (std::cmp::Reverse(a.effective_end()), !is_manual(a), a.id.clone()));
            let (keep, rest) = candidates.split_first().expect("non-empty bucket");
            entry.kept_end_id = Some(keep.id.clone());
            for a in rest {
                deleted_ids.push(a.id.clone());
                entry.removed_ids.push(a.id.clone());
            }
        }

        entries.push(entry);
    }

    deleted_ids.sort();
    deleted_ids.dedup();
    entries.sort_by(|a, b| a.owner.cmp(&b.owner).then(a.day.cmp(&b.day)));

    CleanupReport { deleted_ids, entries }
}
