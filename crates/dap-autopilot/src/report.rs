//! `ApplyReport` — the `{upserts, deletedIds, touchedIds}` triple every
//! public entry point returns (spec §6).

use std::collections::BTreeSet;

use dap_activity::Activity;

/// Result of one `apply`/`apply_worktime_compliance` call (spec §6).
///
/// Derives `Debug`/`PartialEq`/`Clone` matching the teacher's plain-data-
/// return style (SPEC_FULL.md §7: "no wrapper type beyond what's needed").
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApplyReport {
    /// Every activity whose representation changed, plus every synthesized
    /// managed activity (spec §6).
    pub upserts: Vec<Activity>,
    /// Every id the caller should remove: superseded boundaries, orphaned
    /// managed activities (spec §6).
    pub deleted_ids: Vec<String>,
    /// The union of upsert ids and deleted ids (spec §6).
    pub touched_ids: Vec<String>,
}

impl ApplyReport {
    pub(crate) fn build(upserts: Vec<Activity>, deleted_ids: Vec<String>) -> Self {
        let mut touched: BTreeSet<String> = deleted_ids.iter().cloned().collect();
        touched.extend(upserts.iter().map(|a| a.id.clone()));
        Self { upserts, deleted_ids, touched_ids: touched.into_iter().collect() }
    }
}
