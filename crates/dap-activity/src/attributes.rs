//! `ActivityAttributes` — the typed re-modeling of the ambient `attributes`
//! free-form map (spec §3, spec §9 "Attributes as tagged records").

use std::collections::BTreeMap;

use dap_core::{Code, ServiceId, Severity};

/// `is_within_service` filter value (spec §3). Default is `Both`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WithinService {
    Within,
    Outside,
    #[default]
    Both,
}

/// One entry of `attributes.service_by_owner` (spec §3): what a single owner
/// sees written back onto a shared activity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceByOwnerEntry {
    pub service_id: Option<ServiceId>,
    pub conflict_level: Severity,
    pub conflict_codes: Vec<Code>,
    pub conflict_details: BTreeMap<String, Vec<String>>,
}

impl ServiceByOwnerEntry {
    pub fn new(service_id: Option<ServiceId>) -> Self {
        Self { service_id, ..Default::default() }
    }

    /// Merge `other`'s conflict data into `self`: union codes/levels, merge
    /// detail hint lists (deduped + sorted), matching the writeback rule in
    /// spec §4.4.7.
    pub fn merge_conflicts(&mut self, codes: Vec<Code>, details: BTreeMap<String, Vec<String>>) {
        self.conflict_codes.extend(codes);
        self.conflict_codes.sort();
        self.conflict_codes.dedup();
        self.conflict_level = dap_core::code::union_severity(&self.conflict_codes, Severity::Error);
        for (code, hints) in details {
            let entry = self.conflict_details.entry(code).or_default();
            entry.extend(hints);
            entry.sort();
            entry.dedup();
        }
    }

    /// Discard all codes/details whose code satisfies `predicate`, then
    /// recompute the level from the remainder. Used by the home-depot
    /// compliance pass, which "purges only HOME_DEPOT_*/WALK_TIME_* codes
    /// before merging new findings, preserving other codes" (spec §4.5).
    pub fn retain_codes(&mut self, mut predicate: impl FnMut(&Code) -> bool) {
        self.conflict_codes.retain(|c| predicate(c));
        // Details are keyed by the code's string form; drop entries whose
        // code no longer survives in `conflict_codes`.
        let surviving: std::collections::BTreeSet<String> =
            self.conflict_codes.iter().map(|c| c.as_str().to_string()).collect();
        self.conflict_details.retain(|code, _| surviving.contains(code));
        self.conflict_level = dap_core::code::union_severity(&self.conflict_codes, Severity::Error);
    }
}

/// The typed re-modeling of spec §3's `attributes` map. Every reserved key
/// becomes a named field; anything else lands in `extras`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivityAttributes {
    pub service_by_owner: BTreeMap<String, ServiceByOwnerEntry>,
    pub service_conflict_level: Severity,
    pub service_conflict_codes: Vec<Code>,
    pub service_conflict_details: BTreeMap<String, Vec<String>>,

    pub manual_service_boundary: bool,
    pub is_within_service: WithinService,

    pub is_break: bool,
    pub is_short_break: bool,
    pub is_commute: bool,
    pub is_overnight: bool,
    pub is_absence: bool,
    pub is_service_start: bool,
    pub is_service_end: bool,
    pub consider_capacity_conflicts: bool,
    pub consider_location_conflicts: bool,
    pub default_duration: Option<i64>,

    /// Residual bag for anything the caller wrote that this crate does not
    /// interpret. Round-trips unmodified.
    pub extras: serde_json::Map<String, serde_json::Value>,
}

impl ActivityAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute `service_conflict_level`/`codes`/`details` as the union
    /// across `service_by_owner` entries (spec §4.4.7: "the global
    /// `service_conflict_level` is the max across owner entries;
    /// `service_conflict_codes` is the union; details are merged").
    pub fn recompute_global_conflicts(&mut self) {
        let mut codes: Vec<Code> = Vec::new();
        let mut details: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for entry in self.service_by_owner.values() {
            codes.extend(entry.conflict_codes.iter().cloned());
            for (code, hints) in &entry.conflict_details {
                let slot = details.entry(code.clone()).or_default();
                slot.extend(hints.iter().cloned());
            }
        }
        self.service_conflict_codes = dap_core::code::canonicalize_codes(codes);
        for hints in details.values_mut() {
            hints.sort();
            hints.dedup();
        }
        self.service_conflict_details = details;
        self.service_conflict_level =
            dap_core::code::union_severity(&self.service_conflict_codes, Severity::Error);
    }
}
