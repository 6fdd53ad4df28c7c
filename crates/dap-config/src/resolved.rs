//! `ResolvedConfig` — the materialized, typed configuration snapshot
//! (spec §3).

use std::collections::BTreeSet;

use dap_core::ActivityTypeId;

use crate::azg::AzgConfig;

/// Numeric bounds used throughout the autoframer and compliance layer.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub max_work_minutes: i64,
    pub max_continuous_work_minutes: i64,
    pub min_break_minutes: i64,
    pub min_short_break_minutes: i64,
    pub max_duty_span_minutes: i64,
    pub max_conflict_level: u8,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            max_work_minutes: 600,
            max_continuous_work_minutes: 360,
            min_break_minutes: 30,
            min_short_break_minutes: 15,
            max_duty_span_minutes: 720,
            max_conflict_level: 2,
        }
    }
}

/// The fully materialized configuration for one `apply` call (spec §3).
///
/// Built once per call by [`crate::resolver::resolve_config`] from a
/// [`crate::RawRuleParams`] plus the catalog snapshot, then treated as an
/// immutable read-only borrow for the rest of the pipeline (spec §5).
#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub bounds: Bounds,

    pub break_type_ids: Vec<ActivityTypeId>,
    pub short_break_type_id: ActivityTypeId,
    pub commute_type_id: ActivityTypeId,

    pub personnel_start_type_id: ActivityTypeId,
    pub personnel_end_type_id: ActivityTypeId,
    pub vehicle_start_type_id: ActivityTypeId,
    pub vehicle_end_type_id: ActivityTypeId,

    pub azg: AzgConfig,

    /// `configured_extra_rest_dates` escape hatch for the AZG Sunday-like
    /// rest day computation (SPEC_FULL.md §5.4 — resolves the spec's
    /// "configured extras" Open Question).
    pub configured_extra_rest_dates: Vec<chrono::NaiveDate>,
}

impl ResolvedConfig {
    /// Union of all start and end type ids (spec §4.1: "boundaryTypeIds").
    pub fn boundary_type_ids(&self) -> BTreeSet<ActivityTypeId> {
        [
            self.personnel_start_type_id.clone(),
            self.personnel_end_type_id.clone(),
            self.vehicle_start_type_id.clone(),
            self.vehicle_end_type_id.clone(),
        ]
        .into_iter()
        .collect()
    }

    pub fn start_type_ids(&self) -> BTreeSet<ActivityTypeId> {
        [self.personnel_start_type_id.clone(), self.vehicle_start_type_id.clone()]
            .into_iter()
            .collect()
    }

    /// The canonical type id to stamp on a newly synthesized regular break
    /// (spec §4.4.5). `break_type_ids` is sorted ascending and guaranteed
    /// non-empty by the resolver, so the first entry is the deterministic
    /// pick.
    pub fn primary_break_type_id(&self) -> &ActivityTypeId {
        &self.break_type_ids[0]
    }

    pub fn end_type_ids(&self) -> BTreeSet<ActivityTypeId> {
        [self.personnel_end_type_id.clone(), self.vehicle_end_type_id.clone()]
            .into_iter()
            .collect()
    }

    /// One-line human-readable report of which type id was picked per role
    /// (SPEC_FULL.md §5.1). Useful for operator logging.
    pub fn summary(&self) -> String {
        format!(
            "personnel[start={}, end={}] vehicle[start={}, end={}] short_break={} commute={}",
            self.personnel_start_type_id,
            self.personnel_end_type_id,
            self.vehicle_start_type_id,
            self.vehicle_end_type_id,
            self.short_break_type_id,
            self.commute_type_id,
        )
    }
}
