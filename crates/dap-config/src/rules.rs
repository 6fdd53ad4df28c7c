//! Rule store: the external collaborator yielding raw, stage+variant-scoped
//! rule parameters (spec §1, "RuleStore").

use async_trait::async_trait;
use dap_core::{ActivityTypeId, OwnerKind, Stage};

use crate::azg::AzgConfig;
use crate::error::CatalogResult;
use crate::resolved::Bounds;

/// Explicit type-id overrides per boundary role, keyed by owner group
/// (spec §4.1, preference tier (a)).
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeOverrides {
    pub personnel_start: Option<ActivityTypeId>,
    pub personnel_end: Option<ActivityTypeId>,
    pub vehicle_start: Option<ActivityTypeId>,
    pub vehicle_end: Option<ActivityTypeId>,
    pub short_break: Option<ActivityTypeId>,
    pub commute: Option<ActivityTypeId>,
}

impl TypeOverrides {
    pub fn for_boundary(&self, group: OwnerKind, is_start: bool) -> Option<&ActivityTypeId> {
        match (group, is_start) {
            (OwnerKind::Personnel, true) => self.personnel_start.as_ref(),
            (OwnerKind::Personnel, false) => self.personnel_end.as_ref(),
            (OwnerKind::Vehicle, true) => self.vehicle_start.as_ref(),
            (OwnerKind::Vehicle, false) => self.vehicle_end.as_ref(),
        }
    }
}

/// The raw, not-yet-resolved rule payload for one `(stage, variant)` scope.
///
/// This is the shape a `RuleStore` implementation loads from its backing
/// store (YAML/JSON/DB row) before the type resolver (spec §4.1) cross-
/// references it against the catalog to produce a [`crate::ResolvedConfig`].
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawRuleParams {
    pub bounds: Bounds,
    pub type_overrides: TypeOverrides,
    pub azg: AzgConfig,

    /// Jurisdiction-specific rest days (beyond the fixed Sunday/New Year/
    /// Christmas/Ascension set `is_sunday_like` always recognizes) that count
    /// toward `AZG_REST_SUNDAYS_YEAR_MIN` (spec §4.5). Supplied by the
    /// `RuleStore` backend; the resolver threads this straight through to
    /// `ResolvedConfig::configured_extra_rest_dates`.
    pub configured_extra_rest_dates: Vec<chrono::NaiveDate>,
}

/// External collaborator yielding a typed `DutyAutopilotConfig` keyed by
/// stage + variant (spec §1). The autopilot never mutates rules.
#[async_trait]
pub trait RuleStore: Send + Sync {
    async fn rule_params(&self, stage: Stage, variant_id: &str) -> CatalogResult<RawRuleParams>;
}
