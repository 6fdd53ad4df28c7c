//! Activity-type resolver (spec §4.1): turns a [`RawRuleParams`] plus a
//! [`CatalogStore`] snapshot into a fully materialized [`ResolvedConfig`].
//!
//! Each boundary/break/commute role is resolved through three preference
//! tiers, in order:
//!   (a) an explicit override in [`TypeOverrides`] — trusted as-is;
//!   (b) a catalog type flagged for the role and NOT flagged for the
//!       opposing role (e.g. `ServiceStart` but not also `ServiceEnd`);
//!   (c) any catalog type flagged for the role at all.
//! The first tier to yield a candidate wins; ties within a tier break on
//! ascending `ActivityTypeId` for determinism. A role with no candidate in
//! any tier is mandatory and fails the whole resolve with
//! [`ConfigError::MissingRole`].

use dap_core::{ActivityTypeId, ConfigError, ConfigResult, Stage};

use crate::catalog::{CatalogEntry, CatalogStore, Role};
use crate::error::CatalogError;
use crate::resolved::ResolvedConfig;
use crate::rules::{RawRuleParams, RuleStore};

fn catalog_unavailable(e: CatalogError) -> ConfigError {
    ConfigError::InvalidParam(format!("catalog store unavailable: {e}"))
}

fn rules_unavailable(e: CatalogError) -> ConfigError {
    ConfigError::InvalidParam(format!("rule store unavailable: {e}"))
}

/// Picks the type id satisfying `role`, preferring one that does not also
/// carry `opposite` (tier b) over one that does (tier c). Entries are
/// scanned in ascending `type_id` order so the pick is deterministic.
fn pick_by_role(
    entries: &[CatalogEntry],
    role: Role,
    opposite: Option<Role>,
) -> Option<ActivityTypeId> {
    let mut sorted: Vec<&CatalogEntry> = entries.iter().filter(|e| e.has_role(role)).collect();
    sorted.sort_by(|a, b| a.type_id.0.cmp(&b.type_id.0));

    let exclusive = opposite.and_then(|opp| {
        sorted.iter().find(|e| !e.has_role(opp)).map(|e| e.type_id.clone())
    });

    exclusive.or_else(|| sorted.first().map(|e| e.type_id.clone()))
}

fn resolve_role(
    entries: &[CatalogEntry],
    override_id: Option<&ActivityTypeId>,
    role: Role,
    opposite: Option<Role>,
    role_name: &str,
) -> ConfigResult<ActivityTypeId> {
    if let Some(id) = override_id {
        return Ok(id.clone());
    }
    pick_by_role(entries, role, opposite)
        .ok_or_else(|| ConfigError::MissingRole(role_name.to_string()))
}

/// Resolves a full [`ResolvedConfig`] for `(stage, variant_id)` by fetching
/// the rule params and catalog snapshot and running the type resolver over
/// every mandatory role (spec §4.1, §3).
pub async fn resolve_config(
    rule_store: &dyn RuleStore,
    catalog_store: &dyn CatalogStore,
    stage: Stage,
    variant_id: &str,
) -> ConfigResult<ResolvedConfig> {
    let raw: RawRuleParams =
        rule_store.rule_params(stage, variant_id).await.map_err(rules_unavailable)?;
    let entries: Vec<CatalogEntry> =
        catalog_store.activity_types(stage).await.map_err(catalog_unavailable)?;

    let overrides = &raw.type_overrides;

    let personnel_start_type_id = resolve_role(
        &entries,
        overrides.personnel_start.as_ref(),
        Role::ServiceStart,
        Some(Role::ServiceEnd),
        "personnel_start",
    )?;
    let personnel_end_type_id = resolve_role(
        &entries,
        overrides.personnel_end.as_ref(),
        Role::ServiceEnd,
        Some(Role::ServiceStart),
        "personnel_end",
    )?;
    let vehicle_start_type_id = resolve_role(
        &entries,
        overrides.vehicle_start.as_ref(),
        Role::VehicleOn,
        Some(Role::VehicleOff),
        "vehicle_start",
    )?;
    let vehicle_end_type_id = resolve_role(
        &entries,
        overrides.vehicle_end.as_ref(),
        Role::VehicleOff,
        Some(Role::VehicleOn),
        "vehicle_end",
    )?;
    let short_break_type_id = resolve_role(
        &entries,
        overrides.short_break.as_ref(),
        Role::ShortBreak,
        None,
        "short_break",
    )?;
    let commute_type_id =
        resolve_role(&entries, overrides.commute.as_ref(), Role::Commute, None, "commute")?;

    let mut break_type_ids: Vec<ActivityTypeId> = entries
        .iter()
        .filter(|e| e.has_role(Role::Break))
        .map(|e| e.type_id.clone())
        .collect();
    if break_type_ids.is_empty() {
        return Err(ConfigError::MissingRole("break".to_string()));
    }
    break_type_ids.sort_by(|a, b| a.0.cmp(&b.0));
    break_type_ids.dedup();

    Ok(ResolvedConfig {
        bounds: raw.bounds,
        break_type_ids,
        short_break_type_id,
        commute_type_id,
        personnel_start_type_id,
        personnel_end_type_id,
        vehicle_start_type_id,
        vehicle_end_type_id,
        azg: raw.azg,
        configured_extra_rest_dates: raw.configured_extra_rest_dates,
    })
}
