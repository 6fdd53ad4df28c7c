//! Shared pipeline plumbing behind every public entry point (spec §2, §6).
//!
//! `apply` and `apply_worktime_compliance` both normalize, group, and run
//! the compliance layer; only `apply` additionally runs the autoframer
//! (spec §6: `apply_worktime_compliance` "does not synthesize managed
//! activities"). Factoring the shared stages here keeps that difference to
//! one call site instead of two near-duplicate pipelines.

use std::collections::{BTreeMap, BTreeSet};

use dap_activity::{Activity, Duty};
use dap_config::{CatalogStore, ResolvedConfig, RuleStore};
use dap_core::{Owner, ServiceId, Stage};
use dap_masterdata::{HomeDepot, MasterDataStore, WalkTimeIndex};

use crate::error::AutopilotResult;
use crate::report::ApplyReport;

/// Fetch rule params + catalog snapshot and run the type resolver (spec
/// §4.1). The only `await` point a caller's `RuleStore`/`CatalogStore`
/// trait objects are touched at (spec §5).
pub(crate) async fn resolve_config(
    rule_store: &dyn RuleStore,
    catalog_store: &dyn CatalogStore,
    stage: Stage,
    variant_id: &str,
) -> AutopilotResult<ResolvedConfig> {
    let config = dap_config::resolve_config(rule_store, catalog_store, stage, variant_id).await?;
    tracing::debug!(%stage, variant_id, summary = %config.summary(), "resolved configuration");
    Ok(config)
}

async fn depot_for_owner(
    master_data: &dyn MasterDataStore,
    owner: &Owner,
) -> AutopilotResult<Option<HomeDepot>> {
    let Some(depot_id) = master_data.home_depot_id_for(owner).await? else {
        return Ok(None);
    };
    Ok(master_data.home_depot(&depot_id).await?)
}

/// The in-memory working set carried across pipeline stages: the activity
/// map (keyed by id, spec §2), the duty index the grouper built, and the
/// accumulating set of ids to delete.
pub(crate) struct GroupedState {
    pub working: BTreeMap<String, Activity>,
    pub duties: BTreeMap<ServiceId, Duty>,
    pub deleted_ids: BTreeSet<String>,
}

/// Run the Metadata Normalizer (spec §4.2) then the Grouper (spec §4.3).
///
/// Discarded drag-and-drop-leftover managed ids (spec §4.3) join
/// `deleted_ids` immediately; unowned ids are left untouched in `working`
/// per spec §7 ("unknown owner kind ... preserved").
pub(crate) fn normalize_and_group(
    activities: Vec<Activity>,
    stage: Stage,
    config: &ResolvedConfig,
) -> GroupedState {
    let mut working: BTreeMap<String, Activity> =
        activities.into_iter().map(|a| (a.id.clone(), a)).collect();

    dap_grouping::normalize(&mut working, config);
    let grouping = dap_grouping::group(&mut working, stage, config);

    tracing::debug!(
        duties = grouping.duties.len(),
        discarded = grouping.discarded_managed_ids.len(),
        unowned = grouping.unowned_ids.len(),
        "grouping complete"
    );

    let deleted_ids: BTreeSet<String> = grouping.discarded_managed_ids.into_iter().collect();
    GroupedState { working, duties: grouping.duties, deleted_ids }
}

/// Run the autoframer (spec §4.4) over every duty in `state`, writing
/// synthesized managed activities into `state.working` and accumulating
/// stale ids into `state.deleted_ids`.
///
/// A duty whose grouped activities are entirely managed (no surviving
/// payload — e.g. the payload that anchored it was deleted upstream) has no
/// window to frame; every managed activity it still owns is orphaned and
/// deleted instead (spec §4.4: boundary/break/commute activities only exist
/// to serve payload).
pub(crate) async fn autoframe_all(
    master_data: &dyn MasterDataStore,
    state: &mut GroupedState,
    config: &ResolvedConfig,
    walk_times: &WalkTimeIndex,
) -> AutopilotResult<()> {
    let service_ids: Vec<ServiceId> = state.duties.keys().cloned().collect();

    for service_id in service_ids {
        let duty = state.duties.get(&service_id).expect("service_id from own key set").clone();
        let duty_activities: Vec<Activity> =
            duty.activity_ids.iter().filter_map(|id| state.working.get(id).cloned()).collect();

        let payload_ids: Vec<String> =
            duty_activities.iter().filter(|a| !a.is_managed()).map(|a| a.id.clone()).collect();

        if payload_ids.is_empty() {
            for a in duty_activities.iter().filter(|a| a.is_managed()) {
                state.deleted_ids.insert(a.id.clone());
            }
            continue;
        }

        let depot = depot_for_owner(master_data, &duty.owner).await?;
        let refs: Vec<&Activity> = duty_activities.iter().collect();
        let result = dap_autoframe::autoframe_duty(
            &service_id,
            duty.owner.kind,
            &duty.owner.resource_id,
            &refs,
            config,
            depot.as_ref(),
            walk_times,
        );

        tracing::debug!(
            %service_id,
            upserts = result.upserts.len(),
            deleted = result.deleted_ids.len(),
            "autoframed duty"
        );

        let mut new_ids = payload_ids;
        new_ids.extend(result.managed_ids.iter().cloned());

        for a in result.upserts {
            state.working.insert(a.id.clone(), a);
        }
        for id in result.deleted_ids {
            state.deleted_ids.insert(id);
        }

        let duty_mut = state.duties.get_mut(&service_id).expect("service_id from own key set");
        duty_mut.activity_ids = new_ids;
    }

    for id in &state.deleted_ids {
        state.working.remove(id);
    }
    Ok(())
}

/// Run the three whole-input compliance passes (spec §4.5): local
/// conflicts, home-depot re-selection, and AZG rolling-window rules.
pub(crate) async fn run_compliance(
    master_data: &dyn MasterDataStore,
    state: &mut GroupedState,
    config: &ResolvedConfig,
    variant_id: &str,
    walk_times: &WalkTimeIndex,
) -> AutopilotResult<()> {
    dap_compliance::recompute_local_conflicts(&mut state.working);

    let duties: Vec<Duty> = state.duties.values().cloned().collect();

    let mut depot_by_owner: BTreeMap<String, HomeDepot> = BTreeMap::new();
    for duty in &duties {
        if depot_by_owner.contains_key(&duty.owner.resource_id) {
            continue;
        }
        if let Some(depot) = depot_for_owner(master_data, &duty.owner).await? {
            depot_by_owner.insert(duty.owner.resource_id.clone(), depot);
        }
    }
    dap_compliance::recompute_home_depot_compliance(&duties, &mut state.working, &depot_by_owner, walk_times);
    dap_compliance::recompute_azg_compliance(
        &duties,
        &mut state.working,
        &config.bounds,
        &config.azg,
        variant_id,
        &config.configured_extra_rest_dates,
    );

    tracing::debug!(duties = duties.len(), "compliance passes complete");
    Ok(())
}

/// Diff `state.working` against the pre-pipeline snapshot (spec §6):
/// upserts are every activity whose value changed (a brand-new synthesized
/// activity trivially counts, since it has no prior entry to equal) plus
/// every id deleted along the way.
pub(crate) fn build_report(original: &BTreeMap<String, Activity>, state: GroupedState) -> ApplyReport {
    let mut upserts: Vec<Activity> = Vec::new();
    for (id, activity) in state.working {
        if original.get(&id) != Some(&activity) {
            upserts.push(activity);
        }
    }
    upserts.sort_by(|a, b| a.id.cmp(&b.id));

    let mut deleted_ids: Vec<String> = state.deleted_ids.into_iter().collect();
    deleted_ids.sort();

    ApplyReport::build(upserts, deleted_ids)
}
