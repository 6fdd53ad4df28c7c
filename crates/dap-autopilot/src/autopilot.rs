//! `Autopilot` — the public orchestrator (spec §6).
//!
//! Owns the three external-collaborator trait objects (spec §1) and exposes
//! the four entry points as async methods, matching the "single `await` to
//! fetch config, synchronous after that" contract of spec §5 for `apply`
//! and `apply_worktime_compliance` (both still `await` the `MasterDataStore`
//! per duty for depot lookups — spec §5 only promises the pipeline itself
//! has no internal suspension points, not that external stores are fetched
//! exactly once).

use std::collections::BTreeMap;

use dap_activity::Activity;
use dap_config::{CatalogStore, RuleStore};
use dap_core::Stage;
use dap_masterdata::MasterDataStore;

use crate::cleanup::{self, CleanupReport};
use crate::error::AutopilotResult;
use crate::normalize_ids::{self, NormalizeReport};
use crate::pipeline;
use crate::report::ApplyReport;

/// The duty-autopilot orchestrator. Construct via [`crate::AutopilotBuilder`].
pub struct Autopilot {
    pub(crate) rule_store: Box<dyn RuleStore>,
    pub(crate) catalog_store: Box<dyn CatalogStore>,
    pub(crate) master_data: Box<dyn MasterDataStore>,
}

impl Autopilot {
    /// The primary entry point (spec §6): group into duties, synthesize
    /// managed activities, run compliance, and emit the upsert/delete/touch
    /// diff.
    pub async fn apply(
        &self,
        stage: Stage,
        variant_id: &str,
        activities: Vec<Activity>,
    ) -> AutopilotResult<ApplyReport> {
        let config =
            pipeline::resolve_config(self.rule_store.as_ref(), self.catalog_store.as_ref(), stage, variant_id)
                .await?;
        let walk_times = self.master_data.walk_times().await?;
        let original: BTreeMap<String, Activity> =
            activities.iter().map(|a| (a.id.clone(), a.clone())).collect();

        let mut state = pipeline::normalize_and_group(activities, stage, &config);
        pipeline::autoframe_all(self.master_data.as_ref(), &mut state, &config, &walk_times).await?;
        pipeline::run_compliance(self.master_data.as_ref(), &mut state, &config, variant_id, &walk_times).await?;

        Ok(pipeline::build_report(&original, state))
    }

    /// Re-runs only the compliance passes (spec §6): does not synthesize
    /// managed activities, but still groups the input into duties so the
    /// per-duty compliance passes (home-depot, AZG) know duty membership.
    pub async fn apply_worktime_compliance(
        &self,
        stage: Stage,
        variant_id: &str,
        activities: Vec<Activity>,
    ) -> AutopilotResult<Vec<Activity>> {
        let config =
            pipeline::resolve_config(self.rule_store.as_ref(), self.catalog_store.as_ref(), stage, variant_id)
                .await?;
        let walk_times = self.master_data.walk_times().await?;
        let original: BTreeMap<String, Activity> =
            activities.iter().map(|a| (a.id.clone(), a.clone())).collect();

        let mut state = pipeline::normalize_and_group(activities, stage, &config);
        pipeline::run_compliance(self.master_data.as_ref(), &mut state, &config, variant_id, &walk_times).await?;

        Ok(pipeline::build_report(&original, state).upserts)
    }

    /// Enforces one start/end boundary per `(owner, dayKey)` (spec §6).
    pub async fn cleanup_service_boundaries(
        &self,
        stage: Stage,
        variant_id: &str,
        activities: Vec<Activity>,
    ) -> AutopilotResult<CleanupReport> {
        let config =
            pipeline::resolve_config(self.rule_store.as_ref(), self.catalog_store.as_ref(), stage, variant_id)
                .await?;
        Ok(cleanup::cleanup_service_boundaries(&activities, stage, &config))
    }

    /// Rewrites managed activity ids to the canonical form (spec §6). Pure
    /// and synchronous: canonicalizing an id only needs the activity's own
    /// `serviceId` and role flags, never the config/catalog/master-data
    /// snapshots.
    pub fn normalize_managed_service_activities(&self, activities: Vec<Activity>) -> NormalizeReport {
        normalize_ids::normalize_managed_service_activities(activities)
    }
}
