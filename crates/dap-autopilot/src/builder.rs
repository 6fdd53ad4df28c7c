//! Fluent builder for constructing an [`Autopilot`] (SPEC_FULL.md §7,
//! mirroring `dt_sim::SimBuilder`'s "required inputs up front, `.build()`
//! at the end" shape — here there are no optional inputs, since all three
//! stores are mandatory collaborators (spec §1)).

use dap_config::{CatalogStore, RuleStore};
use dap_masterdata::MasterDataStore;

use crate::autopilot::Autopilot;

/// Builds an [`Autopilot`] from its three external collaborators (spec §1:
/// `RuleStore`, `MasterDataStore`, `CatalogStore`).
///
/// ```rust,ignore
/// use dap_autopilot::AutopilotBuilder;
///
/// let autopilot = AutopilotBuilder::new(rule_store, catalog_store, master_data).build();
/// let report = autopilot.apply(Stage::Base, "PROD-2025/26", activities).await?;
/// ```
pub struct AutopilotBuilder {
    rule_store: Box<dyn RuleStore>,
    catalog_store: Box<dyn CatalogStore>,
    master_data: Box<dyn MasterDataStore>,
}

impl AutopilotBuilder {
    pub fn new(
        rule_store: impl RuleStore + 'static,
        catalog_store: impl CatalogStore + 'static,
        master_data: impl MasterDataStore + 'static,
    ) -> Self {
        Self {
            rule_store: Box::new(rule_store),
            catalog_store: Box::new(catalog_store),
            master_data: Box::new(master_data),
        }
    }

    pub fn build(self) -> Autopilot {
        Autopilot {
            rule_store: self.rule_store,
            catalog_store: self.catalog_store,
            master_data: self.master_data,
        }
    }
}
