//! In-memory `CatalogStore`/`RuleStore` implementations, used by tests and
//! by small embedding callers that keep their configuration in process
//! memory rather than behind a database (mirrors the teacher's
//! `dt-behavior` static fixture stores).

use std::collections::HashMap;

use async_trait::async_trait;
use dap_core::Stage;

use crate::catalog::{CatalogEntry, CatalogStore};
use crate::error::{CatalogError, CatalogResult};
use crate::rules::{RawRuleParams, RuleStore};

#[derive(Clone, Debug, Default)]
pub struct StaticCatalogStore {
    entries_by_stage: HashMap<Stage, Vec<CatalogEntry>>,
}

impl StaticCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stage(mut self, stage: Stage, entries: Vec<CatalogEntry>) -> Self {
        self.entries_by_stage.insert(stage, entries);
        self
    }
}

#[async_trait]
impl CatalogStore for StaticCatalogStore {
    async fn activity_types(&self, stage: Stage) -> CatalogResult<Vec<CatalogEntry>> {
        self.entries_by_stage
            .get(&stage)
            .cloned()
            .ok_or_else(|| CatalogError::Unavailable(format!("no catalog fixture for {stage}")))
    }
}

#[derive(Clone, Debug, Default)]
pub struct StaticRuleStore {
    params_by_scope: HashMap<(Stage, String), RawRuleParams>,
}

impl StaticRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope(
        mut self,
        stage: Stage,
        variant_id: impl Into<String>,
        params: RawRuleParams,
    ) -> Self {
        self.params_by_scope.insert((stage, variant_id.into()), params);
        self
    }
}

#[async_trait]
impl RuleStore for StaticRuleStore {
    async fn rule_params(&self, stage: Stage, variant_id: &str) -> CatalogResult<RawRuleParams> {
        self.params_by_scope
            .get(&(stage, variant_id.to_string()))
            .cloned()
            .ok_or_else(|| {
                CatalogError::Unavailable(format!(
                    "no rule fixture for stage={stage} variant={variant_id}"
                ))
            })
    }
}
