//! Activity-type catalog: the external collaborator yielding boolean role
//! flags per activity type (spec §1, "CatalogStore").

use async_trait::async_trait;
use dap_core::{ActivityTypeId, Stage};

use crate::error::CatalogResult;

/// The seven roles the type resolver scans for (spec §4.1).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    ServiceStart,
    ServiceEnd,
    Break,
    ShortBreak,
    Commute,
    VehicleOn,
    VehicleOff,
}

/// One activity-type definition: its id plus the set of roles it is flagged
/// for. A type may carry more than one flag (e.g. a type can be both
/// `ServiceStart` and `VehicleOn` for a vehicle boundary type).
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogEntry {
    pub type_id: ActivityTypeId,
    pub roles: Vec<Role>,
}

impl CatalogEntry {
    pub fn new(type_id: impl Into<ActivityTypeId>, roles: impl Into<Vec<Role>>) -> Self {
        Self { type_id: type_id.into(), roles: roles.into() }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// External collaborator yielding the activity-type catalog for a given
/// stage (spec §1). The autopilot never mutates the catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All activity-type definitions visible to `stage`.
    async fn activity_types(&self, stage: Stage) -> CatalogResult<Vec<CatalogEntry>>;
}
