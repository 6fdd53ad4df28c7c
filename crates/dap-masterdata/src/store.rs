//! `MasterDataStore`: the external collaborator yielding personnel,
//! vehicles, home depots, personnel sites, operational points, and
//! transfer-edge walk times (spec §1).

use std::collections::HashMap;

use async_trait::async_trait;

use dap_core::Owner;

use crate::depot::HomeDepot;
use crate::error::MasterDataResult;
use crate::node::TransferNode;
use crate::walk::WalkTimeIndex;

/// A personnel resource. Only the fields the autopilot itself consults are
/// modeled; anything else about a person lives in the caller's own system.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Personnel {
    pub id: String,
    pub home_depot_id: Option<String>,
}

/// A vehicle resource.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vehicle {
    pub id: String,
    pub home_depot_id: Option<String>,
}

/// External collaborator yielding master data and walk times (spec §1). The
/// autopilot never mutates master data.
#[async_trait]
pub trait MasterDataStore: Send + Sync {
    /// The home depot id for `owner`'s resource pool, or `None` if the owner
    /// has no assigned depot.
    async fn home_depot_id_for(&self, owner: &Owner) -> MasterDataResult<Option<String>>;

    /// Fetch a depot by id.
    async fn home_depot(&self, depot_id: &str) -> MasterDataResult<Option<HomeDepot>>;

    /// A snapshot of the walk-time index, fetched once per call (spec §5).
    async fn walk_times(&self) -> MasterDataResult<WalkTimeIndex>;
}

/// In-memory `MasterDataStore`, used by tests and small embedding callers
/// (mirrors [`crate::depot::HomeDepot`]'s sibling `StaticCatalogStore` in
/// `dap-config`).
#[derive(Clone, Debug, Default)]
pub struct StaticMasterDataStore {
    personnel: HashMap<String, Personnel>,
    vehicles: HashMap<String, Vehicle>,
    depots: HashMap<String, HomeDepot>,
    walk_times: WalkTimeIndex,
}

impl StaticMasterDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_personnel(mut self, p: Personnel) -> Self {
        self.personnel.insert(p.id.clone(), p);
        self
    }

    pub fn with_vehicle(mut self, v: Vehicle) -> Self {
        self.vehicles.insert(v.id.clone(), v);
        self
    }

    pub fn with_depot(mut self, depot: HomeDepot) -> Self {
        self.depots.insert(depot.id.clone(), depot);
        self
    }

    pub fn with_walk_time(mut self, a: TransferNode, b: TransferNode, minutes: i64) -> Self {
        self.walk_times.insert_bidirectional(a, b, minutes);
        self
    }
}

#[async_trait]
impl MasterDataStore for StaticMasterDataStore {
    async fn home_depot_id_for(&self, owner: &Owner) -> MasterDataResult<Option<String>> {
        let id = match owner.kind {
            dap_core::OwnerKind::Personnel => {
                self.personnel.get(&owner.resource_id).and_then(|p| p.home_depot_id.clone())
            }
            dap_core::OwnerKind::Vehicle => {
                self.vehicles.get(&owner.resource_id).and_then(|v| v.home_depot_id.clone())
            }
        };
        Ok(id)
    }

    async fn home_depot(&self, depot_id: &str) -> MasterDataResult<Option<HomeDepot>> {
        Ok(self.depots.get(depot_id).cloned())
    }

    async fn walk_times(&self) -> MasterDataResult<WalkTimeIndex> {
        Ok(self.walk_times.clone())
    }
}
