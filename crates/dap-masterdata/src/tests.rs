use dap_core::{Owner, OwnerKind};

use crate::depot::HomeDepot;
use crate::node::TransferNode;
use crate::store::{MasterDataStore, Personnel, StaticMasterDataStore};
use crate::walk::WalkTimeIndex;

#[test]
fn walk_time_is_symmetric_for_bidirectional_edges() {
    let mut idx = WalkTimeIndex::new();
    idx.insert_bidirectional(TransferNode::op("A"), TransferNode::personnel_site("B"), 7);

    assert_eq!(idx.walk_time_minutes(&TransferNode::op("A"), &TransferNode::personnel_site("B")), Some(7));
    assert_eq!(idx.walk_time_minutes(&TransferNode::personnel_site("B"), &TransferNode::op("A")), Some(7));
}

#[test]
fn walk_time_is_zero_for_identical_nodes() {
    let idx = WalkTimeIndex::new();
    let n = TransferNode::op("A");
    assert_eq!(idx.walk_time_minutes(&n, &n), Some(0));
}

#[test]
fn missing_edge_returns_none() {
    let idx = WalkTimeIndex::new();
    assert_eq!(idx.walk_time_minutes(&TransferNode::op("A"), &TransferNode::op("Z")), None);
}

#[test]
fn depot_site_role_lookups() {
    let mut depot = HomeDepot::new("DEPOT-1");
    depot.site_ids.insert("SITE-1".into());
    depot.break_site_ids.insert("SITE-2".into());

    assert!(depot.allows_start_end("SITE-1"));
    assert!(!depot.allows_start_end("SITE-2"));
    assert!(depot.allows_break("SITE-2"));
    assert!(!depot.allows_overnight("SITE-1"));
}

#[tokio::test]
async fn static_store_resolves_home_depot_for_owner() {
    let store = StaticMasterDataStore::new()
        .with_personnel(Personnel { id: "PS-1".into(), home_depot_id: Some("DEPOT-1".into()) })
        .with_depot(HomeDepot::new("DEPOT-1"));

    let owner = Owner::new("PS-1", OwnerKind::Personnel);
    let depot_id = store.home_depot_id_for(&owner).await.unwrap();
    assert_eq!(depot_id.as_deref(), Some("DEPOT-1"));

    let depot = store.home_depot("DEPOT-1").await.unwrap();
    assert!(depot.is_some());
}

#[tokio::test]
async fn static_store_returns_none_for_unknown_owner() {
    let store = StaticMasterDataStore::new();
    let owner = Owner::new("PS-unknown", OwnerKind::Personnel);
    assert_eq!(store.home_depot_id_for(&owner).await.unwrap(), None);
}
