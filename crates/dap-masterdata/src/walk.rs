//! Walk-time index: pedestrian duration between two transfer nodes (spec
//! §4.4.3). Small and dense enough that a plain hash map beats the CSR graph
//! `dt_spatial::RoadNetwork` uses for car routing — the autopilot never
//! needs multi-hop shortest paths here, only direct edge lookups.

use std::collections::HashMap;

use crate::node::TransferNode;

/// A keyed table of precomputed pedestrian walk times in minutes.
///
/// Edges are directed internally but [`WalkTimeIndex::insert_bidirectional`]
/// populates both directions at once, matching the "bidirectional edges
/// populate both directions" rule in spec §4.4.3.
#[derive(Clone, Debug, Default)]
pub struct WalkTimeIndex {
    minutes: HashMap<(TransferNode, TransferNode), i64>,
}

impl WalkTimeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_directed(&mut self, from: TransferNode, to: TransferNode, minutes: i64) {
        self.minutes.insert((from, to), minutes);
    }

    pub fn insert_bidirectional(&mut self, a: TransferNode, b: TransferNode, minutes: i64) {
        self.minutes.insert((a.clone(), b.clone()), minutes);
        self.minutes.insert((b, a), minutes);
    }

    /// Walk time in minutes between two nodes, or `None` if no edge exists.
    pub fn walk_time_minutes(&self, from: &TransferNode, to: &TransferNode) -> Option<i64> {
        if from == to {
            return Some(0);
        }
        self.minutes.get(&(from.clone(), to.clone())).copied()
    }

    pub fn len(&self) -> usize {
        self.minutes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minutes.is_empty()
    }
}
