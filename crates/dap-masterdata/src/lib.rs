//! Master data and the transfer-edge walk-time index (spec §1, §4.4.3).
//!
//! The autopilot treats everything here as a read-only snapshot fetched once
//! at the start of `apply` (spec §5) — implementations should hand back an
//! immutable view, the same contract `dt_spatial::RoadNetwork` gives the
//! mobility engine.

pub mod depot;
pub mod error;
pub mod node;
pub mod store;
pub mod walk;

#[cfg(test)]
mod tests;

pub use depot::HomeDepot;
pub use error::{MasterDataError, MasterDataResult};
pub use node::TransferNode;
pub use store::{MasterDataStore, Personnel, StaticMasterDataStore, Vehicle};
pub use walk::WalkTimeIndex;
