//! Transfer-node key grammar used by the walk-time index (spec §4.4.3):
//! `OP:<id>`, `PERSONNEL_SITE:<id>`, `REPLACEMENT_STOP:<id>`.

use std::fmt;

/// One endpoint of a walk-time edge.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransferNode {
    OperationalPoint(String),
    PersonnelSite(String),
    ReplacementStop(String),
}

impl TransferNode {
    pub fn op(id: impl Into<String>) -> Self {
        TransferNode::OperationalPoint(id.into())
    }

    pub fn personnel_site(id: impl Into<String>) -> Self {
        TransferNode::PersonnelSite(id.into())
    }

    pub fn replacement_stop(id: impl Into<String>) -> Self {
        TransferNode::ReplacementStop(id.into())
    }
}

impl fmt::Display for TransferNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferNode::OperationalPoint(id) => write!(f, "OP:{id}"),
            TransferNode::PersonnelSite(id) => write!(f, "PERSONNEL_SITE:{id}"),
            TransferNode::ReplacementStop(id) => write!(f, "REPLACEMENT_STOP:{id}"),
        }
    }
}
