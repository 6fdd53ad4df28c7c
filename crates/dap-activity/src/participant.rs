//! Activity participants and owner resolution (spec §3).

use dap_core::{Owner, OwnerKind, ParticipantKind};

/// One `{resourceId, kind, role?}` entry on an activity's participant list.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Participant {
    pub resource_id: String,
    pub kind: ParticipantKind,
    pub role: Option<String>,
}

impl Participant {
    pub fn new(resource_id: impl Into<String>, kind: ParticipantKind) -> Self {
        Self { resource_id: resource_id.into(), kind, role: None }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn owner_kind(&self) -> OwnerKind {
        self.kind.owner_kind()
    }
}

/// Resolve the owning [`Owner`] from a participant list.
///
/// Service-kind participants (`PersonnelService`/`VehicleService`) take
/// precedence over plain `Personnel`/`Vehicle` ones (spec §3). The first
/// matching participant in list order wins within a precedence tier.
pub fn resolve_owner(participants: &[Participant]) -> Option<Owner> {
    participants
        .iter()
        .find(|p| p.kind.is_service())
        .or_else(|| participants.iter().find(|p| !p.kind.is_service()))
        .map(|p| Owner::new(p.resource_id.clone(), p.owner_kind()))
}
