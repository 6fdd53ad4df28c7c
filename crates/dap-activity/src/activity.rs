//! `Activity` — the universal record (spec §3).

use chrono::{DateTime, Utc};

use dap_core::{ManagedId, Owner, ParticipantKind, ServiceId};

use crate::attributes::ActivityAttributes;
use crate::participant::{resolve_owner, Participant};

/// `serviceRole` (spec §3): `start | end | segment | null`. Boundaries may
/// also be recognized purely by catalog type flags, independent of this
/// field — see `dap-config::resolved::ResolvedConfig::boundary_type_ids`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ServiceRole {
    Start,
    End,
    Segment,
    #[default]
    None,
}

/// The universal activity record (spec §3). Every field besides `id`/`start`
/// is optional.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Activity {
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub type_id: dap_core::ActivityTypeId,

    pub from: Option<String>,
    pub to: Option<String>,
    pub location_id: Option<String>,
    pub location_label: Option<String>,

    pub participants: Vec<Participant>,

    /// Backend-owned duty identifier. `None` on payload activities after the
    /// autopilot runs; `Some` only on managed (boundary/break/commute)
    /// activities (spec §3 invariant).
    pub service_id: Option<ServiceId>,
    pub service_role: ServiceRole,

    pub attributes: ActivityAttributes,
}

impl Activity {
    pub fn new(id: impl Into<String>, start: DateTime<Utc>, type_id: impl Into<dap_core::ActivityTypeId>) -> Self {
        Self {
            id: id.into(),
            start,
            end: None,
            type_id: type_id.into(),
            from: None,
            to: None,
            location_id: None,
            location_label: None,
            participants: Vec::new(),
            service_id: None,
            service_role: ServiceRole::None,
            attributes: ActivityAttributes::new(),
        }
    }

    /// Duration in minutes. Falls back to `attributes.default_duration`,
    /// then to zero, when `end` is absent (spec §3).
    pub fn duration_minutes(&self) -> i64 {
        match self.end {
            Some(end) => (end - self.start).num_minutes().max(0),
            None => self.attributes.default_duration.unwrap_or(0),
        }
    }

    /// The effective end instant, applying the same `end`/`default_duration`
    /// fallback as [`Activity::duration_minutes`].
    pub fn effective_end(&self) -> DateTime<Utc> {
        match self.end {
            Some(end) => end,
            None => self.start + chrono::Duration::minutes(self.attributes.default_duration.unwrap_or(0)),
        }
    }

    /// Start-location resolution order: `locationId → from → locationLabel →
    /// to` (spec §3).
    pub fn start_location(&self) -> Option<&str> {
        self.location_id
            .as_deref()
            .or(self.from.as_deref())
            .or(self.location_label.as_deref())
            .or(self.to.as_deref())
    }

    /// End-location resolution: mirrored order, `locationId → to →
    /// locationLabel → from` (spec §3: "mirrored for end location").
    pub fn end_location(&self) -> Option<&str> {
        self.location_id
            .as_deref()
            .or(self.to.as_deref())
            .or(self.location_label.as_deref())
            .or(self.from.as_deref())
    }

    /// Resolve the owning [`Owner`] from this activity's participant list
    /// (spec §3).
    pub fn owner(&self) -> Option<Owner> {
        resolve_owner(&self.participants)
    }

    /// All owners referenced by this activity's participants, in list order,
    /// deduped by `(resource_id, kind)`. Used by the normalizer to shrink
    /// `service_by_owner` to "the owners actually listed on the activity"
    /// (spec §4.2).
    pub fn all_owners(&self) -> Vec<Owner> {
        let mut seen = std::collections::HashSet::new();
        let mut owners = Vec::new();
        for p in &self.participants {
            let owner = Owner::new(p.resource_id.clone(), p.owner_kind());
            let key = (owner.resource_id.clone(), owner.kind);
            if seen.insert(key) {
                owners.push(owner);
            }
        }
        owners
    }

    /// `true` if `self.participants` contains a service-kind participant
    /// (spec §3: service-kind participants take precedence over plain
    /// personnel/vehicle).
    pub fn has_service_participant(&self) -> bool {
        self.participants.iter().any(|p| p.kind.is_service())
    }

    pub fn is_service_kind(kind: ParticipantKind) -> bool {
        kind.is_service()
    }

    /// Parse `self.id` as a [`ManagedId`], if it matches the managed-id
    /// grammar (spec §6). Payload ids never parse successfully.
    pub fn managed_id(&self) -> Option<ManagedId> {
        self.id.parse().ok()
    }

    pub fn is_managed(&self) -> bool {
        self.managed_id().is_some()
    }
}
