//! Managed-id grammar and owner/stage identifiers.
//!
//! # Design
//!
//! The original system encodes `(stage, ownerId, day)` directly into a
//! string id (`svc:<stage>:<ownerId>:<YYYY-MM-DD>`), which couples identity
//! to data — renaming a stage or reparenting an owner changes the id. Per
//! the "Managed-id aliasing" design note, `ServiceId` is modeled as an
//! opaque struct with a `Display`/`FromStr` pair that produces and consumes
//! the wire grammar, so callers carry the parsed form and never re-parse it
//! by hand.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::ConfigError;

// ── Stage ─────────────────────────────────────────────────────────────────────

/// One of the three pipeline phases a duty can belong to.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stage {
    Base,
    Operations,
    Dispatch,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Base => "base",
            Stage::Operations => "operations",
            Stage::Dispatch => "dispatch",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Stage {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(Stage::Base),
            "operations" => Ok(Stage::Operations),
            "dispatch" => Ok(Stage::Dispatch),
            other => Err(ConfigError::MalformedRuleset(format!(
                "unknown stage id {other:?}"
            ))),
        }
    }
}

// ── OwnerKind / Owner ─────────────────────────────────────────────────────────

/// The two resource families a duty can be anchored to.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OwnerKind {
    Personnel,
    Vehicle,
}

/// The kind of a participant entry on an `Activity` (spec §3).
///
/// `PersonnelService`/`VehicleService` participants take precedence over
/// plain `Personnel`/`Vehicle` ones when resolving the owner of an activity.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParticipantKind {
    Personnel,
    PersonnelService,
    Vehicle,
    VehicleService,
}

impl ParticipantKind {
    /// `true` for the two "-service" variants, which take precedence during
    /// owner resolution (spec §3).
    pub fn is_service(self) -> bool {
        matches!(self, ParticipantKind::PersonnelService | ParticipantKind::VehicleService)
    }

    pub fn owner_kind(self) -> OwnerKind {
        match self {
            ParticipantKind::Personnel | ParticipantKind::PersonnelService => OwnerKind::Personnel,
            ParticipantKind::Vehicle | ParticipantKind::VehicleService => OwnerKind::Vehicle,
        }
    }
}

/// The resource a duty is anchored to: a resource id plus its kind.
///
/// Orders by `(kind, resource_id)` so owners can key a `BTreeMap` when the
/// grouper needs a deterministic per-owner iteration order (spec §5:
/// "payload activities are processed in `(startMs, endMs, id)` order").
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Owner {
    pub resource_id: String,
    pub kind: OwnerKind,
}

impl Owner {
    pub fn new(resource_id: impl Into<String>, kind: OwnerKind) -> Self {
        Self { resource_id: resource_id.into(), kind }
    }
}

// ── ActivityTypeId ────────────────────────────────────────────────────────────

/// A catalog activity-type id. Opaque from this crate's point of view — the
/// catalog store is the only authority on what a given id means.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivityTypeId(pub String);

impl fmt::Display for ActivityTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ActivityTypeId {
    fn from(s: &str) -> Self {
        ActivityTypeId(s.to_string())
    }
}

impl From<String> for ActivityTypeId {
    fn from(s: String) -> Self {
        ActivityTypeId(s)
    }
}

// ── ServiceId ─────────────────────────────────────────────────────────────────

/// The backend-owned duty identifier: `svc:<stage>:<ownerId>:<YYYY-MM-DD>`.
///
/// Carries the parsed `(stage, owner_id, day)` triple so grouping and
/// autoframing never need to re-split the string form.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceId {
    pub stage: Stage,
    pub owner_id: String,
    pub day: NaiveDate,
}

impl ServiceId {
    pub fn new(stage: Stage, owner_id: impl Into<String>, day: NaiveDate) -> Self {
        Self { stage, owner_id: owner_id.into(), day }
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "svc:{}:{}:{}", self.stage, self.owner_id, self.day.format("%Y-%m-%d"))
    }
}

impl FromStr for ServiceId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        parse_service_parts(&parts).map(|(svc, _rest)| svc)
    }
}

/// Parse a `["svc", stage, owner, day, ...]` slice, returning the `ServiceId`
/// and whatever trailing parts remain (used by [`ManagedId::from_str`] to
/// recover the role suffix after the embedded `ServiceId`).
fn parse_service_parts<'a>(
    parts: &'a [&'a str],
) -> Result<(ServiceId, &'a [&'a str]), ConfigError> {
    if parts.len() < 4 || parts[0] != "svc" {
        return Err(ConfigError::MalformedRuleset(format!(
            "expected svc:<stage>:<ownerId>:<YYYY-MM-DD>, got {:?}",
            parts.join(":")
        )));
    }
    let stage = parts[1].parse::<Stage>()?;
    let owner_id = parts[2].to_string();
    let day = NaiveDate::parse_from_str(parts[3], "%Y-%m-%d")
        .map_err(|e| ConfigError::MalformedRuleset(format!("bad day {:?}: {e}", parts[3])))?;
    Ok((ServiceId { stage, owner_id, day }, &parts[4..]))
}

// ── ManagedId ─────────────────────────────────────────────────────────────────

/// Commute pause direction, used by `svccommute:<svc>:pause-{in|out}-<ordinal>`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PauseDirection {
    In,
    Out,
}

/// The fully parsed form of a managed activity id (spec §6 grammar).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ManagedId {
    Start(ServiceId),
    End(ServiceId),
    Break(ServiceId, u32),
    ShortBreak(ServiceId, u32),
    CommuteStart(ServiceId),
    CommuteEnd(ServiceId),
    CommutePause(ServiceId, PauseDirection, u32),
}

impl ManagedId {
    /// The `ServiceId` this managed id belongs to, regardless of role.
    pub fn service_id(&self) -> &ServiceId {
        match self {
            ManagedId::Start(s)
            | ManagedId::End(s)
            | ManagedId::Break(s, _)
            | ManagedId::ShortBreak(s, _)
            | ManagedId::CommuteStart(s)
            | ManagedId::CommuteEnd(s)
            | ManagedId::CommutePause(s, _, _) => s,
        }
    }

    pub fn is_boundary(&self) -> bool {
        matches!(self, ManagedId::Start(_) | ManagedId::End(_))
    }

    pub fn is_break(&self) -> bool {
        matches!(self, ManagedId::Break(_, _) | ManagedId::ShortBreak(_, _))
    }

    pub fn is_commute(&self) -> bool {
        matches!(
            self,
            ManagedId::CommuteStart(_) | ManagedId::CommuteEnd(_) | ManagedId::CommutePause(_, _, _)
        )
    }
}

impl fmt::Display for ManagedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagedId::Start(s) => write!(f, "svcstart:{s}"),
            ManagedId::End(s) => write!(f, "svcend:{s}"),
            ManagedId::Break(s, n) => write!(f, "svcbreak:{s}:{n}"),
            ManagedId::ShortBreak(s, n) => write!(f, "svcshortbreak:{s}:{n}"),
            ManagedId::CommuteStart(s) => write!(f, "svccommute:{s}:start"),
            ManagedId::CommuteEnd(s) => write!(f, "svccommute:{s}:end"),
            ManagedId::CommutePause(s, dir, n) => {
                let dir = match dir {
                    PauseDirection::In => "in",
                    PauseDirection::Out => "out",
                };
                write!(f, "svccommute:{s}:pause-{dir}-{n}")
            }
        }
    }
}

impl FromStr for ManagedId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.is_empty() {
            return Err(ConfigError::MalformedRuleset("empty managed id".into()));
        }
        let kind = parts[0];
        let rest = &parts[1..];

        match kind {
            "svcstart" => {
                let (svc, tail) = parse_service_parts(rest)?;
                require_empty(tail)?;
                Ok(ManagedId::Start(svc))
            }
            "svcend" => {
                let (svc, tail) = parse_service_parts(rest)?;
                require_empty(tail)?;
                Ok(ManagedId::End(svc))
            }
            "svcbreak" => {
                let (svc, tail) = parse_service_parts(rest)?;
                let n = single_u32(tail)?;
                Ok(ManagedId::Break(svc, n))
            }
            "svcshortbreak" => {
                let (svc, tail) = parse_service_parts(rest)?;
                let n = single_u32(tail)?;
                Ok(ManagedId::ShortBreak(svc, n))
            }
            "svccommute" => {
                let (svc, tail) = parse_service_parts(rest)?;
                match tail {
                    ["start"] => Ok(ManagedId::CommuteStart(svc)),
                    ["end"] => Ok(ManagedId::CommuteEnd(svc)),
                    [role] if role.starts_with("pause-") => parse_pause(svc, role),
                    other => Err(ConfigError::MalformedRuleset(format!(
                        "unknown commute role {other:?}"
                    ))),
                }
            }
            other => Err(ConfigError::MalformedRuleset(format!(
                "unknown managed id prefix {other:?}"
            ))),
        }
    }
}

fn require_empty(tail: &[&str]) -> Result<(), ConfigError> {
    if tail.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::MalformedRuleset(format!(
            "unexpected trailing segments {tail:?}"
        )))
    }
}

fn single_u32(tail: &[&str]) -> Result<u32, ConfigError> {
    match tail {
        [n] => n
            .parse::<u32>()
            .map_err(|e| ConfigError::MalformedRuleset(format!("bad ordinal {n:?}: {e}"))),
        other => Err(ConfigError::MalformedRuleset(format!(
            "expected a single ordinal segment, got {other:?}"
        ))),
    }
}

fn parse_pause(svc: ServiceId, role: &str) -> Result<ManagedId, ConfigError> {
    // role == "pause-{in|out}-<ordinal>"
    let body = &role["pause-".len()..];
    let (dir_str, ord_str) = body
        .split_once('-')
        .ok_or_else(|| ConfigError::MalformedRuleset(format!("malformed pause role {role:?}")))?;
    let dir = match dir_str {
        "in" => PauseDirection::In,
        "out" => PauseDirection::Out,
        other => {
            return Err(ConfigError::MalformedRuleset(format!(
                "unknown pause direction {other:?}"
            )))
        }
    };
    let ordinal = ord_str
        .parse::<u32>()
        .map_err(|e| ConfigError::MalformedRuleset(format!("bad pause ordinal {ord_str:?}: {e}")))?;
    Ok(ManagedId::CommutePause(svc, dir, ordinal))
}
