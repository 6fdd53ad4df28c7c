use chrono::Utc;
use dap_core::{KnownCode, OwnerKind, ParticipantKind};

use crate::activity::Activity;
use crate::attributes::ServiceByOwnerEntry;
use crate::participant::Participant;

fn ts(s: &str) -> chrono::DateTime<Utc> {
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .unwrap()
        .and_utc()
}

fn act(id: &str, start: &str, end: Option<&str>) -> Activity {
    let mut a = Activity::new(id, ts(start), "PAYLOAD");
    a.end = end.map(ts);
    a
}

#[test]
fn duration_minutes_uses_end_when_present() {
    let a = act("a1", "2025-01-01T08:00:00", Some("2025-01-01T09:30:00"));
    assert_eq!(a.duration_minutes(), 90);
}

#[test]
fn duration_minutes_falls_back_to_default_duration() {
    let mut a = act("a1", "2025-01-01T08:00:00", None);
    a.attributes.default_duration = Some(45);
    assert_eq!(a.duration_minutes(), 45);
}

#[test]
fn duration_minutes_falls_back_to_zero() {
    let a = act("a1", "2025-01-01T08:00:00", None);
    assert_eq!(a.duration_minutes(), 0);
}

#[test]
fn start_location_resolution_order() {
    let mut a = act("a1", "2025-01-01T08:00:00", None);
    a.to = Some("to-site".into());
    assert_eq!(a.start_location(), Some("to-site"));

    a.location_label = Some("label".into());
    assert_eq!(a.start_location(), Some("label"));

    a.from = Some("from-site".into());
    assert_eq!(a.start_location(), Some("from-site"));

    a.location_id = Some("loc-1".into());
    assert_eq!(a.start_location(), Some("loc-1"));
}

#[test]
fn end_location_resolution_order() {
    let mut a = act("a1", "2025-01-01T08:00:00", None);
    a.from = Some("from-site".into());
    assert_eq!(a.end_location(), Some("from-site"));

    a.location_label = Some("label".into());
    assert_eq!(a.end_location(), Some("label"));

    a.to = Some("to-site".into());
    assert_eq!(a.end_location(), Some("to-site"));

    a.location_id = Some("loc-1".into());
    assert_eq!(a.end_location(), Some("loc-1"));
}

#[test]
fn owner_resolution_prefers_service_participant() {
    let mut a = act("a1", "2025-01-01T08:00:00", None);
    a.participants.push(Participant::new("PS-1", ParticipantKind::Personnel));
    a.participants.push(Participant::new("SVC-1", ParticipantKind::PersonnelService));

    let owner = a.owner().unwrap();
    assert_eq!(owner.resource_id, "SVC-1");
    assert_eq!(owner.kind, OwnerKind::Personnel);
}

#[test]
fn owner_resolution_falls_back_to_plain_participant() {
    let mut a = act("a1", "2025-01-01T08:00:00", None);
    a.participants.push(Participant::new("VEH-1", ParticipantKind::Vehicle));

    let owner = a.owner().unwrap();
    assert_eq!(owner.resource_id, "VEH-1");
    assert_eq!(owner.kind, OwnerKind::Vehicle);
}

#[test]
fn managed_id_parses_only_for_managed_prefixes() {
    let payload = act("a1", "2025-01-01T08:00:00", None);
    assert!(!payload.is_managed());

    let svc: dap_core::ServiceId = "svc:base:PS-1:2025-01-01".parse().unwrap();
    let managed = act(&format!("svcstart:{svc}"), "2025-01-01T08:00:00", None);
    assert!(managed.is_managed());
}

#[test]
fn recompute_global_conflicts_unions_owner_entries() {
    let mut a = act("a1", "2025-01-01T08:00:00", None);
    let mut e1 = ServiceByOwnerEntry::new(None);
    e1.merge_conflicts(vec![KnownCode::CapacityOverlap.into()], Default::default());
    let mut e2 = ServiceByOwnerEntry::new(None);
    e2.merge_conflicts(vec![KnownCode::LocationSequence.into()], Default::default());
    a.attributes.service_by_owner.insert("PS-1".into(), e1);
    a.attributes.service_by_owner.insert("PS-2".into(), e2);

    a.attributes.recompute_global_conflicts();
    assert_eq!(a.attributes.service_conflict_codes.len(), 2);
    assert_eq!(a.attributes.service_conflict_level, dap_core::Severity::Error);
}
