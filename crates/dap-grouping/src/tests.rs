use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use dap_activity::{Activity, Participant};
use dap_config::ResolvedConfig;
use dap_core::{ActivityTypeId, ParticipantKind, Stage};

use crate::{group, normalize};

fn ts(s: &str) -> chrono::DateTime<chrono::Utc> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap().and_utc()
}

fn payload(id: &str, start: &str, owner: &str) -> Activity {
    let mut a = Activity::new(id, ts(start), ActivityTypeId::from("PAYLOAD"));
    a.end = Some(ts(start) + chrono::Duration::hours(1));
    a.participants.push(Participant::new(owner, ParticipantKind::Personnel));
    a
}

fn config() -> ResolvedConfig {
    ResolvedConfig {
        bounds: dap_config::resolved::Bounds { max_duty_span_minutes: 720, ..Default::default() },
        break_type_ids: vec!["BREAK".into()],
        short_break_type_id: "SHORT_BREAK".into(),
        commute_type_id: "COMMUTE".into(),
        personnel_start_type_id: "PSTART".into(),
        personnel_end_type_id: "PEND".into(),
        vehicle_start_type_id: "VSTART".into(),
        vehicle_end_type_id: "VEND".into(),
        azg: Default::default(),
        configured_extra_rest_dates: Vec::new(),
    }
}

#[test]
fn same_day_activities_share_a_duty() {
    let mut acts = BTreeMap::new();
    for a in [
        payload("a1", "2025-01-01T08:00:00", "PS-1"),
        payload("a2", "2025-01-01T10:00:00", "PS-1"),
    ] {
        acts.insert(a.id.clone(), a);
    }
    let cfg = config();
    normalize(&mut acts, &cfg);
    let result = group(&mut acts, Stage::Base, &cfg);
    assert_eq!(result.duties.len(), 1);
    let duty = result.duties.values().next().unwrap();
    assert_eq!(duty.activity_ids.len(), 2);
}

#[test]
fn cross_midnight_within_span_shares_a_duty() {
    let mut acts = BTreeMap::new();
    for a in [
        payload("a1", "2025-01-01T22:00:00", "PS-1"),
        payload("a2", "2025-01-02T01:00:00", "PS-1"),
    ] {
        acts.insert(a.id.clone(), a);
    }
    let cfg = config();
    let result = group(&mut acts, Stage::Base, &cfg);
    assert_eq!(result.duties.len(), 1);
    let sid = result.duties.keys().next().unwrap();
    assert_eq!(sid.day, chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
}

#[test]
fn different_day_beyond_span_starts_a_new_duty() {
    let mut acts = BTreeMap::new();
    for a in [
        payload("a1", "2025-01-01T08:00:00", "PS-1"),
        payload("a2", "2025-01-03T08:00:00", "PS-1"),
    ] {
        acts.insert(a.id.clone(), a);
    }
    let cfg = config();
    let result = group(&mut acts, Stage::Base, &cfg);
    assert_eq!(result.duties.len(), 2);
}

#[test]
fn normalizer_clears_service_id_and_shrinks_owners() {
    let mut acts = BTreeMap::new();
    let mut a = payload("a1", "2025-01-01T08:00:00", "PS-1");
    a.service_id = Some(dap_core::ServiceId::new(
        Stage::Base,
        "PS-1",
        chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
    ));
    a.attributes
        .service_by_owner
        .insert("STALE-OWNER".into(), Default::default());
    acts.insert(a.id.clone(), a);

    let cfg = config();
    normalize(&mut acts, &cfg);
    let a = &acts["a1"];
    assert!(a.service_id.is_none());
    assert!(!a.attributes.service_by_owner.contains_key("STALE-OWNER"));
}

#[test]
fn normalizer_is_idempotent() {
    let mut acts = BTreeMap::new();
    acts.insert("a1".into(), payload("a1", "2025-01-01T08:00:00", "PS-1"));
    let cfg = config();
    normalize(&mut acts, &cfg);
    let once = acts.clone();
    normalize(&mut acts, &cfg);
    assert_eq!(once["a1"].service_id.is_none(), acts["a1"].service_id.is_none());
    assert_eq!(
        once["a1"].attributes.service_by_owner.len(),
        acts["a1"].attributes.service_by_owner.len()
    );
}
