//! Seed scenarios (spec §8) exercised end-to-end through [`crate::Autopilot`].

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};

use dap_activity::Activity;
use dap_config::catalog::{CatalogEntry, Role};
use dap_config::rules::RawRuleParams;
use dap_config::static_store::{StaticCatalogStore, StaticRuleStore};
use dap_core::{OwnerKind, ParticipantKind, Stage};
use dap_masterdata::depot::HomeDepot;
use dap_masterdata::node::TransferNode;
use dap_masterdata::store::StaticMasterDataStore;

use crate::builder::AutopilotBuilder;
use crate::report::ApplyReport;
use crate::Autopilot;

const VARIANT: &str = "PROD-2025/26";

fn ts(s: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").expect("fixture timestamp").and_utc()
}

fn payload(id: &str, start: &str, end: &str, owner: &str) -> Activity {
    let mut a = Activity::new(id, ts(start), "PAYLOAD");
    a.end = Some(ts(end));
    a.participants.push(dap_activity::Participant::new(owner, ParticipantKind::Personnel));
    a
}

fn catalog_entries() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new("PERSONNEL_SERVICE_START", vec![Role::ServiceStart]),
        CatalogEntry::new("PERSONNEL_SERVICE_END", vec![Role::ServiceEnd]),
        CatalogEntry::new("VEHICLE_ON", vec![Role::VehicleOn]),
        CatalogEntry::new("VEHICLE_OFF", vec![Role::VehicleOff]),
        CatalogEntry::new("BREAK", vec![Role::Break]),
        CatalogEntry::new("SHORT_BREAK", vec![Role::ShortBreak]),
        CatalogEntry::new("COMMUTE", vec![Role::Commute]),
    ]
}

/// Build an [`Autopilot`] with a single `(Stage::Base, VARIANT)` rule scope
/// and the given master-data store.
fn autopilot_with(raw: RawRuleParams, master_data: StaticMasterDataStore) -> Autopilot {
    let rule_store = StaticRuleStore::new().with_scope(Stage::Base, VARIANT, raw);
    let catalog_store = StaticCatalogStore::new().with_stage(Stage::Base, catalog_entries());
    AutopilotBuilder::new(rule_store, catalog_store, master_data).build()
}

fn autopilot() -> Autopilot {
    autopilot_with(RawRuleParams::default(), StaticMasterDataStore::new())
}

/// Apply a report's upserts/deletes onto a working set, mirroring the
/// `merge(input, R)` operation spec §8's idempotency property is stated
/// over.
fn merge(activities: Vec<Activity>, report: &ApplyReport) -> Vec<Activity> {
    let mut by_id: BTreeMap<String, Activity> =
        activities.into_iter().map(|a| (a.id.clone(), a)).collect();
    for id in &report.deleted_ids {
        by_id.remove(id);
    }
    for a in &report.upserts {
        by_id.insert(a.id.clone(), a.clone());
    }
    by_id.into_values().collect()
}

fn has_code(activities: &[Activity], id: &str, owner: &str, code: &str) -> bool {
    activities
        .iter()
        .find(|a| a.id == id)
        .and_then(|a| a.attributes.service_by_owner.get(owner))
        .is_some_and(|entry| entry.conflict_codes.iter().any(|c| c.as_str() == code))
}

// ── Scenario 1: owner reassignment (spec §8.1) ──────────────────────────────

#[tokio::test]
async fn owner_reassignment_rewrites_managed_pair_and_purges_old_owner() {
    let autopilot = autopilot();
    let a1 = payload("a1", "2025-01-01T08:00:00", "2025-01-01T09:00:00", "PS-1");

    let first = autopilot.apply(Stage::Base, VARIANT, vec![a1.clone()]).await.unwrap();

    let a1_out = first.upserts.iter().find(|a| a.id == "a1").expect("a1 upserted");
    let entry = a1_out.attributes.service_by_owner.get("PS-1").expect("PS-1 entry present");
    assert_eq!(entry.service_id.as_ref().unwrap().to_string(), "svc:base:PS-1:2025-01-01");

    let start_id = "svcstart:svc:base:PS-1:2025-01-01";
    let end_id = "svcend:svc:base:PS-1:2025-01-01";
    assert!(first.upserts.iter().any(|a| a.id == start_id));
    assert!(first.upserts.iter().any(|a| a.id == end_id));

    let mut merged = merge(vec![a1], &first);
    let a1_mut = merged.iter_mut().find(|a| a.id == "a1").unwrap();
    a1_mut.participants = vec![dap_activity::Participant::new("PS-2", ParticipantKind::Personnel)];

    let second = autopilot.apply(Stage::Base, VARIANT, merged).await.unwrap();

    let new_start = "svcstart:svc:base:PS-2:2025-01-01";
    let new_end = "svcend:svc:base:PS-2:2025-01-01";
    assert!(second.upserts.iter().any(|a| a.id == new_start));
    assert!(second.upserts.iter().any(|a| a.id == new_end));
    assert!(second.deleted_ids.contains(&start_id.to_string()));
    assert!(second.deleted_ids.contains(&end_id.to_string()));

    let a1_final = second.upserts.iter().find(|a| a.id == "a1").expect("a1 still upserted");
    assert!(a1_final.attributes.service_by_owner.contains_key("PS-2"));
    assert!(!a1_final.attributes.service_by_owner.contains_key("PS-1"));
}

// ── Scenario 2: capacity + location conflicts (spec §8.2) ───────────────────

#[tokio::test]
async fn overlapping_activities_flag_capacity_overlap_at_error_level() {
    let autopilot = autopilot();
    let mut a1 = payload("a1", "2025-01-02T08:00:00", "2025-01-02T10:00:00", "PS-1");
    a1.attributes.consider_capacity_conflicts = true;
    let mut a2 = payload("a2", "2025-01-02T09:00:00", "2025-01-02T11:00:00", "PS-1");
    a2.attributes.consider_capacity_conflicts = true;

    let report = autopilot.apply(Stage::Base, VARIANT, vec![a1, a2]).await.unwrap();

    assert!(has_code(&report.upserts, "a1", "PS-1", "CAPACITY_OVERLAP"));
    assert!(has_code(&report.upserts, "a2", "PS-1", "CAPACITY_OVERLAP"));
    let a1_out = report.upserts.iter().find(|a| a.id == "a1").unwrap();
    assert_eq!(a1_out.attributes.service_conflict_level, dap_core::Severity::Error);
}

#[tokio::test]
async fn mismatched_consecutive_locations_flag_location_sequence() {
    let autopilot = autopilot();
    let mut a1 = payload("a1", "2025-01-03T08:00:00", "2025-01-03T09:00:00", "PS-1");
    a1.from = Some("A".into());
    a1.to = Some("B".into());
    a1.attributes.consider_location_conflicts = true;
    let mut a2 = payload("a2", "2025-01-03T09:30:00", "2025-01-03T10:30:00", "PS-1");
    a2.from = Some("C".into());
    a2.to = Some("D".into());
    a2.attributes.consider_location_conflicts = true;

    let report = autopilot.apply(Stage::Base, VARIANT, vec![a1, a2]).await.unwrap();

    assert!(has_code(&report.upserts, "a1", "PS-1", "LOCATION_SEQUENCE"));
}

// ── Scenario 3: cross-midnight carry (spec §8.3) ────────────────────────────

#[tokio::test]
async fn cross_midnight_activities_share_one_duty() {
    let autopilot = autopilot();
    let a1 = payload("a1", "2025-01-01T22:00:00", "2025-01-01T23:00:00", "PS-1");
    let a2 = payload("a2", "2025-01-02T01:00:00", "2025-01-02T02:00:00", "PS-1");

    let report = autopilot.apply(Stage::Base, VARIANT, vec![a1, a2]).await.unwrap();

    let svc = |id: &str| {
        report.upserts.iter().find(|a| a.id == id).unwrap().attributes.service_by_owner["PS-1"]
            .service_id
            .clone()
            .unwrap()
    };
    let svc1 = svc("a1");
    let svc2 = svc("a2");
    assert_eq!(svc1, svc2);
    assert_eq!(svc1.to_string(), "svc:base:PS-1:2025-01-01");
}

// ── Scenario 4: manual boundary preservation (spec §8.4) ────────────────────

#[tokio::test]
async fn manual_boundary_start_survives_a_second_call() {
    let autopilot = autopilot();
    let a1 = payload("a1", "2025-01-04T08:00:00", "2025-01-04T09:00:00", "PS-1");

    let first = autopilot.apply(Stage::Base, VARIANT, vec![a1.clone()]).await.unwrap();
    let mut merged = merge(vec![a1], &first);

    let start_id = "svcstart:svc:base:PS-1:2025-01-04";
    let start = merged.iter_mut().find(|a| a.id == start_id).expect("start boundary present");
    start.start = ts("2025-01-04T07:50:00");
    start.end = Some(ts("2025-01-04T07:50:00"));
    start.attributes.manual_service_boundary = true;

    let second = autopilot.apply(Stage::Base, VARIANT, merged.clone()).await.unwrap();
    let final_state = merge(merged, &second);

    let start_out = final_state.iter().find(|a| a.id == start_id).expect("start boundary retained");
    assert_eq!(start_out.start, ts("2025-01-04T07:50:00"));
}

// ── Scenario 5: AZG continuous work (spec §8.5) ─────────────────────────────

#[tokio::test]
async fn azg_break_required_fires_without_a_break_and_clears_only_on_a_regular_one() {
    // 5a: an 8h duty with zero internal gaps has nowhere to host a break —
    // AZG_BREAK_REQUIRED fires on the boundaries.
    let autopilot_no_depot = autopilot();
    let a1 = payload("a1", "2025-06-02T06:00:00", "2025-06-02T14:00:00", "PS-1");
    let report = autopilot_no_depot.apply(Stage::Base, VARIANT, vec![a1]).await.unwrap();
    assert!(has_code(&report.upserts, "svcstart:svc:base:PS-1:2025-06-02", "PS-1", "AZG_BREAK_REQUIRED"));
    assert!(has_code(&report.upserts, "svcend:svc:base:PS-1:2025-06-02", "PS-1", "AZG_BREAK_REQUIRED"));

    // 5b: a 20-minute gap hosts only a *short* break (no regular-break site
    // configured) — work_minutes is unaffected (only regular breaks are
    // subtracted, spec §4.5), so the code persists.
    let short_break_depot = StaticMasterDataStore::new()
        .with_personnel(dap_masterdata::store::Personnel {
            id: "PS-1".into(),
            home_depot_id: Some("DEPOT-1".into()),
        })
        .with_depot(HomeDepot {
            id: "DEPOT-1".into(),
            site_ids: ["SITE-A".into()].into_iter().collect(),
            break_site_ids: Default::default(),
            short_break_site_ids: ["SITE-B".into()].into_iter().collect(),
            overnight_site_ids: Default::default(),
        })
        .with_walk_time(TransferNode::op("OP-A"), TransferNode::personnel_site("SITE-B"), 0);
    let autopilot_short = autopilot_with(RawRuleParams::default(), short_break_depot);

    let mut p1 = payload("b1", "2025-06-03T06:00:00", "2025-06-03T10:00:00", "PS-1");
    p1.from = Some("OP-A".into());
    p1.to = Some("OP-A".into());
    let mut p2 = payload("b2", "2025-06-03T10:20:00", "2025-06-03T14:00:00", "PS-1");
    p2.from = Some("OP-A".into());
    p2.to = Some("OP-A".into());
    let report = autopilot_short.apply(Stage::Base, VARIANT, vec![p1, p2]).await.unwrap();
    assert!(report.upserts.iter().any(|a| a.attributes.is_short_break));
    assert!(!report.upserts.iter().any(|a| a.attributes.is_break));
    assert!(has_code(&report.upserts, "svcstart:svc:base:PS-1:2025-06-03", "PS-1", "AZG_BREAK_REQUIRED"));

    // 5c: a 40-minute gap with a regular-break site configured hosts a
    // qualifying regular break — AZG_BREAK_REQUIRED clears.
    let regular_break_depot = StaticMasterDataStore::new()
        .with_personnel(dap_masterdata::store::Personnel {
            id: "PS-1".into(),
            home_depot_id: Some("DEPOT-1".into()),
        })
        .with_depot(HomeDepot {
            id: "DEPOT-1".into(),
            site_ids: ["SITE-A".into()].into_iter().collect(),
            break_site_ids: ["SITE-C".into()].into_iter().collect(),
            short_break_site_ids: Default::default(),
            overnight_site_ids: Default::default(),
        })
        .with_walk_time(TransferNode::op("OP-A"), TransferNode::personnel_site("SITE-C"), 0);
    let autopilot_regular = autopilot_with(RawRuleParams::default(), regular_break_depot);

    let mut p1 = payload("c1", "2025-06-04T06:00:00", "2025-06-04T10:00:00", "PS-1");
    p1.from = Some("OP-A".into());
    p1.to = Some("OP-A".into());
    let mut p2 = payload("c2", "2025-06-04T10:40:00", "2025-06-04T14:00:00", "PS-1");
    p2.from = Some("OP-A".into());
    p2.to = Some("OP-A".into());
    let report = autopilot_regular.apply(Stage::Base, VARIANT, vec![p1, p2]).await.unwrap();
    assert!(report.upserts.iter().any(|a| a.attributes.is_break));
    assert!(!has_code(&report.upserts, "svcstart:svc:base:PS-1:2025-06-04", "PS-1", "AZG_BREAK_REQUIRED"));
}

// ── Scenario 6: break midpoint + standard (spec §8.6) ───────────────────────

#[tokio::test]
async fn short_early_break_in_a_long_duty_fails_standard_min_and_midpoint() {
    let master_data = StaticMasterDataStore::new()
        .with_personnel(dap_masterdata::store::Personnel {
            id: "PS-1".into(),
            home_depot_id: Some("DEPOT-1".into()),
        })
        .with_depot(HomeDepot {
            id: "DEPOT-1".into(),
            site_ids: ["SITE-A".into()].into_iter().collect(),
            break_site_ids: ["SITE-D".into()].into_iter().collect(),
            short_break_site_ids: Default::default(),
            overnight_site_ids: Default::default(),
        })
        .with_walk_time(TransferNode::op("OP-A"), TransferNode::personnel_site("SITE-D"), 0);
    let autopilot = autopilot_with(RawRuleParams::default(), master_data);

    // Duty span 10h (06:00-16:00), one 30-minute break at +1h (07:00-07:30).
    let mut p1 = payload("d1", "2025-06-05T06:00:00", "2025-06-05T07:00:00", "PS-1");
    p1.from = Some("OP-A".into());
    p1.to = Some("OP-A".into());
    let mut p2 = payload("d2", "2025-06-05T07:30:00", "2025-06-05T16:00:00", "PS-1");
    p2.from = Some("OP-A".into());
    p2.to = Some("OP-A".into());

    let report = autopilot.apply(Stage::Base, VARIANT, vec![p1, p2]).await.unwrap();

    let break_activity = report
        .upserts
        .iter()
        .find(|a| a.attributes.is_break)
        .expect("a regular break was synthesized from the 30-minute gap");
    assert_eq!(break_activity.duration_minutes(), 30);

    assert!(has_code(&report.upserts, "svcstart:svc:base:PS-1:2025-06-05", "PS-1", "AZG_BREAK_STANDARD_MIN"));
    assert!(has_code(&report.upserts, "svcstart:svc:base:PS-1:2025-06-05", "PS-1", "AZG_BREAK_MIDPOINT"));
}

// ── Quantified invariants (spec §8) ─────────────────────────────────────────

#[tokio::test]
async fn reapplying_to_the_merged_output_is_idempotent() {
    let autopilot = autopilot();
    let a1 = payload("a1", "2025-01-05T08:00:00", "2025-01-05T09:00:00", "PS-1");

    let first = autopilot.apply(Stage::Base, VARIANT, vec![a1.clone()]).await.unwrap();
    let merged = merge(vec![a1], &first);

    let second = autopilot.apply(Stage::Base, VARIANT, merged).await.unwrap();

    assert!(second.deleted_ids.is_empty());
    let mut first_sorted = first.upserts.clone();
    first_sorted.sort_by(|a, b| a.id.cmp(&b.id));
    let mut second_sorted = second.upserts.clone();
    second_sorted.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(first_sorted, second_sorted);
}

#[tokio::test]
async fn service_conflict_codes_are_strictly_ascending_and_deduplicated() {
    let autopilot = autopilot();
    let mut a1 = payload("a1", "2025-01-06T08:00:00", "2025-01-06T10:00:00", "PS-1");
    a1.attributes.consider_capacity_conflicts = true;
    let mut a2 = payload("a2", "2025-01-06T09:00:00", "2025-01-06T11:00:00", "PS-1");
    a2.attributes.consider_capacity_conflicts = true;

    let report = autopilot.apply(Stage::Base, VARIANT, vec![a1, a2]).await.unwrap();

    for a in &report.upserts {
        let codes = &a.attributes.service_conflict_codes;
        let mut sorted = codes.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(codes, &sorted);
    }
}

// ── `cleanupServiceBoundaries` / `normalizeManagedServiceActivities` ────────

#[tokio::test]
async fn cleanup_keeps_the_earliest_start_and_latest_end_per_owner_day() {
    let autopilot = autopilot();

    let mut early_start = Activity::new("s1", ts("2025-01-07T07:00:00"), "PERSONNEL_SERVICE_START");
    early_start.end = Some(ts("2025-01-07T07:00:00"));
    early_start.participants.push(dap_activity::Participant::new("PS-1", ParticipantKind::Personnel));

    let mut late_start = Activity::new("s2", ts("2025-01-07T08:00:00"), "PERSONNEL_SERVICE_START");
    late_start.end = Some(ts("2025-01-07T08:00:00"));
    late_start.participants.push(dap_activity::Participant::new("PS-1", ParticipantKind::Personnel));

    let report = autopilot
        .cleanup_service_boundaries(Stage::Base, VARIANT, vec![early_start, late_start])
        .await
        .unwrap();

    assert!(report.deleted_ids.contains(&"s2".to_string()));
    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].kept_start_id.as_deref(), Some("s1"));
}

#[test]
fn normalize_rewrites_mismatched_break_ids_in_start_order() {
    let autopilot = autopilot();
    let svc: dap_core::ServiceId = "svc:base:PS-1:2025-01-08".parse().unwrap();

    let mut stray = Activity::new("stray-break", ts("2025-01-08T10:00:00"), "BREAK");
    stray.end = Some(ts("2025-01-08T10:30:00"));
    stray.service_id = Some(svc.clone());
    stray.attributes.is_break = true;

    let report = autopilot.normalize_managed_service_activities(vec![stray]);

    assert_eq!(report.deleted_ids, vec!["stray-break".to_string()]);
    assert_eq!(report.upserts[0].id, "svcbreak:svc:base:PS-1:2025-01-08:1");
}
