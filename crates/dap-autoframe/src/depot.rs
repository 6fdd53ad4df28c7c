//! Home-depot and site selection (spec §4.4.3).

use dap_core::{Code, KnownCode};
use dap_masterdata::{HomeDepot, TransferNode, WalkTimeIndex};

/// A large but additive-safe stand-in for "no walk time known" so a site
/// with one missing leg still loses to a site with both legs known, without
/// risking an `i64` overflow when both legs of every candidate are missing.
const MISSING_WALK_PENALTY_MINUTES: i64 = i64::MAX / 4;

/// Outcome of picking one depot site to anchor a duty's boundaries, breaks,
/// and commutes (spec §4.4.3).
#[derive(Clone, Debug, Default)]
pub struct DepotSelection {
    pub depot_id: Option<String>,
    pub site_id: Option<String>,
    pub walk_in_minutes: Option<i64>,
    pub walk_out_minutes: Option<i64>,
    pub codes: Vec<Code>,
}

impl DepotSelection {
    pub fn not_found() -> Self {
        Self { codes: vec![KnownCode::HomeDepotNotFound.into()], ..Default::default() }
    }
}

/// Select the depot site minimizing `walk(site→startOp) + walk(endOp→site)`
/// from `depot.site_ids`, treating a missing walk time as a large penalty
/// that still participates in the comparison (spec §4.4.3). Ties break on
/// ascending site id (`BTreeSet` iteration order).
pub fn select_home_depot_site(
    depot: Option<&HomeDepot>,
    walk_times: &WalkTimeIndex,
    start_op: Option<&str>,
    end_op: Option<&str>,
) -> DepotSelection {
    let Some(depot) = depot else {
        return DepotSelection::not_found();
    };

    let mut codes = Vec::new();
    if start_op.is_none() {
        codes.push(KnownCode::HomeDepotStartLocationMissing.into());
    }
    if end_op.is_none() {
        codes.push(KnownCode::HomeDepotEndLocationMissing.into());
    }

    if depot.site_ids.is_empty() {
        codes.push(KnownCode::HomeDepotNoSites.into());
        return DepotSelection { depot_id: Some(depot.id.clone()), codes, ..Default::default() };
    }

    let mut best: Option<(String, i64, Option<i64>, Option<i64>)> = None;
    let mut any_real_walk = false;

    for site in &depot.site_ids {
        let walk_in = start_op.and_then(|op| {
            walk_times.walk_time_minutes(
                &TransferNode::personnel_site(site.clone()),
                &TransferNode::op(op.to_string()),
            )
        });
        let walk_out = end_op.and_then(|op| {
            walk_times.walk_time_minutes(
                &TransferNode::op(op.to_string()),
                &TransferNode::personnel_site(site.clone()),
            )
        });
        any_real_walk = any_real_walk || walk_in.is_some() || walk_out.is_some();

        let cost = walk_in.unwrap_or(MISSING_WALK_PENALTY_MINUTES)
            + walk_out.unwrap_or(MISSING_WALK_PENALTY_MINUTES);
        let better = match &best {
            None => true,
            Some((_, best_cost, ..)) => cost < *best_cost,
        };
        if better {
            best = Some((site.clone(), cost, walk_in, walk_out));
        }
    }

    let (site_id, _, walk_in, walk_out) = best.expect("site_ids is non-empty");

    if !any_real_walk {
        codes.push(KnownCode::HomeDepotSiteNotFound.into());
    } else {
        if walk_in.is_none() {
            codes.push(KnownCode::WalkTimeMissingStart.into());
        }
        if walk_out.is_none() {
            codes.push(KnownCode::WalkTimeMissingEnd.into());
        }
    }

    DepotSelection {
        depot_id: Some(depot.id.clone()),
        site_id: Some(site_id),
        walk_in_minutes: walk_in,
        walk_out_minutes: walk_out,
        codes,
    }
}
