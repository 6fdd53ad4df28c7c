//! `dap-autoframe` — the per-duty autoframer (spec §4.4).
//!
//! The autoframer is the largest single component of the autopilot (spec §2:
//! "~45% share of core"). It runs once per [`dap_activity::Duty`] and
//! produces a [`frame::AutoframeResult`]: the managed activities to upsert,
//! the ids to delete, and the full set of managed ids now owned by the
//! duty.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|---------------------------------------------------------------|
//! | [`window`]  | Duty window computation, manual-boundary widen-only rule (§4.4.1) |
//! | [`boundary`]| Managed boundary reconciliation (§4.4.2)                     |
//! | [`depot`]   | Home-depot and site selection (§4.4.3)                        |
//! | [`commute`] | Commute activity synthesis (§4.4.4)                          |
//! | [`breaks`]  | Break/short-break planning (§4.4.5)                           |
//! | [`conflicts`]| Local conflict emission: worktime, capacity, location (§4.4.6) |
//! | [`frame`]   | Orchestrates the above into one per-duty pass (§4.4.7)        |
//!
//! Per spec §5, every function in this crate is synchronous and pure over
//! its inputs — master-data and configuration are passed in as already-
//! fetched snapshots ([`dap_masterdata::HomeDepot`], [`dap_masterdata::WalkTimeIndex`]),
//! mirroring `dt_mobility::MobilityEngine`'s "the router is a plain
//! synchronous trait, fetched once" design.

pub mod boundary;
pub mod breaks;
pub mod commute;
pub mod conflicts;
pub mod depot;
pub mod frame;
pub mod window;


pub use boundary::{boundary_type_id, reconcile, BoundaryPlan};
pub use breaks::{plan_breaks, stamp_activities, BreakKind, BreakPlan, BreakPlanEntry, WorkEntry};
pub use commute::synthesize_commutes;
pub use conflicts::{
    capacity_overlap_conflicts, home_depot_conflicts, location_sequence_conflicts, worktime_conflicts,
    ConflictReport,
};
pub use depot::{select_home_depot_site, DepotSelection};
pub use frame::{autoframe_duty, AutoframeResult};
pub use window::DutyWindow;
