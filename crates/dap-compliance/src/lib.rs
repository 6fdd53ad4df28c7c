//! `dap-compliance` — the whole-input compliance layer (spec §4.5).
//!
//! Unlike [`dap_autoframe`], which reasons about one duty at a time, every
//! pass here sees the *entire* input: local conflicts recomputed across
//! duties, home-depot re-selection per duty, and the AZG rolling-window
//! labor-law rules evaluated per owner across their full duty history.
//! Each pass is idempotent and order-insensitive (spec §4.5).
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|------------------------------------------------------------------|
//! | [`snapshot`] | `DutySnapshot` — the per-duty summary AZG rules evaluate over    |
//! | [`local`]   | Global capacity/location conflict recompute (spec §4.5 "Local conflicts") |
//! | [`home_depot`] | Home-depot compliance re-selection pass                        |
//! | [`azg`]     | The AZG rolling-window rule evaluators                            |
//! | [`error`]   | `ComplianceError`, `ComplianceResult`                             |

pub mod azg;
pub mod error;
pub mod home_depot;
pub mod local;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use azg::{evaluate_owner, recompute_azg_compliance};
pub use error::{ComplianceError, ComplianceResult};
pub use home_depot::recompute_home_depot_compliance;
pub use local::recompute_local_conflicts;
pub use snapshot::{build_duty_snapshot, build_owner_snapshots, BreakInterval, DutySnapshot};
