//! `dap-autopilot` — the public entry point of the duty autopilot (spec §2,
//! §6).
//!
//! This crate composes, in strict order, every other `dap-*` crate into the
//! pipeline spec §2 describes: Config & Type Resolver (`dap-config`) →
//! Metadata Normalizer + Grouper (`dap-grouping`) → Autoframer
//! (`dap-autoframe`) → Compliance evaluators (`dap-compliance`). It is the
//! `dt-sim` analogue in this workspace (SPEC_FULL.md §2): `dt_sim::Sim` owns
//! the tick loop orchestrating agents/behavior/mobility; [`Autopilot`] owns
//! the single-call pipeline orchestrating config/grouping/autoframe/
//! compliance.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use dap_autopilot::AutopilotBuilder;
//! use dap_config::{StaticCatalogStore, StaticRuleStore};
//! use dap_core::Stage;
//! use dap_masterdata::StaticMasterDataStore;
//!
//! let autopilot = AutopilotBuilder::new(
//!     StaticRuleStore::new(),
//!     StaticCatalogStore::new(),
//!     StaticMasterDataStore::new(),
//! )
//! .build();
//!
//! let report = autopilot.apply(Stage::Base, "PROD-2025/26", activities).await?;
//! ```
//!
//! # Crate layout
//!
//! | Module          | Contents                                              |
//! |-----------------|----------------------------------------------------------|
//! | [`autopilot`]   | `Autopilot` — the four public entry points (spec §6)      |
//! | [`builder`]     | `AutopilotBuilder` — fluent construction                  |
//! | [`pipeline`]    | Shared stage plumbing behind `apply`/`apply_worktime_compliance` |
//! | [`cleanup`]     | `cleanupServiceBoundaries` (spec §6)                      |
//! | [`normalize_ids`]| `normalizeManagedServiceActivities` (spec §6)            |
//! | [`report`]      | `ApplyReport` — the `{upserts, deletedIds, touchedIds}` triple |
//! | [`error`]       | `AutopilotError`, `AutopilotResult`                        |

pub mod autopilot;
pub mod builder;
pub mod cleanup;
pub mod error;
pub mod normalize_ids;
pub mod pipeline;
pub mod report;

#[cfg(test)]
mod tests;

pub use autopilot::Autopilot;
pub use builder::AutopilotBuilder;
pub use cleanup::{CleanupEntry, CleanupReport};
pub use error::{AutopilotError, AutopilotResult};
pub use normalize_ids::{NormalizeEntry, NormalizeReport};
pub use report::ApplyReport;
