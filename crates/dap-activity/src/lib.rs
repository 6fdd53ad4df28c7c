//! `dap-activity` — the `Activity`/`Duty` data model (spec §3).
//!
//! # Crate layout
//!
//! | Module         | Contents                                               |
//! |----------------|---------------------------------------------------------|
//! | [`attributes`] | `ActivityAttributes`, `ServiceByOwnerEntry`, `WithinService` |
//! | [`participant`]| `Participant`, owner resolution                         |
//! | [`activity`]   | `Activity`, `ServiceRole`, location resolution           |
//! | [`duty`]       | `Duty` — the synthesized per-owner-per-day container    |
//! | [`error`]      | `ActivityError`, `ActivityResult`                        |
//!
//! # Design
//!
//! Per the "Attributes as tagged records" design note, the ambient
//! `attributes` free-form map from spec §3 is re-modeled as a typed struct
//! with every reserved key as an explicit field, plus a residual
//! `extras: serde_json::Map<..>` bag for anything the caller stored that this
//! crate does not interpret. This localizes every read/write of a reserved
//! key to one place instead of scattering string-keyed map accesses across
//! the pipeline.

pub mod activity;
pub mod attributes;
pub mod duty;
pub mod error;
pub mod participant;

#[cfg(test)]
mod tests;

pub use activity::{Activity, ServiceRole};
pub use attributes::{ActivityAttributes, ServiceByOwnerEntry, WithinService};
pub use duty::Duty;
pub use error::{ActivityError, ActivityResult};
pub use participant::Participant;
