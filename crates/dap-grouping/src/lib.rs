//! `dap-grouping` — Metadata Normalizer and Grouper (spec §4.2-4.3).
//!
//! # Crate layout
//!
//! | Module        | Contents                                          |
//! |---------------|-----------------------------------------------------|
//! | [`normalizer`]| Strips stale per-owner service mappings (spec §4.2) |
//! | [`grouper`]   | Partitions activities into duties (spec §4.3)        |
//!
//! Both stages are pure, total functions over the in-memory activity map —
//! neither can fail (spec §7: grouping has no hard-error surface), mirroring
//! `dt_schedule::loader`'s CSV loader being the only fallible stage in that
//! crate while everything downstream of it is infallible.

pub mod grouper;
pub mod normalizer;

#[cfg(test)]
mod tests;

pub use grouper::{group, GroupingResult};
pub use normalizer::normalize;
