//! `dap-config` — rule/catalog store traits, the activity-type resolver,
//! and `ResolvedConfig` for the duty autopilot.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                       |
//! |-------------|-----------------------------------------------------------------|
//! | [`catalog`] | `CatalogStore` trait, `CatalogEntry`, `Role`                   |
//! | [`rules`]   | `RuleStore` trait, `RawRuleParams`                              |
//! | [`azg`]     | `AzgConfig` and the per-rule parameter structs                  |
//! | [`resolved`]| `ResolvedConfig` — the materialized, typed configuration snapshot |
//! | [`resolver`]| The type resolver (spec §4.1)                                   |
//! | [`static_store`] | In-memory `StaticCatalogStore`/`StaticRuleStore` for tests/demos |
//!
//! # Design
//!
//! `CatalogStore`/`RuleStore` are `async_trait` seams; the only `await`
//! point in the whole pipeline (spec §5) is fetching their snapshots at the
//! top of `apply`. Everything downstream is synchronous.

pub mod azg;
pub mod catalog;
pub mod error;
pub mod resolved;
pub mod resolver;
pub mod rules;
pub mod static_store;


pub use azg::*;
pub use catalog::{CatalogEntry, CatalogStore, Role};
pub use error::{CatalogError, CatalogResult};
pub use resolved::{Bounds, ResolvedConfig};
pub use resolver::resolve_config;
pub use rules::{RawRuleParams, RuleStore};
pub use static_store::{StaticCatalogStore, StaticRuleStore};
