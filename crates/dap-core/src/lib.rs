//! `dap-core` — foundational types for the duty autopilot.
//!
//! This crate is a dependency of every other `dap-*` crate. It intentionally
//! has no `dap-*` dependencies and minimal external ones (only `chrono` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                |
//! |--------------|----------------------------------------------------------|
//! | [`ids`]      | `ServiceId`, `ManagedId`, `Owner`, `OwnerKind`, `Stage`   |
//! | [`code`]     | `Code`, `KnownCode`, `Severity` — the conflict taxonomy   |
//! | [`calendar`] | Timetable-year bounds, Sunday-like rest day detection     |
//! | [`error`]    | `ConfigError`, `ConfigResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod calendar;
pub mod code;
pub mod error;
pub mod ids;

#[cfg(test)]
mod tests;

pub use calendar::{is_sunday_like, parse_variant_year, timetable_year_bounds};
pub use code::{Code, KnownCode, Severity};
pub use error::{ConfigError, ConfigResult};
pub use ids::{
    ActivityTypeId, ManagedId, Owner, OwnerKind, ParticipantKind, PauseDirection, ServiceId, Stage,
};
