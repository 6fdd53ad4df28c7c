//! Hard-error taxonomy. Sub-crates define their own error enums and convert
//! into `ConfigError` via `From` impls, or wrap it as one variant — both
//! patterns are acceptable; prefer whichever keeps error sites clean.

use thiserror::Error;

/// Errors that abort an `apply` call outright (spec §7 "hard errors").
///
/// Every other failure mode (missing walk time, unparseable timestamp,
/// unknown owner kind, …) is a *soft* error: it becomes a conflict code
/// written onto an activity, never a `Result::Err`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no catalog entry satisfies mandatory role {0:?}")]
    MissingRole(String),

    #[error("invalid configuration parameter at {0}")]
    InvalidParam(String),

    #[error("malformed ruleset id or version: {0}")]
    MalformedRuleset(String),
}

/// Shorthand result type for configuration resolution.
pub type ConfigResult<T> = Result<T, ConfigError>;
