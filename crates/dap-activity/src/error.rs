use thiserror::Error;

/// Soft-error-adjacent parse failures local to the activity model itself.
///
/// These never abort an `apply` call (spec §7: "soft errors annotate, never
/// throw") — callers parsing raw payload data into `Activity` decide whether
/// to drop or annotate the offending row. The type exists so that decision
/// is made once, at the data-model boundary, not re-litigated in every
/// caller of `Activity::start_location`/`end_location`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActivityError {
    #[error("activity {0:?} has an unparseable or missing start timestamp")]
    UnparseableStart(String),
}

pub type ActivityResult<T> = Result<T, ActivityError>;
