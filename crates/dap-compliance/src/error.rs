use thiserror::Error;

/// Hard errors for the compliance layer (spec §7 — soft findings never
/// produce an `Err`; they become conflict codes).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComplianceError {
    #[error("compliance pass received an inconsistent duty snapshot: {0}")]
    InvalidSnapshot(String),
}

pub type ComplianceResult<T> = Result<T, ComplianceError>;
