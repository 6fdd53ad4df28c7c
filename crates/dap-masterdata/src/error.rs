use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MasterDataError {
    #[error("master data store unavailable: {0}")]
    Unavailable(String),
}

pub type MasterDataResult<T> = Result<T, MasterDataError>;
