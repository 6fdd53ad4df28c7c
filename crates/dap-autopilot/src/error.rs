//! Hard-error taxonomy for the public entry point (spec §6 "Error surface",
//! SPEC_FULL.md §8): wraps [`ConfigError`] plus the store-fetch failures the
//! lower crates surface as their own error types.

use dap_config::error::CatalogError;
use dap_core::ConfigError;
use dap_masterdata::MasterDataError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AutopilotError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("catalog/rule store error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("master data store error: {0}")]
    MasterData(#[from] MasterDataError),
}

pub type AutopilotResult<T> = Result<T, AutopilotError>;
