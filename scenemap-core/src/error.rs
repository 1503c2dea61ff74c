use scenemap_model::{ModelError, RecordId};
use thiserror::Error;

use crate::xem::XemError;

/// Failures raised by record store adapters.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(RecordId),

    #[error("document must be a JSON object")]
    InvalidDocument,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] ModelError),

    #[cfg(feature = "database")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[cfg(feature = "database")]
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Errors surfaced by write paths and service wiring.
///
/// Lookups never return these; they degrade to identity numbering instead.
#[derive(Error, Debug)]
pub enum NumberingError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Xem(#[from] XemError),
}

pub type Result<T> = std::result::Result<T, NumberingError>;
