use schema::{EntityId, PoolId, TrainerId};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while answering a query against the loaded indexes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The trainer id is not present in the trainers file
    #[error("trainer_id not found: {0}")]
    TrainerNotFound(TrainerId),
    /// The pool id is not present in the pools file
    #[error("pool_id not found: {0}")]
    PoolNotFound(PoolId),
    /// No set record backs this global id
    #[error("global_id {0} not found in sets index")]
    EntityNotFound(EntityId),
    /// The offline indexes contradict each other
    #[error("data integrity error: {0}")]
    DataIntegrity(String),
    /// The request itself is unusable (e.g. an empty search query)
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LookupError::TrainerNotFound(_)
                | LookupError::PoolNotFound(_)
                | LookupError::EntityNotFound(_)
        )
    }
}

/// Errors raised while loading the data directory at startup
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("required file missing: {path}\nHint: {hint}")]
    MissingFile { path: PathBuf, hint: &'static str },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("loaded indexes are inconsistent: {0}")]
    Integrity(#[from] LookupError),
}

/// Type alias for Results using LookupError
pub type LookupResult<T> = Result<T, LookupError>;

/// Type alias for Results using LoadError
pub type LoadResult<T> = Result<T, LoadError>;
