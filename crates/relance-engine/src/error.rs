use thiserror::Error;

use relance_storage::error::StorageError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),

    #[error("questionnaire not found or expired")]
    NotFound,

    #[error("questionnaire already completed")]
    AlreadyCompleted,

    #[error("questionnaire belongs to another practitioner")]
    Forbidden,

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Collapse a storage miss into the domain-level not-found; everything else
/// stays a (fatal) storage error.
pub(crate) fn or_not_found(e: StorageError) -> EngineError {
    match e {
        StorageError::NotFound { .. } => EngineError::NotFound,
        other => EngineError::Storage(other),
    }
}
