use thiserror::Error;

use relance_storage::error::StorageError;

#[derive(Debug, Error)]
pub enum SweepError {
    /// Listing the candidate set failed — nothing was processed; the next
    /// scheduled invocation retries from scratch.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
