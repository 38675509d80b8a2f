//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::SetupError;
use storage::StorageError;

/// Errors emitted by exam services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExamServiceError {
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("exam session runner has stopped")]
    RunnerClosed,
}
