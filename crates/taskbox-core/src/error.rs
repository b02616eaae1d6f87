//! Centralized error types for Taskbox.

use thiserror::Error;

/// Main error type for Taskbox operations.
///
/// `Validation`, `NotFound`, and `Unauthorized` are caller-correctable and
/// resolve at the operation boundary. The collaborator variants (`Store`,
/// `Queue`, `Blob`, `Transport`) are not; during export-job processing they
/// propagate so the queue's redelivery mechanism retries the job.
#[derive(Error, Debug)]
pub enum TaskboxError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(#[from] taskbox_store::StoreError),

    #[error("Queue error: {0}")]
    Queue(#[from] crate::export::ports::QueueError),

    #[error("Blob store error: {0}")]
    Blob(#[from] crate::export::ports::BlobError),

    #[error("Mail transport error: {0}")]
    Transport(#[from] crate::export::ports::TransportError),
}

/// Result type for Taskbox operations.
pub type TaskboxResult<T> = Result<T, TaskboxError>;
