//! Asynchronous export pipeline.
//!
//! Intake validates a request and enqueues a durable job; the worker
//! consumes jobs, renders the owner's records to CSV, persists the artifact,
//! and emails it. The two halves share nothing but the job payload.

pub mod csv;
pub mod identity;
pub mod memory;
pub mod ports;
pub mod smtp;
pub mod worker;

use crate::error::{TaskboxError, TaskboxResult};
use ports::JobQueue;
use serde::{Deserialize, Serialize};
use tracing::info;

pub use identity::{resolve_email, RequestContext};
pub use worker::{ExportWorker, QueueMessage};

/// A queued export request. Serialized as `{"pk": ..., "email": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportJob {
    pub pk: String,
    pub email: String,
}

/// Validate an export request and enqueue it.
///
/// Fire-and-forget: success means the job was accepted onto the queue, not
/// that the export completed. The queue is at-least-once, so a single
/// accepted request may ultimately produce more than one delivered email.
pub async fn request_export<Q: JobQueue>(
    queue: &Q,
    pk: &str,
    email: Option<&str>,
) -> TaskboxResult<ExportJob> {
    if pk.trim().is_empty() {
        return Err(TaskboxError::Validation(
            "query parameter 'pk' is required".to_string(),
        ));
    }
    let Some(email) = email.filter(|email| !email.trim().is_empty()) else {
        return Err(TaskboxError::Unauthorized(
            "caller email could not be resolved".to_string(),
        ));
    };

    let job = ExportJob {
        pk: pk.to_string(),
        email: email.to_string(),
    };
    queue.send(&job).await?;

    info!(pk = %job.pk, email = %job.email, "export job enqueued");
    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::memory::MemoryQueue;

    #[tokio::test]
    async fn accepted_request_enqueues_one_json_payload() {
        let queue = MemoryQueue::new();
        let job = request_export(&queue, "USER#42", Some("ana@example.com"))
            .await
            .unwrap();

        assert_eq!(job.pk, "USER#42");
        let payloads = queue.drain();
        assert_eq!(payloads.len(), 1);
        let parsed: ExportJob = serde_json::from_str(&payloads[0]).unwrap();
        assert_eq!(parsed, job);
    }

    #[tokio::test]
    async fn blank_owner_key_is_a_validation_error() {
        let queue = MemoryQueue::new();
        let err = request_export(&queue, " ", Some("ana@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, TaskboxError::Validation(_)));
        assert!(queue.drain().is_empty());
    }

    #[tokio::test]
    async fn missing_email_is_unauthorized_not_validation() {
        let queue = MemoryQueue::new();
        for email in [None, Some(""), Some("  ")] {
            let err = request_export(&queue, "USER#42", email).await.unwrap_err();
            assert!(matches!(err, TaskboxError::Unauthorized(_)));
        }
        assert!(queue.drain().is_empty());
    }
}
