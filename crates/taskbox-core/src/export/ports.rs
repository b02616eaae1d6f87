//! Collaborator ports for the export pipeline.
//!
//! The queue, blob store, and mail transport are external systems; the
//! worker and intake talk to them only through these traits. The queue
//! contract is at-least-once, unordered, no deduplication — tests simulate
//! duplicate delivery by replaying payloads.

use crate::export::ExportJob;
use async_trait::async_trait;
use thiserror::Error;

/// Queue send failure.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct QueueError(pub String);

/// Blob store failure.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct BlobError(pub String);

/// Mail transport failure.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct TransportError(pub String);

/// One-way job dispatch. Delivery to the worker happens out of band.
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn send(&self, job: &ExportJob) -> Result<(), QueueError>;
}

/// Artifact sink keyed by bucket and object key.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BlobError>;
}

/// Outbound email transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), TransportError>;
}

/// A fully composed outbound email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub attachment: Attachment,
}

/// Named binary attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
