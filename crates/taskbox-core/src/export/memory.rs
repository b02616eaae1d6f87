//! In-memory collaborator implementations.
//!
//! Used by tests and local runs. `MemoryQueue` stores raw payload strings
//! so tests can inject malformed bodies and replay a payload to simulate
//! the queue's at-least-once redelivery.

use crate::export::ports::{Attachment, BlobError, BlobStore, EmailMessage, JobQueue, Mailer, QueueError, TransportError};
use crate::export::ExportJob;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// In-memory job queue.
#[derive(Debug, Default)]
pub struct MemoryQueue {
    payloads: Mutex<VecDeque<String>>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a raw payload, bypassing serialization. Lets tests deliver
    /// malformed bodies the way a real queue would.
    pub fn push_raw(&self, payload: impl Into<String>) {
        self.payloads
            .lock()
            .expect("queue lock poisoned")
            .push_back(payload.into());
    }

    /// Take every queued payload, in arrival order.
    pub fn drain(&self) -> Vec<String> {
        self.payloads
            .lock()
            .expect("queue lock poisoned")
            .drain(..)
            .collect()
    }
}

#[async_trait]
impl JobQueue for MemoryQueue {
    async fn send(&self, job: &ExportJob) -> Result<(), QueueError> {
        let payload =
            serde_json::to_string(job).map_err(|e| QueueError(format!("encode job: {e}")))?;
        self.push_raw(payload);
        Ok(())
    }
}

/// In-memory blob store keyed by `(bucket, key)`.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: Mutex<HashMap<(String, String), (String, Vec<u8>)>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().expect("blob lock poisoned").len()
    }

    /// Fetch stored bytes by bucket and key.
    pub fn bytes(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .expect("blob lock poisoned")
            .get(&(bucket.to_string(), key.to_string()))
            .map(|(_, bytes)| bytes.clone())
    }

    /// All stored object keys under a bucket.
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.objects
            .lock()
            .expect("blob lock poisoned")
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BlobError> {
        self.objects.lock().expect("blob lock poisoned").insert(
            (bucket.to_string(), key.to_string()),
            (content_type.to_string(), bytes),
        );
        Ok(())
    }
}

/// Recording mailer; optionally fails every send.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<EmailMessage>>,
    fail: bool,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send fails, for retry-path tests.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("mailer lock poisoned").clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("mailer lock poisoned").len()
    }

    /// The attachment of the most recent message, if any.
    pub fn last_attachment(&self) -> Option<Attachment> {
        self.sent
            .lock()
            .expect("mailer lock poisoned")
            .last()
            .map(|message| message.attachment.clone())
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), TransportError> {
        if self.fail {
            return Err(TransportError("simulated transport failure".to_string()));
        }
        self.sent.lock().expect("mailer lock poisoned").push(message);
        Ok(())
    }
}
