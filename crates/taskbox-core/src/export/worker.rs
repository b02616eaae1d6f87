//! Export worker: consumes queued jobs and produces emailed CSV artifacts.
//!
//! Failure policy per message:
//! - unparsable payload or missing field: log, skip, never retried;
//! - owner with zero records: log, skip, no artifact and no email;
//! - any collaborator failure while rendering, storing, or mailing:
//!   propagate out of the batch so the queue redelivers. The worker has no
//!   retry loop of its own, and redelivery after a partial run may send a
//!   duplicate email — accepted under at-least-once delivery.

use crate::config::ExportConfig;
use crate::error::TaskboxResult;
use crate::export::ports::{Attachment, BlobStore, EmailMessage, Mailer};
use crate::export::{csv, ExportJob};
use crate::task;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use taskbox_store::TaskTable;
use tracing::{info, warn};

/// Attachment name on the outbound email.
const ATTACHMENT_NAME: &str = "task_report.csv";

const CSV_CONTENT_TYPE: &str = "text/csv";

/// One delivered queue message, body still raw.
#[derive(Debug, Clone)]
pub struct QueueMessage {
    pub id: String,
    pub body: String,
}

impl QueueMessage {
    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
        }
    }
}

/// Lenient mirror of [`ExportJob`] for parsing untrusted payloads.
#[derive(Debug, Default, Deserialize)]
struct RawJob {
    #[serde(default)]
    pk: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

/// Consumes export jobs against a table, a blob store, and a mailer.
pub struct ExportWorker<T, B, M> {
    table: Arc<T>,
    blobs: Arc<B>,
    mailer: Arc<M>,
    config: ExportConfig,
}

impl<T, B, M> ExportWorker<T, B, M>
where
    T: TaskTable,
    B: BlobStore,
    M: Mailer,
{
    pub fn new(table: Arc<T>, blobs: Arc<B>, mailer: Arc<M>, config: ExportConfig) -> Self {
        Self {
            table,
            blobs,
            mailer,
            config,
        }
    }

    /// Process one delivered batch in order.
    ///
    /// Malformed and empty-owner messages are skipped; the first
    /// collaborator failure aborts the rest of the batch and surfaces to
    /// the delivery system for redelivery.
    pub async fn process_batch(&self, messages: &[QueueMessage]) -> TaskboxResult<()> {
        for message in messages {
            let Some(job) = parse_job(message) else {
                continue;
            };
            self.process_job(&job).await?;
        }
        Ok(())
    }

    async fn process_job(&self, job: &ExportJob) -> TaskboxResult<()> {
        let tasks = task::list_children(self.table.as_ref(), &job.pk).await?;
        if tasks.is_empty() {
            info!(pk = %job.pk, "no records for owner, skipping export");
            return Ok(());
        }
        info!(pk = %job.pk, count = tasks.len(), "rendering export");

        let bytes = csv::render(&tasks);
        let key = artifact_key(&job.pk);

        self.blobs
            .put(&self.config.bucket_name, &key, bytes.clone(), CSV_CONTENT_TYPE)
            .await?;
        info!(bucket = %self.config.bucket_name, key = %key, "artifact stored");

        let message = EmailMessage {
            from: self.config.from_email.clone(),
            to: job.email.clone(),
            subject: "Your task report is ready".to_string(),
            text_body: format!(
                "Hello,\n\nYour requested task report is attached.\n\n\
                 A copy was also stored in your bucket under key: {key}\n"
            ),
            attachment: Attachment {
                file_name: ATTACHMENT_NAME.to_string(),
                content_type: CSV_CONTENT_TYPE.to_string(),
                bytes,
            },
        };
        self.mailer.send(message).await?;
        info!(to = %job.email, "export email dispatched");

        Ok(())
    }
}

/// Parse a raw payload into a job, or `None` for a malformed message.
///
/// Malformed messages are logged and dropped — retrying a permanently
/// unparsable payload would poison the queue.
fn parse_job(message: &QueueMessage) -> Option<ExportJob> {
    let raw: RawJob = match serde_json::from_str(&message.body) {
        Ok(raw) => raw,
        Err(error) => {
            warn!(id = %message.id, %error, "unparsable job payload, skipping");
            return None;
        }
    };

    let pk = raw.pk.filter(|pk| !pk.trim().is_empty());
    let email = raw.email.filter(|email| !email.trim().is_empty());
    match (pk, email) {
        (Some(pk), Some(email)) => Some(ExportJob { pk, email }),
        _ => {
            warn!(id = %message.id, "job payload missing pk or email, skipping");
            None
        }
    }
}

/// Blob key for one export run: path-safe owner token plus a timestamp, so
/// repeated exports for the same owner never overwrite each other.
fn artifact_key(pk: &str) -> String {
    format!(
        "exports/{}/{}.csv",
        pk.replace('#', "-"),
        Utc::now().timestamp_micros()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::memory::{MemoryBlobStore, MemoryMailer, MemoryQueue};
    use crate::export::request_export;
    use taskbox_store::{MemoryTable, TaskRecord};

    const BUCKET: &str = "export-artifacts";

    fn config() -> ExportConfig {
        ExportConfig {
            table_name: "tasks".to_string(),
            bucket_name: BUCKET.to_string(),
            from_email: "reports@taskbox.dev".to_string(),
            queue_url: "memory://exports".to_string(),
        }
    }

    fn worker(
        table: Arc<MemoryTable>,
        mailer: Arc<MemoryMailer>,
    ) -> (ExportWorker<MemoryTable, MemoryBlobStore, MemoryMailer>, Arc<MemoryBlobStore>) {
        let blobs = Arc::new(MemoryBlobStore::new());
        let worker = ExportWorker::new(table, Arc::clone(&blobs), mailer, config());
        (worker, blobs)
    }

    fn job_message(pk: &str, email: &str) -> QueueMessage {
        QueueMessage::new(
            "m1",
            serde_json::to_string(&ExportJob {
                pk: pk.to_string(),
                email: email.to_string(),
            })
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn owner_with_no_records_produces_nothing() {
        let table = Arc::new(MemoryTable::new());
        let mailer = Arc::new(MemoryMailer::new());
        let (worker, blobs) = worker(table, Arc::clone(&mailer));

        worker
            .process_batch(&[job_message("USER#42", "ana@example.com")])
            .await
            .unwrap();

        assert_eq!(blobs.object_count(), 0);
        assert_eq!(mailer.sent_count(), 0);
    }

    #[tokio::test]
    async fn single_record_renders_the_exact_contract_body() {
        let table = Arc::new(MemoryTable::new());
        table
            .put(TaskRecord::new("U#1", "T#1", Some("buy milk".to_string())))
            .await
            .unwrap();
        let mailer = Arc::new(MemoryMailer::new());
        let (worker, blobs) = worker(Arc::clone(&table), Arc::clone(&mailer));

        worker
            .process_batch(&[job_message("U#1", "ana@example.com")])
            .await
            .unwrap();

        let keys = blobs.keys(BUCKET);
        assert_eq!(keys.len(), 1);
        assert!(keys[0].starts_with("exports/U-1/"));
        assert!(keys[0].ends_with(".csv"));

        let expected = "\"pk\",\"sk\",\"description\"\n\"U#1\",\"T#1\",\"buy milk\"\n";
        assert_eq!(blobs.bytes(BUCKET, &keys[0]).unwrap(), expected.as_bytes());

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ana@example.com");
        assert_eq!(sent[0].from, "reports@taskbox.dev");
        assert_eq!(sent[0].attachment.file_name, "task_report.csv");
        assert_eq!(sent[0].attachment.bytes, expected.as_bytes());
        assert!(sent[0].text_body.contains(&keys[0]));
    }

    #[tokio::test]
    async fn malformed_message_is_skipped_without_blocking_the_batch() {
        let table = Arc::new(MemoryTable::new());
        table
            .put(TaskRecord::new("U#1", "T#1", Some("buy milk".to_string())))
            .await
            .unwrap();
        let mailer = Arc::new(MemoryMailer::new());
        let (worker, blobs) = worker(Arc::clone(&table), Arc::clone(&mailer));

        let batch = [
            QueueMessage::new("bad-json", "{not json"),
            QueueMessage::new("no-email", r#"{"pk":"U#1"}"#),
            QueueMessage::new("blank-pk", r#"{"pk":"  ","email":"x@example.com"}"#),
            job_message("U#1", "ana@example.com"),
        ];
        worker.process_batch(&batch).await.unwrap();

        assert_eq!(blobs.object_count(), 1);
        assert_eq!(mailer.sent_count(), 1);
    }

    #[tokio::test]
    async fn transport_failure_propagates_for_redelivery() {
        let table = Arc::new(MemoryTable::new());
        table
            .put(TaskRecord::new("U#1", "T#1", None))
            .await
            .unwrap();
        let mailer = Arc::new(MemoryMailer::failing());
        let (worker, blobs) = worker(Arc::clone(&table), mailer);

        let err = worker
            .process_batch(&[job_message("U#1", "ana@example.com")])
            .await
            .unwrap_err();
        assert!(matches!(err, crate::TaskboxError::Transport(_)));

        // The artifact was already stored before the send failed; a
        // redelivered job will store a second copy under a new key.
        assert_eq!(blobs.object_count(), 1);
    }

    #[tokio::test]
    async fn redelivered_job_produces_a_second_artifact_and_email() {
        let table = Arc::new(MemoryTable::new());
        table
            .put(TaskRecord::new("U#1", "T#1", Some("buy milk".to_string())))
            .await
            .unwrap();
        let mailer = Arc::new(MemoryMailer::new());
        let (worker, blobs) = worker(Arc::clone(&table), Arc::clone(&mailer));

        let queue = MemoryQueue::new();
        request_export(&queue, "U#1", Some("ana@example.com"))
            .await
            .unwrap();
        let payload = queue.drain().remove(0);

        // At-least-once: the same payload arrives twice.
        worker
            .process_batch(&[QueueMessage::new("d1", payload.clone())])
            .await
            .unwrap();
        worker
            .process_batch(&[QueueMessage::new("d2", payload)])
            .await
            .unwrap();

        assert_eq!(mailer.sent_count(), 2);
        assert_eq!(blobs.object_count(), 2);
    }
}
