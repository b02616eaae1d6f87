//! SMTP implementation of the mailer port.

use crate::config::SmtpConfig;
use crate::export::ports::{EmailMessage, Mailer, TransportError};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment as MimeAttachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

/// Sends export emails over STARTTLS SMTP.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build a transport from explicit configuration.
    pub fn new(config: &SmtpConfig) -> Result<Self, TransportError> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| TransportError(format!("smtp transport: {e}")))?
            .port(config.port)
            .credentials(creds)
            .build();
        Ok(Self { transport })
    }

    fn compose(message: &EmailMessage) -> Result<Message, TransportError> {
        let from: Mailbox = message
            .from
            .parse()
            .map_err(|e| TransportError(format!("invalid from address: {e}")))?;
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| TransportError(format!("invalid to address: {e}")))?;
        let attachment_type = ContentType::parse(&message.attachment.content_type)
            .map_err(|e| TransportError(format!("invalid attachment content type: {e}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(&message.subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(message.text_body.clone()),
                    )
                    .singlepart(
                        MimeAttachment::new(message.attachment.file_name.clone())
                            .body(message.attachment.bytes.clone(), attachment_type),
                    ),
            )
            .map_err(|e| TransportError(format!("compose message: {e}")))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), TransportError> {
        let to = message.to.clone();
        let email = Self::compose(&message)?;
        self.transport
            .send(email)
            .await
            .map_err(|e| TransportError(format!("smtp send: {e}")))?;
        info!(to = %to, "email sent over SMTP");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ports::Attachment;

    #[test]
    fn compose_builds_a_multipart_message() {
        let message = EmailMessage {
            from: "reports@taskbox.dev".to_string(),
            to: "ana@example.com".to_string(),
            subject: "Your task report is ready".to_string(),
            text_body: "Hello,\n\nYour report is attached.\n".to_string(),
            attachment: Attachment {
                file_name: "task_report.csv".to_string(),
                content_type: "text/csv".to_string(),
                bytes: b"\"pk\",\"sk\",\"description\"\n".to_vec(),
            },
        };

        let email = SmtpMailer::compose(&message).unwrap();
        let rendered = String::from_utf8(email.formatted()).unwrap();
        assert!(rendered.contains("Subject: Your task report is ready"));
        assert!(rendered.contains("task_report.csv"));
    }

    #[test]
    fn compose_rejects_an_invalid_recipient() {
        let message = EmailMessage {
            from: "reports@taskbox.dev".to_string(),
            to: "not an address".to_string(),
            subject: "s".to_string(),
            text_body: "b".to_string(),
            attachment: Attachment {
                file_name: "a.csv".to_string(),
                content_type: "text/csv".to_string(),
                bytes: Vec::new(),
            },
        };
        assert!(SmtpMailer::compose(&message).is_err());
    }
}
