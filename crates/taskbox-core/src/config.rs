//! Explicit configuration structs.
//!
//! Business logic never reads ambient process state; `from_env` lives here
//! at the edge and components receive the resulting structs.

use crate::error::{TaskboxError, TaskboxResult};

/// Default SMTP port (STARTTLS).
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Configuration for the export pipeline.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Logical name of the tasks table.
    pub table_name: String,
    /// Bucket receiving export artifacts.
    pub bucket_name: String,
    /// Verified sender address for the export email.
    pub from_email: String,
    /// URL of the export job queue.
    pub queue_url: String,
}

impl ExportConfig {
    /// Read from the environment: `TASKS_TABLE`, `S3_BUCKET_NAME`,
    /// `SES_FROM_EMAIL`, `SQS_QUEUE_URL`. All four are required.
    pub fn from_env() -> TaskboxResult<Self> {
        Ok(Self {
            table_name: required_var("TASKS_TABLE")?,
            bucket_name: required_var("S3_BUCKET_NAME")?,
            from_email: required_var("SES_FROM_EMAIL")?,
            queue_url: required_var("SQS_QUEUE_URL")?,
        })
    }
}

/// Configuration for the SMTP mailer.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP server hostname.
    pub host: String,
    /// SMTP server port.
    pub port: u16,
    /// SMTP username.
    pub username: String,
    /// SMTP password.
    pub password: String,
}

impl SmtpConfig {
    /// Read from the environment: `SMTP_HOST`, `SMTP_USERNAME`,
    /// `SMTP_PASSWORD` required; `SMTP_PORT` defaults to 587.
    pub fn from_env() -> TaskboxResult<Self> {
        let port = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SMTP_PORT);

        Ok(Self {
            host: required_var("SMTP_HOST")?,
            port,
            username: required_var("SMTP_USERNAME")?,
            password: required_var("SMTP_PASSWORD")?,
        })
    }
}

fn required_var(name: &str) -> TaskboxResult<String> {
    std::env::var(name)
        .map_err(|_| TaskboxError::Config(format!("environment variable {name} not set")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variable_is_named_in_the_error() {
        // Serialized by var name; no other test touches this one.
        std::env::remove_var("TASKS_TABLE");
        let err = ExportConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("TASKS_TABLE"));
    }
}
