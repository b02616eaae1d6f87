//! Caller identity resolution.
//!
//! The identity provider attaches an authorizer payload to the request; the
//! only claim this system needs is the verified email. Resolution is typed:
//! either an email comes back or the caller is unauthorized — no downstream
//! code digs through claim maps.

use crate::error::{TaskboxError, TaskboxResult};
use serde_json::Value;
use tracing::debug;

/// The slice of request context the export intake needs.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Raw authorizer payload as attached by the identity provider,
    /// expected shape `{ "claims": { "email": "..." } }`.
    pub authorizer: Option<Value>,
}

impl RequestContext {
    pub fn new(authorizer: Option<Value>) -> Self {
        Self { authorizer }
    }
}

/// Resolve the caller's email from the authorizer claims.
///
/// A missing authorizer, missing claims object, or missing/blank email are
/// all the same outcome: `Unauthorized`.
pub fn resolve_email(ctx: &RequestContext) -> TaskboxResult<String> {
    let email = ctx
        .authorizer
        .as_ref()
        .and_then(|auth| auth.get("claims"))
        .and_then(|claims| claims.get("email"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|email| !email.is_empty());

    match email {
        Some(email) => {
            debug!(email = %email, "caller identity resolved");
            Ok(email.to_string())
        }
        None => Err(TaskboxError::Unauthorized(
            "no email claim in request context".to_string(),
        )),
    }
}
