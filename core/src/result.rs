//! Uniform result shapes handed back to callers of the API gateway.
//!
//! Every failed call is classified into a [`CallFailure`] and then turned into
//! a [`NormalizedResult`] by [`handle_error`], which is a pure function.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CANCELED_MESSAGE: &str = "canceled";
pub const TIMEOUT_MESSAGE: &str = "timeout";
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again later.";

/// Outcome of a call that did not succeed
#[derive(Debug, Clone, PartialEq)]
pub enum CallFailure {
    /// The caller cancelled the call before it resolved
    Canceled,
    /// The call exceeded the gateway timeout
    TimedOut,
    /// The server answered with a failure status
    Status { code: u16, body: Option<Value> },
    /// No usable response: connection refused, DNS failure, broken body, ...
    Transport(String),
    /// The session could not be read, so the request was never sent
    Storage(String),
}

/// Failure shape rendered by callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedResult {
    /// Always `false` for results built by [`handle_error`]
    pub status: bool,
    pub code: Option<u16>,
    pub message: String,
}

impl NormalizedResult {
    pub fn failure(code: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status: false,
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for NormalizedResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} ({})", self.message, code),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for NormalizedResult {}

/// Success shape built by callers from a raw response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub status: bool,
    pub data: Value,
}

impl ServiceResponse {
    pub fn new(data: Value) -> Self {
        Self { status: true, data }
    }
}

/// Outcome of a service call
pub type ApiResult = Result<ServiceResponse, NormalizedResult>;

/// Map a failed call to exactly one [`NormalizedResult`].
///
/// Precedence: cancellation, then timeout, then known failure statuses, then
/// the generic fallback. The 401 and 403 default labels are kept as the
/// backend's clients have always shown them.
pub fn handle_error(failure: &CallFailure) -> NormalizedResult {
    match failure {
        CallFailure::Canceled => NormalizedResult::failure(None, CANCELED_MESSAGE),
        CallFailure::TimedOut => NormalizedResult::failure(None, TIMEOUT_MESSAGE),
        CallFailure::Status { code, body } => {
            let code = *code;
            let default_message = match code {
                400 => "Bad request",
                401 => "Forbidden",
                403 => "Unauthorized",
                404 => return NormalizedResult::failure(Some(code), "Not found"),
                409 => return NormalizedResult::failure(Some(code), "Conflict"),
                413 => {
                    return NormalizedResult::failure(
                        Some(code),
                        "Selected profile picture is too large",
                    )
                }
                _ => return NormalizedResult::failure(None, FALLBACK_MESSAGE),
            };

            let message = body
                .as_ref()
                .and_then(server_message)
                .unwrap_or_else(|| default_message.to_string());
            NormalizedResult::failure(Some(code), message)
        }
        CallFailure::Transport(_) => NormalizedResult::failure(None, FALLBACK_MESSAGE),
        CallFailure::Storage(reason) => {
            NormalizedResult::failure(None, format!("Session storage unavailable: {}", reason))
        }
    }
}

/// Server-supplied explanation: `message`, then `detail`.
///
/// A field counts when it is truthy: `null`, `false`, `0` and `""` are skipped.
/// Strings are used as they are; other values are rendered as JSON text.
fn server_message(body: &Value) -> Option<String> {
    ["message", "detail"].iter().find_map(|field| match body.get(field)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status(code: u16, body: Option<Value>) -> CallFailure {
        CallFailure::Status { code, body }
    }

    #[test]
    fn test_canceled_and_timeout() {
        assert_eq!(
            handle_error(&CallFailure::Canceled),
            NormalizedResult::failure(None, "canceled")
        );
        assert_eq!(
            handle_error(&CallFailure::TimedOut),
            NormalizedResult::failure(None, "timeout")
        );
    }

    #[test]
    fn test_bad_request_with_server_message() {
        let result = handle_error(&status(400, Some(json!({"message": "X"}))));
        assert_eq!(
            result,
            NormalizedResult {
                status: false,
                code: Some(400),
                message: "X".to_string()
            }
        );
    }

    #[test]
    fn test_bad_request_default() {
        assert_eq!(
            handle_error(&status(400, None)),
            NormalizedResult::failure(Some(400), "Bad request")
        );
        assert_eq!(
            handle_error(&status(400, Some(json!({"errors": ["x"]})))),
            NormalizedResult::failure(Some(400), "Bad request")
        );
    }

    #[test]
    fn test_detail_is_second_choice() {
        let body = json!({"detail": "No active account found with the given credentials"});
        assert_eq!(
            handle_error(&status(401, Some(body))),
            NormalizedResult::failure(
                Some(401),
                "No active account found with the given credentials"
            )
        );

        let body = json!({"message": "first", "detail": "second"});
        assert_eq!(handle_error(&status(403, Some(body))).message, "first");

        let body = json!({"message": "", "detail": "second"});
        assert_eq!(handle_error(&status(400, Some(body))).message, "second");
    }

    #[test]
    fn test_auth_defaults_keep_legacy_labels() {
        assert_eq!(handle_error(&status(401, None)).message, "Forbidden");
        assert_eq!(handle_error(&status(403, None)).message, "Unauthorized");
    }

    #[test]
    fn test_truthy_message_values_are_used() {
        assert_eq!(handle_error(&status(403, Some(json!({"message": 12})))).message, "12");
        assert_eq!(handle_error(&status(400, Some(json!({"message": true})))).message, "true");
        assert_eq!(
            handle_error(&status(400, Some(json!({"detail": ["This field is required."]})))).message,
            "[\"This field is required.\"]"
        );
        assert_eq!(
            handle_error(&status(401, Some(json!({"message": {"email": "invalid"}})))).message,
            "{\"email\":\"invalid\"}"
        );
    }

    #[test]
    fn test_falsy_message_values_fall_through() {
        for falsy in [json!(null), json!(false), json!(0), json!("")] {
            let body = json!({"message": falsy.clone(), "detail": "second"});
            assert_eq!(handle_error(&status(400, Some(body))).message, "second");

            let body = json!({"message": falsy, "detail": falsy});
            assert_eq!(handle_error(&status(403, Some(body))).message, "Unauthorized");
        }
    }

    #[test]
    fn test_fixed_messages_ignore_body() {
        let body = Some(json!({"message": "ignored", "detail": "ignored"}));
        assert_eq!(
            handle_error(&status(404, body.clone())),
            NormalizedResult::failure(Some(404), "Not found")
        );
        assert_eq!(
            handle_error(&status(409, body.clone())),
            NormalizedResult::failure(Some(409), "Conflict")
        );
        assert_eq!(
            handle_error(&status(413, body)),
            NormalizedResult::failure(Some(413), "Selected profile picture is too large")
        );
    }

    #[test]
    fn test_fallback() {
        let expected = NormalizedResult::failure(None, FALLBACK_MESSAGE);
        assert_eq!(handle_error(&status(500, Some(json!({"message": "boom"})))), expected);
        assert_eq!(handle_error(&status(422, None)), expected);
        assert_eq!(
            handle_error(&CallFailure::Transport("connection refused".to_string())),
            expected
        );
    }

    #[test]
    fn test_storage_failure_is_reported() {
        let result = handle_error(&CallFailure::Storage("Storage lock poisoned: x".to_string()));
        assert_eq!(result.code, None);
        assert_eq!(
            result.message,
            "Session storage unavailable: Storage lock poisoned: x"
        );
    }

    #[test]
    fn test_is_pure() {
        let failure = status(400, Some(json!({"detail": "bad"})));
        assert_eq!(handle_error(&failure), handle_error(&failure));
        assert!(!handle_error(&failure).status);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            NormalizedResult::failure(Some(404), "Not found").to_string(),
            "Not found (404)"
        );
        assert_eq!(NormalizedResult::failure(None, "timeout").to_string(), "timeout");
    }
}
