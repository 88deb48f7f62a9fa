//! Normalized outcomes of a forwarded call.
//!
//! Every call ends in exactly one of these shapes:
//! - [`NormalizedResponse`] for 2xx answers from the target.
//! - [`NormalizedError`] for everything else, tagged with an [`ErrorKind`].

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Response headers, one value per name (last one wins).
pub type HeaderMapping = BTreeMap<String, String>;

/// Details used when an error body cannot be read at all.
pub const NO_ERROR_DETAILS: &str = "No error details available";

/// Details of a validation failure for a missing URL.
pub const URL_REQUIRED: &str = "URL is required";

/// Fixed status to message table.
const ERROR_MESSAGES: [(u16, &str); 6] = [
    (400, "Bad Request: Invalid request format or parameters."),
    (401, "Unauthorized: Invalid JWT/credentials or missing authentication token."),
    (404, "Not Found: The requested resource could not be found."),
    (408, "Request Timeout: Response sent on an idle connection by some servers."),
    (500, "Internal Server Error: An unexpected error occurred on the server."),
    (503, "Service Unavailable: The server is not ready to handle the request."),
];

/// Looks up the fixed message for a status code.
pub fn error_message(status: u16) -> Option<&'static str> {
    ERROR_MESSAGES
        .iter()
        .find(|(code, _)| *code == status)
        .map(|(_, message)| *message)
}

/// Table message, or `HTTP Error {status}: {status_text}` for unlisted codes.
pub fn message_for(status: u16, status_text: &str) -> String {
    error_message(status)
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP Error {}: {}", status, status_text))
}

/// A successful (2xx) answer from the target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: HeaderMapping,
    pub data: Value,
}

/// Classification of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The description was rejected before any network activity.
    Validation,
    /// The target answered with a non-2xx status.
    TargetHttp,
    /// The per-call deadline fired.
    Timeout,
    /// Anything else: DNS, refused connection, TLS, undecodable response.
    Transport,
}

impl ErrorKind {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::TargetHttp => "target_http",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Transport => "transport",
        }
    }
}

/// A failed call, shaped the way the client expects it.
///
/// Validation, timeout and transport failures serialize as
/// `{error, status, details}`; target failures additionally carry
/// `statusText` and `headers`.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct NormalizedError {
    #[serde(skip)]
    pub kind: ErrorKind,

    pub status: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,

    #[serde(rename = "error")]
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HeaderMapping>,

    pub details: Value,
}

impl NormalizedError {
    fn local(kind: ErrorKind, status: u16, details: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            status_text: None,
            message: message_for(status, ""),
            headers: None,
            details: Value::String(details.into()),
        }
    }

    /// 400 for a description that cannot be forwarded.
    pub fn validation(details: impl Into<String>) -> Self {
        Self::local(ErrorKind::Validation, 400, details)
    }

    /// Synthetic 408 for a call cancelled by its deadline.
    pub fn timeout(details: impl Into<String>) -> Self {
        Self::local(ErrorKind::Timeout, 408, details)
    }

    /// 500 for any failure that is not a timeout or an HTTP status.
    pub fn transport(details: impl Into<String>) -> Self {
        Self::local(ErrorKind::Transport, 500, details)
    }

    /// Non-2xx answer from the target; the status is kept as-is.
    pub fn target(status: u16, status_text: String, headers: HeaderMapping, details: Value) -> Self {
        Self {
            kind: ErrorKind::TargetHttp,
            status,
            message: message_for(status, &status_text),
            status_text: Some(status_text),
            headers: Some(headers),
            details,
        }
    }
}
