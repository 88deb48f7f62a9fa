//! The request forwarder.
//!
//! `forward` is a single attempt:
//! prepare → pick client → arm deadline → send → classify.
//! The outcome is exactly one [`NormalizedResponse`] or one
//! [`NormalizedError`].

use axum::http::Extensions;
use hyper::ext::ReasonPhrase;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::{Duration, Instant};

use crate::config::ForwardingConfig;
use crate::forward::description::OutgoingRequestDescription;
use crate::forward::error::TransportError;
use crate::forward::client::ClientSet;
use crate::forward::outcome::{
    ErrorKind, HeaderMapping, NormalizedError, NormalizedResponse, NO_ERROR_DETAILS,
};
use crate::forward::prepare::{prepare, Payload, PreparedRequest};
use crate::observability::metrics;
use crate::resilience::Deadline;

/// Forwards client-described requests to arbitrary targets.
///
/// Holds only immutable state, so one instance can serve any number of
/// concurrent calls.
#[derive(Debug, Clone)]
pub struct Forwarder {
    clients: ClientSet,
    default_timeout: Duration,
}

impl Forwarder {
    pub fn new(config: &ForwardingConfig) -> Result<Self, TransportError> {
        Ok(Self {
            clients: ClientSet::new(config)?,
            default_timeout: Duration::from_millis(config.default_timeout_ms),
        })
    }

    /// Timeout used when a description does not set one.
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Issue the described request and normalize whatever comes back.
    pub async fn forward(
        &self,
        description: &OutgoingRequestDescription,
    ) -> Result<NormalizedResponse, NormalizedError> {
        let started = Instant::now();
        let outcome = self.dispatch(description).await;

        let label = match &outcome {
            Ok(_) => "success",
            Err(err) => err.kind.as_str(),
        };
        metrics::record_forward(label, started);

        match &outcome {
            Ok(response) => tracing::debug!(
                method = %description.method_name(),
                url = description.url.as_deref().unwrap_or_default(),
                status = response.status,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Forwarded request"
            ),
            Err(err) if err.kind == ErrorKind::TargetHttp => tracing::debug!(
                method = %description.method_name(),
                url = description.url.as_deref().unwrap_or_default(),
                status = err.status,
                "Target returned an error status"
            ),
            Err(err) => tracing::warn!(
                method = %description.method_name(),
                url = description.url.as_deref().unwrap_or_default(),
                kind = err.kind.as_str(),
                status = err.status,
                details = %err.details,
                "Forwarding failed"
            ),
        }

        outcome
    }

    async fn dispatch(
        &self,
        description: &OutgoingRequestDescription,
    ) -> Result<NormalizedResponse, NormalizedError> {
        let request = prepare(description, self.default_timeout)?;
        let client = self.clients.select(request.follow_redirects, request.verify_tls);

        // Dropped on every path below, which releases the timer.
        let deadline = Deadline::arm(request.timeout);
        match deadline.guard(exchange(client, request)).await {
            Ok(outcome) => outcome,
            Err(aborted) => Err(NormalizedError::timeout(aborted.to_string())),
        }
    }
}

/// Send the request and read the whole response.
async fn exchange(
    client: &Client,
    request: PreparedRequest,
) -> Result<NormalizedResponse, NormalizedError> {
    let response = build_request(client, request)
        .send()
        .await
        .map_err(TransportError::from)?;

    let status = response.status();
    let status_text = reason_phrase(status, response.extensions());
    let headers = collect_headers(response.headers());

    if !status.is_success() {
        let details = decode_error_body(response.bytes().await);
        return Err(NormalizedError::target(status.as_u16(), status_text, headers, details));
    }

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    let body = response.bytes().await.map_err(TransportError::from)?;
    let data = if is_json {
        serde_json::from_slice(&body).map_err(TransportError::from)?
    } else {
        Value::String(String::from_utf8_lossy(&body).into_owned())
    };

    Ok(NormalizedResponse {
        status: status.as_u16(),
        status_text,
        headers,
        data,
    })
}

fn build_request(client: &Client, request: PreparedRequest) -> RequestBuilder {
    let builder = client
        .request(request.method, request.url)
        .headers(request.headers);

    match request.payload {
        Payload::Empty => builder,
        Payload::Text(body) | Payload::UrlEncoded(body) => builder.body(body),
        Payload::Multipart(fields) => {
            let form = fields
                .into_iter()
                .fold(Form::new(), |form, (key, value)| form.text(key, value));
            builder.multipart(form)
        }
    }
}

/// Reason phrase as the target sent it. hyper only records it when it
/// differs from the canonical one.
pub fn reason_phrase(status: StatusCode, extensions: &Extensions) -> String {
    match extensions.get::<ReasonPhrase>() {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
        None => status.canonical_reason().unwrap_or_default().to_string(),
    }
}

/// Flatten response headers; a repeated name keeps its last value.
pub fn collect_headers(headers: &HeaderMap) -> HeaderMapping {
    let mut mapping = HeaderMapping::new();
    for (name, value) in headers {
        mapping.insert(
            name.as_str().to_string(),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        );
    }
    mapping
}

/// Details for a non-2xx response: JSON, else text, else a placeholder.
/// The first step that succeeds wins.
pub fn decode_error_body<B: AsRef<[u8]>, E>(body: Result<B, E>) -> Value {
    let Ok(body) = body else {
        return Value::String(NO_ERROR_DETAILS.to_string());
    };
    let bytes = body.as_ref();

    if let Ok(json) = serde_json::from_slice::<Value>(bytes) {
        return json;
    }
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Value::String(text.to_string());
    }
    Value::String(NO_ERROR_DETAILS.to_string())
}
