//! Outgoing request descriptions as sent by the client UI.
//!
//! The JSON shape mirrors what the front end posts to `/api/proxy`:
//!
//! ```json
//! {
//!   "method": "POST",
//!   "url": "https://api.example.com/items",
//!   "headers": [{ "key": "Accept", "value": "application/json" }],
//!   "bodyType": "raw",
//!   "body": { "content": "{\"name\":\"x\"}" },
//!   "settings": { "timeout": 5000, "followRedirects": true, "sslVerification": true }
//! }
//! ```
//!
//! Fields are lenient: anything missing or `null` falls back to its default
//! and presence checks happen in [`crate::forward::prepare`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Timeouts arrive as integers, floats or numeric strings. Anything else
/// reads as absent. Fractions are truncated.
fn lenient_millis<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f as i64),
        _ => None,
    };
    Ok(millis)
}

/// A single `{key, value}` pair used for headers and form bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyValue {
    pub key: Option<String>,
    pub value: Option<String>,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
        }
    }

    /// Returns the pair only when both sides are non-empty.
    pub fn as_pair(&self) -> Option<(&str, &str)> {
        match (self.key.as_deref(), self.value.as_deref()) {
            (Some(k), Some(v)) if !k.is_empty() && !v.is_empty() => Some((k, v)),
            _ => None,
        }
    }
}

/// How the request body should be encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BodyType {
    #[default]
    None,
    Raw,
    FormData,
    Urlencoded,
    /// Any body type the forwarder does not know; sent without a body.
    #[serde(other)]
    Unsupported,
}

/// Body payloads keyed by [`BodyType`]. Only the member matching the
/// selected body type is read.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestBody {
    /// Raw content. Strings are sent verbatim, other JSON values are sent
    /// as their JSON text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,

    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub form_data: Vec<KeyValue>,

    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub urlencoded: Vec<KeyValue>,
}

impl RequestBody {
    /// Raw content as the text that goes on the wire.
    pub fn raw_text(&self) -> String {
        match &self.content {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// Per-call transport settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForwardSettings {
    /// Timeout in milliseconds. `None` and `0` both select the default;
    /// a negative value expires immediately.
    #[serde(
        alias = "timeoutMs",
        deserialize_with = "lenient_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_redirects: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_verification: Option<bool>,
}

impl ForwardSettings {
    /// Effective timeout. A zero timeout collapses to `default` instead of
    /// disabling the deadline.
    pub fn timeout_or(&self, default: Duration) -> Duration {
        match self.timeout {
            Some(ms) if ms > 0 => Duration::from_millis(ms.unsigned_abs()),
            Some(ms) if ms < 0 => Duration::ZERO,
            _ => default,
        }
    }

    /// Redirects are followed unless explicitly disabled.
    pub fn follows_redirects(&self) -> bool {
        self.follow_redirects != Some(false)
    }

    /// Certificates are verified unless explicitly disabled.
    pub fn verifies_tls(&self) -> bool {
        self.ssl_verification != Some(false)
    }
}

/// Everything needed to issue one outgoing request.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutgoingRequestDescription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub headers: Vec<KeyValue>,

    #[serde(deserialize_with = "null_as_default")]
    pub body_type: BodyType,

    #[serde(deserialize_with = "null_as_default")]
    pub body: RequestBody,

    #[serde(deserialize_with = "null_as_default")]
    pub settings: ForwardSettings,
}

impl OutgoingRequestDescription {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(KeyValue::new(key, value));
        self
    }

    pub fn raw(mut self, content: impl Into<String>) -> Self {
        self.body_type = BodyType::Raw;
        self.body.content = Some(Value::String(content.into()));
        self
    }

    pub fn form_data(mut self, pairs: Vec<KeyValue>) -> Self {
        self.body_type = BodyType::FormData;
        self.body.form_data = pairs;
        self
    }

    pub fn urlencoded(mut self, pairs: Vec<KeyValue>) -> Self {
        self.body_type = BodyType::Urlencoded;
        self.body.urlencoded = pairs;
        self
    }

    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.settings.timeout = Some(i64::try_from(ms).unwrap_or(i64::MAX));
        self
    }

    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.settings.follow_redirects = Some(follow);
        self
    }

    pub fn ssl_verification(mut self, verify: bool) -> Self {
        self.settings.ssl_verification = Some(verify);
        self
    }

    /// Upper-cased method name; a missing method means `GET`.
    pub fn method_name(&self) -> String {
        self.method
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or("GET")
            .to_ascii_uppercase()
    }

    /// The URL when present and non-empty.
    pub fn target_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }
}
