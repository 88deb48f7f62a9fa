//! Turns a client description into a concrete outbound request.
//!
//! Nothing here touches the network, so every rule about headers and
//! bodies can be checked without a target server.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use std::time::Duration;
use url::{form_urlencoded, Url};

use crate::forward::description::{BodyType, KeyValue, OutgoingRequestDescription};
use crate::forward::error::TransportError;
use crate::forward::outcome::{NormalizedError, URL_REQUIRED};

const APPLICATION_JSON: &str = "application/json";
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Body that goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Empty,
    /// Raw content, sent verbatim.
    Text(String),
    /// Multipart text fields; the transport picks the boundary.
    Multipart(Vec<(String, String)>),
    /// Already encoded `key=value&...` body.
    UrlEncoded(String),
}

/// A validated outbound request plus its per-call settings.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub payload: Payload,
    pub timeout: Duration,
    pub follow_redirects: bool,
    pub verify_tls: bool,
}

/// Validate and assemble a request.
///
/// A missing URL is a validation error (400). Malformed URLs, methods or
/// headers are transport errors (500), as they are only discovered when
/// the request is built.
pub fn prepare(
    description: &OutgoingRequestDescription,
    default_timeout: Duration,
) -> Result<PreparedRequest, NormalizedError> {
    let raw_url = description
        .target_url()
        .ok_or_else(|| NormalizedError::validation(URL_REQUIRED))?;

    let method = parse_method(&description.method_name())?;
    let url = parse_url(raw_url)?;
    let mut headers = assemble_headers(&description.headers)?;

    let payload = match description.body_type {
        BodyType::Raw => {
            if !headers.contains_key(CONTENT_TYPE) {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
            }
            Payload::Text(description.body.raw_text())
        }
        BodyType::FormData => {
            // The multipart encoder sets its own Content-Type with the boundary.
            headers.remove(CONTENT_TYPE);
            Payload::Multipart(
                non_empty_pairs(&description.body.form_data)
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
        }
        BodyType::Urlencoded => {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_URLENCODED));
            Payload::UrlEncoded(encode_form(&description.body.urlencoded))
        }
        BodyType::None | BodyType::Unsupported => Payload::Empty,
    };

    let payload = if method == Method::GET || method == Method::HEAD {
        Payload::Empty
    } else {
        payload
    };

    Ok(PreparedRequest {
        method,
        url,
        headers,
        payload,
        timeout: description.settings.timeout_or(default_timeout),
        follow_redirects: description.settings.follows_redirects(),
        verify_tls: description.settings.verifies_tls(),
    })
}

fn non_empty_pairs<'a>(pairs: &'a [KeyValue]) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
    pairs.iter().filter_map(KeyValue::as_pair)
}

fn parse_method(name: &str) -> Result<Method, TransportError> {
    Method::from_bytes(name.as_bytes()).map_err(|_| TransportError::InvalidMethod(name.to_string()))
}

fn parse_url(raw: &str) -> Result<Url, TransportError> {
    let url = Url::parse(raw).map_err(|source| TransportError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(TransportError::UnsupportedScheme(other.to_string())),
    }
}

/// Ordered header collection. Repeated names are appended, not replaced.
pub fn assemble_headers(pairs: &[KeyValue]) -> Result<HeaderMap, TransportError> {
    let mut headers = HeaderMap::new();
    for (key, value) in non_empty_pairs(pairs) {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| TransportError::InvalidHeaderName(key.to_string()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| TransportError::InvalidHeaderValue(key.to_string()))?;
        headers.append(name, value);
    }
    Ok(headers)
}

/// `application/x-www-form-urlencoded` serialization of the non-empty pairs.
pub fn encode_form(pairs: &[KeyValue]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(non_empty_pairs(pairs))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forward::outcome::ErrorKind;

    const DEFAULT: Duration = Duration::from_millis(30_000);

    fn content_type(req: &PreparedRequest) -> Vec<&str> {
        req.headers
            .get_all(CONTENT_TYPE)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect()
    }

    #[test]
    fn test_missing_url_is_validation_error() {
        let desc = OutgoingRequestDescription::default();
        let err = prepare(&desc, DEFAULT).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.status, 400);
        assert_eq!(err.details, serde_json::json!("URL is required"));
    }

    #[test]
    fn test_empty_header_pairs_are_skipped() {
        let desc = OutgoingRequestDescription::new("GET", "http://example.com")
            .header("X-One", "1")
            .header("", "orphan")
            .header("X-Empty", "");
        let req = prepare(&desc, DEFAULT).unwrap();
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.headers["x-one"], "1");
    }

    #[test]
    fn test_duplicate_headers_are_kept_in_order() {
        let desc = OutgoingRequestDescription::new("GET", "http://example.com")
            .header("X-Tag", "a")
            .header("x-tag", "b");
        let req = prepare(&desc, DEFAULT).unwrap();
        let values: Vec<_> = req.headers.get_all("x-tag").iter().collect();
        assert_eq!(values, vec!["a", "b"]);
    }

    #[test]
    fn test_raw_defaults_to_json_content_type() {
        let desc = OutgoingRequestDescription::new("POST", "http://example.com").raw("{\"a\":1}");
        let req = prepare(&desc, DEFAULT).unwrap();
        assert_eq!(content_type(&req), vec!["application/json"]);
        assert_eq!(req.payload, Payload::Text("{\"a\":1}".into()));
    }

    #[test]
    fn test_raw_keeps_caller_content_type_case_insensitively() {
        let desc = OutgoingRequestDescription::new("POST", "http://example.com")
            .header("content-TYPE", "text/xml")
            .raw("<a/>");
        let req = prepare(&desc, DEFAULT).unwrap();
        assert_eq!(content_type(&req), vec!["text/xml"]);
    }

    #[test]
    fn test_urlencoded_overrides_content_type() {
        let desc = OutgoingRequestDescription::new("POST", "http://example.com")
            .header("Content-Type", "text/plain")
            .urlencoded(vec![
                KeyValue::new("name", "a b"),
                KeyValue::new("", "skipped"),
                KeyValue::new("skipped", ""),
                KeyValue::new("x", "1&2"),
            ]);
        let req = prepare(&desc, DEFAULT).unwrap();
        assert_eq!(content_type(&req), vec!["application/x-www-form-urlencoded"]);
        assert_eq!(req.payload, Payload::UrlEncoded("name=a+b&x=1%262".into()));
    }

    #[test]
    fn test_form_data_skips_empty_entries() {
        let desc = OutgoingRequestDescription::new("PUT", "http://example.com")
            .header("Content-Type", "multipart/form-data")
            .form_data(vec![KeyValue::new("a", "1"), KeyValue::new("b", "")]);
        let req = prepare(&desc, DEFAULT).unwrap();
        assert!(content_type(&req).is_empty());
        assert_eq!(req.payload, Payload::Multipart(vec![("a".into(), "1".into())]));
    }

    #[test]
    fn test_get_and_head_never_carry_a_body() {
        for method in ["get", "GET", "head", "Head"] {
            let desc = OutgoingRequestDescription::new(method, "http://example.com").raw("payload");
            let req = prepare(&desc, DEFAULT).unwrap();
            assert_eq!(req.payload, Payload::Empty, "{method} should drop the body");
        }
    }

    #[test]
    fn test_method_is_case_insensitive() {
        let desc = OutgoingRequestDescription::new("patch", "http://example.com");
        assert_eq!(prepare(&desc, DEFAULT).unwrap().method, Method::PATCH);
    }

    #[test]
    fn test_settings_are_resolved() {
        let desc = OutgoingRequestDescription::new("GET", "https://example.com")
            .timeout_ms(0)
            .follow_redirects(false)
            .ssl_verification(false);
        let req = prepare(&desc, DEFAULT).unwrap();
        assert_eq!(req.timeout, DEFAULT);
        assert!(!req.follow_redirects);
        assert!(!req.verify_tls);
    }

    #[test]
    fn test_malformed_parts_are_transport_errors() {
        let bad_url = OutgoingRequestDescription::new("GET", "not a url");
        assert_eq!(prepare(&bad_url, DEFAULT).unwrap_err().status, 500);

        let bad_scheme = OutgoingRequestDescription::new("GET", "ftp://example.com");
        assert_eq!(prepare(&bad_scheme, DEFAULT).unwrap_err().status, 500);

        let bad_header = OutgoingRequestDescription::new("GET", "http://example.com").header("bad header", "x");
        let err = prepare(&bad_header, DEFAULT).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Transport);
        assert_eq!(err.details, serde_json::json!("Invalid header name 'bad header'"));
    }
}
