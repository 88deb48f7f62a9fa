//! Transport-level failures.
//!
//! These never reach the client directly: the forwarder turns each of them
//! into a 500 [`NormalizedError`] whose details are the Display text.

use std::error::Error as StdError;
use thiserror::Error;

use crate::forward::outcome::NormalizedError;

/// Failures that are neither a timeout nor an HTTP status from the target.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The URL could not be parsed as an absolute URL.
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Only http and https targets can be forwarded.
    #[error("Unsupported URL scheme '{0}': only http and https are supported")]
    UnsupportedScheme(String),

    #[error("Invalid HTTP method '{0}'")]
    InvalidMethod(String),

    #[error("Invalid header name '{0}'")]
    InvalidHeaderName(String),

    #[error("Invalid value for header '{0}'")]
    InvalidHeaderValue(String),

    /// An outbound client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Connection, DNS, TLS or I/O failure while talking to the target.
    #[error("{}", error_chain(.0))]
    Request(#[from] reqwest::Error),

    /// A success response announced JSON but did not contain valid JSON.
    #[error("Invalid JSON in response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Joins an error with all of its sources, e.g.
/// `error sending request for url (...): client error (Connect): tcp connect error: Connection refused`.
pub fn error_chain(err: &dyn StdError) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

impl From<TransportError> for NormalizedError {
    fn from(err: TransportError) -> Self {
        NormalizedError::transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Outer(Inner);

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "outer failed")
        }
    }

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "connection refused")
        }
    }

    impl StdError for Outer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    impl StdError for Inner {}

    #[test]
    fn test_error_chain_joins_sources() {
        assert_eq!(error_chain(&Outer(Inner)), "outer failed: connection refused");
    }

    #[test]
    fn test_transport_error_becomes_500() {
        let err: NormalizedError = TransportError::InvalidMethod("G ET".into()).into();
        assert_eq!(err.status, 500);
        assert_eq!(
            err.message,
            "Internal Server Error: An unexpected error occurred on the server."
        );
        assert_eq!(err.details, serde_json::json!("Invalid HTTP method 'G ET'"));
    }
}
