//! Error taxonomy for the request executor.
//!
//! Network failures, non-2xx statuses and payload decoding failures are kept
//! in separate types so callers can tell them apart without string matching.

use reqwest::StatusCode;
use thiserror::Error;

use crate::transport::RawResponse;

/// Raised while building a [`RequestDescriptor`](crate::RequestDescriptor).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("request url must not be empty")]
    EmptyUrl,

    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),

    #[error("invalid header name '{0}'")]
    InvalidHeaderName(String),

    #[error("invalid value for header '{0}'")]
    InvalidHeaderValue(String),
}

/// Failure before a status line was received, or while reading the body.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("invalid request url '{0}'")]
    InvalidUrl(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("transport failure: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else if err.is_body() || err.is_decode() {
            TransportError::Body(err.to_string())
        } else if err.is_builder() {
            TransportError::InvalidUrl(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// The body claimed to be JSON but did not parse into the expected shape.
#[derive(Debug, Error)]
#[error("malformed JSON payload: {source}")]
pub struct PayloadDecodeError {
    #[from]
    source: serde_json::Error,
}

impl PayloadDecodeError {
    pub fn inner(&self) -> &serde_json::Error {
        &self.source
    }
}

/// A non-2xx response turned into an error. The body is still unread.
#[derive(Debug, Error)]
#[error("request failed with HTTP status {}", .response.status())]
pub struct HttpStatusError {
    response: RawResponse,
}

impl HttpStatusError {
    pub(crate) fn new(response: RawResponse) -> Self {
        Self { response }
    }

    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    pub fn response(&self) -> &RawResponse {
        &self.response
    }

    pub fn into_response(self) -> RawResponse {
        self.response
    }
}

/// Everything [`RequestExecutor::execute`](crate::RequestExecutor::execute) can fail with.
///
/// Non-2xx statuses are not errors here; they arrive as
/// [`ResponseOutcome::Failure`](crate::ResponseOutcome::Failure).
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] PayloadDecodeError),
}

impl ExecuteError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ExecuteError::Transport(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, ExecuteError::Decode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_keeps_serde_position() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = PayloadDecodeError::from(source);

        assert!(err.inner().is_eof());
        assert!(err.to_string().starts_with("malformed JSON payload"));
    }

    #[test]
    fn execute_error_classifies_domains() {
        let transport = ExecuteError::from(TransportError::Timeout("30s".into()));
        assert!(transport.is_transport());
        assert!(!transport.is_decode());

        let source = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let decode = ExecuteError::from(PayloadDecodeError::from(source));
        assert!(decode.is_decode());
        assert!(decode.to_string().contains("malformed JSON payload"));
    }
}
