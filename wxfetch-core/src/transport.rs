use crate::{error::TransportError, request::RequestDescriptor};
use async_trait::async_trait;
use reqwest::{
    StatusCode,
    header::{CONTENT_TYPE, HeaderMap},
};
use std::fmt::{self, Debug};

pub mod http;

pub use http::{HttpTransport, HttpTransportBuilder};

/// The network capability the executor depends on.
///
/// Implementations return as soon as the status line and headers are
/// available; the body stays behind a [`ResponseBody`] until someone asks
/// for it. Timeouts and cancellation belong to the implementation and must
/// surface as [`TransportError`].
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn send(&self, descriptor: &RequestDescriptor) -> Result<RawResponse, TransportError>;
}

/// A response body that has not been read yet.
#[async_trait]
pub trait ResponseBody: Send + Sync {
    /// Read the remaining body. A second call yields an empty buffer.
    async fn read_all(&mut self) -> Result<Vec<u8>, TransportError>;
}

/// Body bytes that are already in memory.
#[derive(Debug, Clone, Default)]
pub struct BufferedBody {
    bytes: Option<Vec<u8>>,
}

impl BufferedBody {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Some(bytes.into()),
        }
    }
}

#[async_trait]
impl ResponseBody for BufferedBody {
    async fn read_all(&mut self) -> Result<Vec<u8>, TransportError> {
        Ok(self.bytes.take().unwrap_or_default())
    }
}

/// Status and headers of a response, with the body left unread.
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Box<dyn ResponseBody>,
}

impl RawResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl ResponseBody + 'static) -> Self {
        Self {
            status,
            headers,
            body: Box::new(body),
        }
    }

    pub fn buffered(status: StatusCode, headers: HeaderMap, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(status, headers, BufferedBody::new(bytes))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw `Content-Type` value, if present and valid ASCII.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// Loose check: the content type merely has to mention `application/json`.
    /// Works on raw bytes so non-ASCII parameters do not hide the match.
    pub fn is_json(&self) -> bool {
        const JSON: &[u8] = b"application/json";
        self.headers.get(CONTENT_TYPE).is_some_and(|value| {
            value
                .as_bytes()
                .windows(JSON.len())
                .any(|window| window.eq_ignore_ascii_case(JSON))
        })
    }

    pub async fn bytes(mut self) -> Result<Vec<u8>, TransportError> {
        self.body.read_all().await
    }

    /// Body decoded as UTF-8; invalid sequences become U+FFFD.
    pub async fn text(self) -> Result<String, TransportError> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Debug for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers_with_content_type(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn json_detection_is_a_loose_substring_match() {
        let cases = [
            ("application/json", true),
            ("application/json; charset=utf-8", true),
            ("APPLICATION/JSON", true),
            ("text/plain", false),
            ("application/problem+json", false),
        ];

        for (value, expected) in cases {
            let raw = RawResponse::buffered(StatusCode::OK, headers_with_content_type(value), "");
            assert_eq!(raw.is_json(), expected, "content type {value}");
        }

        let raw = RawResponse::buffered(StatusCode::OK, HeaderMap::new(), "");
        assert!(!raw.is_json());
        assert_eq!(raw.content_type(), None);
    }

    #[test]
    fn json_detection_sees_past_non_ascii_parameters() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_bytes(b"Application/JSON; x=\xff").expect("obs-text is allowed"),
        );

        let raw = RawResponse::buffered(StatusCode::OK, headers, "{}");
        assert_eq!(raw.content_type(), None);
        assert!(raw.is_json());
    }

    #[tokio::test]
    async fn text_decodes_lossily() {
        let raw = RawResponse::buffered(StatusCode::OK, HeaderMap::new(), vec![b'o', b'k', 0xFF]);
        let text = raw.text().await.expect("buffered body never fails");
        assert_eq!(text, "ok\u{FFFD}");
    }

    #[tokio::test]
    async fn buffered_body_is_read_once() {
        let mut body = BufferedBody::new("payload");
        assert_eq!(body.read_all().await.unwrap(), b"payload");
        assert!(body.read_all().await.unwrap().is_empty());
    }

    #[test]
    fn debug_does_not_touch_the_body() {
        let raw = RawResponse::buffered(StatusCode::NOT_FOUND, HeaderMap::new(), "secret");
        let rendered = format!("{raw:?}");
        assert!(rendered.contains("404"));
        assert!(!rendered.contains("secret"));
    }
}
