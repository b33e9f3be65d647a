use async_trait::async_trait;
use reqwest::{Client, Request, Response, Url};
use std::time::Duration;

use crate::{error::TransportError, request::RequestDescriptor};

use super::{RawResponse, ResponseBody, Transport};

/// [`Transport`] backed by a shared `reqwest::Client`.
///
/// Relative descriptor URLs are joined onto `base_url`. The optional timeout
/// covers the whole exchange, body included.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: Option<Url>,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
            base_url: None,
        }
    }

    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Resolve the URL, then let reqwest encode the query pairs onto it.
    fn build_request(&self, descriptor: &RequestDescriptor) -> Result<Request, TransportError> {
        let url = self.resolve(descriptor.url())?;

        let mut request = self
            .http
            .request(descriptor.method().clone(), url)
            .headers(descriptor.headers().clone());
        if !descriptor.query().is_empty() {
            request = request.query(descriptor.query());
        }
        if let Some(body) = descriptor.body() {
            request = request.body(body.to_vec());
        }

        Ok(request.build()?)
    }

    fn resolve(&self, raw: &str) -> Result<Url, TransportError> {
        match Url::parse(raw) {
            Ok(url) => Ok(url),
            Err(_) => match &self.base_url {
                Some(base) => base
                    .join(raw)
                    .map_err(|_| TransportError::InvalidUrl(raw.to_string())),
                None => Err(TransportError::InvalidUrl(raw.to_string())),
            },
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default)]
pub struct HttpTransportBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl HttpTransportBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<HttpTransport, TransportError> {
        let base_url = self
            .base_url
            .map(|raw| {
                // Without the trailing slash `join` would drop the last segment.
                let normalized = if raw.ends_with('/') { raw } else { format!("{raw}/") };
                Url::parse(&normalized).map_err(|_| TransportError::InvalidUrl(normalized))
            })
            .transpose()?;

        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let http = builder
            .build()
            .map_err(|e| TransportError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(HttpTransport { http, base_url })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, descriptor: &RequestDescriptor) -> Result<RawResponse, TransportError> {
        let request = self.build_request(descriptor)?;

        let response = self.http.execute(request).await?;
        let status = response.status();
        let headers = response.headers().clone();

        Ok(RawResponse::new(status, headers, ReqwestBody::new(response)))
    }
}

/// Defers `Response::bytes` until the caller asks for the body.
struct ReqwestBody {
    response: Option<Response>,
}

impl ReqwestBody {
    fn new(response: Response) -> Self {
        Self {
            response: Some(response),
        }
    }
}

#[async_trait]
impl ResponseBody for ReqwestBody {
    async fn read_all(&mut self) -> Result<Vec<u8>, TransportError> {
        match self.response.take() {
            Some(response) => Ok(response.bytes().await?.to_vec()),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_urls_ignore_base() {
        let transport = HttpTransport::builder()
            .base_url("https://api.example.com/v1")
            .build()
            .expect("valid base url");

        let url = transport.resolve("http://other.example.org/x").unwrap();
        assert_eq!(url.as_str(), "http://other.example.org/x");
    }

    #[test]
    fn relative_urls_join_base_with_implicit_slash() {
        let transport = HttpTransport::builder()
            .base_url("https://api.example.com/data/2.5")
            .build()
            .expect("valid base url");

        let url = transport.resolve("weather?q=Oslo").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/data/2.5/weather?q=Oslo");
    }

    #[test]
    fn relative_url_without_base_is_invalid() {
        let err = HttpTransport::new().resolve("weather").unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl(ref raw) if raw == "weather"));
    }

    #[test]
    fn query_pairs_are_encoded_before_the_fragment() {
        let req = RequestDescriptor::builder("https://example.com/a#frag")
            .query("q", "x")
            .build()
            .unwrap();

        let request = HttpTransport::new().build_request(&req).unwrap();

        assert_eq!(request.url().query(), Some("q=x"));
        assert_eq!(request.url().fragment(), Some("frag"));
    }

    #[test]
    fn query_pairs_extend_an_existing_query_on_a_relative_url() {
        let transport = HttpTransport::builder()
            .base_url("https://api.example.com")
            .build()
            .unwrap();
        let req = RequestDescriptor::builder("search?lang=en")
            .query("q", "a&b")
            .query("city", "São Paulo")
            .build()
            .unwrap();

        let request = transport.build_request(&req).unwrap();
        let pairs: Vec<(String, String)> = request.url().query_pairs().into_owned().collect();

        assert_eq!(request.url().path(), "/search");
        assert_eq!(
            pairs,
            [
                ("lang".to_string(), "en".to_string()),
                ("q".to_string(), "a&b".to_string()),
                ("city".to_string(), "São Paulo".to_string()),
            ]
        );
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let err = HttpTransport::builder().base_url("not a url").build().unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl(_)));
    }
}
