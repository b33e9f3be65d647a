//! Request descriptors: the input bundle for one call to the executor.

use reqwest::{
    Method,
    header::{HeaderMap, HeaderName, HeaderValue},
};

use crate::error::DescriptorError;

/// Immutable description of a single HTTP request.
///
/// Built with [`RequestDescriptor::builder`]; all validation happens in
/// [`RequestDescriptorBuilder::build`] so an existing descriptor is always
/// sendable.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    url: String,
    method: Method,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl RequestDescriptor {
    pub fn builder(url: impl Into<String>) -> RequestDescriptorBuilder {
        RequestDescriptorBuilder::new(url)
    }

    /// Plain `GET` with no headers and no body.
    pub fn get(url: impl Into<String>) -> Result<Self, DescriptorError> {
        Self::builder(url).build()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Header names are case-insensitive; iteration follows insertion order.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Query pairs, applied to the resolved URL by the transport.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct RequestDescriptorBuilder {
    url: String,
    method: String,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    query: Vec<(String, String)>,
}

impl RequestDescriptorBuilder {
    fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: "GET".to_string(),
            headers: Vec::new(),
            body: None,
            query: Vec::new(),
        }
    }

    /// HTTP verb token, e.g. `"POST"`. Defaults to `GET`.
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Append a header. Repeated names keep every value.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Append a query parameter. Encoding happens in the transport.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn build(self) -> Result<RequestDescriptor, DescriptorError> {
        if self.url.trim().is_empty() {
            return Err(DescriptorError::EmptyUrl);
        }

        let method = Method::from_bytes(self.method.as_bytes())
            .map_err(|_| DescriptorError::InvalidMethod(self.method.clone()))?;

        let mut headers = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| DescriptorError::InvalidHeaderName(name.clone()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| DescriptorError::InvalidHeaderValue(name.clone()))?;
            headers.append(header_name, header_value);
        }

        Ok(RequestDescriptor {
            url: self.url,
            method,
            headers,
            query: self.query,
            body: self.body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_get_without_headers_or_body() {
        let req = RequestDescriptor::get("https://example.com/data").expect("valid descriptor");

        assert_eq!(req.method(), Method::GET);
        assert!(req.headers().is_empty());
        assert!(req.body().is_none());
        assert_eq!(req.url(), "https://example.com/data");
    }

    #[test]
    fn rejects_empty_url() {
        let err = RequestDescriptor::builder("  ").build().unwrap_err();
        assert_eq!(err, DescriptorError::EmptyUrl);
    }

    #[test]
    fn rejects_invalid_method_token() {
        let err = RequestDescriptor::builder("/x").method("GE T").build().unwrap_err();
        assert_eq!(err, DescriptorError::InvalidMethod("GE T".into()));
    }

    #[test]
    fn rejects_invalid_header_name() {
        let err = RequestDescriptor::builder("/x")
            .header("bad header", "v")
            .build()
            .unwrap_err();
        assert_eq!(err, DescriptorError::InvalidHeaderName("bad header".into()));
    }

    #[test]
    fn rejects_header_value_with_newline() {
        let err = RequestDescriptor::builder("/x")
            .header("X-Trace", "a\nb")
            .build()
            .unwrap_err();
        assert_eq!(err, DescriptorError::InvalidHeaderValue("X-Trace".into()));
    }

    #[test]
    fn headers_are_case_insensitive_and_keep_order() {
        let req = RequestDescriptor::builder("/x")
            .method("POST")
            .header("X-First", "1")
            .header("Content-Type", "application/json")
            .header("x-first", "2")
            .body("{}")
            .build()
            .expect("valid descriptor");

        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.headers()["content-type"], "application/json");

        let firsts: Vec<_> = req.headers().get_all("X-FIRST").iter().collect();
        assert_eq!(firsts, ["1", "2"]);

        let names: Vec<_> = req.headers().keys().map(|k| k.as_str()).collect();
        assert_eq!(names, ["x-first", "content-type"]);
        assert_eq!(req.body(), Some(&b"{}"[..]));
    }

    #[test]
    fn query_pairs_stay_separate_from_url() {
        let req = RequestDescriptor::builder("https://example.com/a#frag")
            .query("q", "São Paulo, BR")
            .query("units", "metric")
            .build()
            .expect("valid descriptor");

        assert_eq!(req.url(), "https://example.com/a#frag");
        assert_eq!(
            req.query(),
            [
                ("q".to_string(), "São Paulo, BR".to_string()),
                ("units".to_string(), "metric".to_string()),
            ]
        );
    }
}
