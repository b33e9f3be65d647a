//! The request executor: one request in, one classified outcome out.
//!
//! Classification order:
//! 1. status outside 200..=299 -> [`ResponseOutcome::Failure`], body untouched
//! 2. status 204 -> [`ResponseOutcome::NoContent`], body untouched
//! 3. `Content-Type` mentions `application/json` -> parse into `T`
//! 4. anything else -> body as text
//!
//! The executor never retries. Errors from the transport or from decoding
//! go straight back to the caller.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::{
    error::{ExecuteError, HttpStatusError, PayloadDecodeError},
    request::RequestDescriptor,
    transport::{HttpTransport, RawResponse, Transport},
};

/// Result of executing one request.
#[derive(Debug)]
pub enum ResponseOutcome<T> {
    /// Status 204. Reserved for that status only; an empty 200 body is `Text("")`.
    NoContent,
    Json(T),
    Text(String),
    /// Non-2xx status. The body has not been read.
    Failure(RawResponse),
}

impl<T> ResponseOutcome<T> {
    pub fn is_success(&self) -> bool {
        !matches!(self, ResponseOutcome::Failure(_))
    }

    /// Turn [`ResponseOutcome::Failure`] into an error so callers can use `?`.
    pub fn error_for_status(self) -> Result<Self, HttpStatusError> {
        match self {
            ResponseOutcome::Failure(raw) => Err(HttpStatusError::new(raw)),
            other => Ok(other),
        }
    }

    pub fn json(self) -> Option<T> {
        match self {
            ResponseOutcome::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn text(self) -> Option<String> {
        match self {
            ResponseOutcome::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn failure(self) -> Option<RawResponse> {
        match self {
            ResponseOutcome::Failure(raw) => Some(raw),
            _ => None,
        }
    }

    /// Short variant name, handy for logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            ResponseOutcome::NoContent => "no-content",
            ResponseOutcome::Json(_) => "json",
            ResponseOutcome::Text(_) => "text",
            ResponseOutcome::Failure(_) => "failure",
        }
    }
}

/// Executes [`RequestDescriptor`]s through a [`Transport`].
///
/// Holds no per-call state; concurrent calls do not interact.
#[derive(Debug, Clone)]
pub struct RequestExecutor<X = HttpTransport> {
    transport: X,
}

impl RequestExecutor<HttpTransport> {
    /// Executor over a default `reqwest` client: no base URL, no timeout.
    pub fn new() -> Self {
        Self::with_transport(HttpTransport::new())
    }
}

impl Default for RequestExecutor<HttpTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<X: Transport> RequestExecutor<X> {
    pub fn with_transport(transport: X) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &X {
        &self.transport
    }

    pub async fn execute<T>(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<ResponseOutcome<T>, ExecuteError>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(
            target: "wxfetch::http",
            method = %descriptor.method(),
            url = %descriptor.url(),
            "sending request"
        );

        let response = self.transport.send(descriptor).await?;
        let status = response.status();

        tracing::debug!(
            target: "wxfetch::http",
            url = %descriptor.url(),
            status = status.as_u16(),
            content_type = response.content_type().unwrap_or("-"),
            "response received"
        );

        classify(response).await
    }
}

async fn classify<T: DeserializeOwned>(
    response: RawResponse,
) -> Result<ResponseOutcome<T>, ExecuteError> {
    let status = response.status();

    if !status.is_success() {
        return Ok(ResponseOutcome::Failure(response));
    }

    if status == StatusCode::NO_CONTENT {
        return Ok(ResponseOutcome::NoContent);
    }

    if response.is_json() {
        let bytes = response.bytes().await?;
        let value = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::debug!(target: "wxfetch::http", error = %e, "JSON payload did not parse");
            PayloadDecodeError::from(e)
        })?;
        return Ok(ResponseOutcome::Json(value));
    }

    Ok(ResponseOutcome::Text(response.text().await?))
}
