use anyhow::{Context, Result};

use crate::{
    config::Config,
    error::{DescriptorError, ExecuteError},
    executor::{RequestExecutor, ResponseOutcome},
    model::ApiResponse,
    request::RequestDescriptor,
    transport::{HttpTransport, Transport},
};

/// Path of the current-weather endpoint, relative to the configured base URL.
pub const CURRENT_WEATHER_PATH: &str = "weather";

/// Build an [`HttpTransport`] from the base URL, timeout and user agent in `config`.
pub fn transport_from_config(config: &Config) -> Result<HttpTransport> {
    let mut builder = HttpTransport::builder().base_url(config.base_url.as_str());
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }
    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent.as_str());
    }

    builder
        .build()
        .with_context(|| format!("Invalid transport settings (base_url = {})", config.base_url))
}

/// Descriptor for `GET weather` with `q`, `appid` and `units` query pairs.
pub fn current_weather_descriptor(
    api_key: &str,
    units: &str,
    location: &str,
) -> Result<RequestDescriptor, DescriptorError> {
    RequestDescriptor::builder(CURRENT_WEATHER_PATH)
        .query("q", location)
        .query("appid", api_key)
        .query("units", units)
        .header("Accept", "application/json")
        .build()
}

/// Typed access to the current-weather endpoint.
#[derive(Debug, Clone)]
pub struct WeatherClient<X = HttpTransport> {
    executor: RequestExecutor<X>,
    api_key: String,
    units: String,
}

impl WeatherClient<HttpTransport> {
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?.to_owned();
        let transport = transport_from_config(config)?;

        Ok(Self::with_executor(
            RequestExecutor::with_transport(transport),
            api_key,
            config.units.clone(),
        ))
    }
}

impl<X: Transport> WeatherClient<X> {
    pub fn with_executor(executor: RequestExecutor<X>, api_key: String, units: String) -> Self {
        Self {
            executor,
            api_key,
            units,
        }
    }

    /// Fetch current weather for a free-form location such as `"Oslo,NO"`.
    ///
    /// A non-2xx answer (unknown city, bad key) comes back as
    /// [`ResponseOutcome::Failure`].
    pub async fn current(&self, location: &str) -> Result<ResponseOutcome<ApiResponse>> {
        let descriptor = current_weather_descriptor(&self.api_key, &self.units, location)
            .context("Failed to build current weather request")?;

        let outcome = self
            .executor
            .execute::<ApiResponse>(&descriptor)
            .await
            .map_err(|e: ExecuteError| {
                let what = if e.is_decode() {
                    "Failed to parse OpenWeather current JSON"
                } else {
                    "Failed to send request to OpenWeather (current weather)"
                };
                anyhow::Error::new(e).context(what)
            })?;

        Ok(outcome)
    }
}
