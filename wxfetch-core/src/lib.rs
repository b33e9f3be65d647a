//! Core library for `wxfetch`.
//!
//! This crate defines:
//! - A typed request executor that classifies responses into
//!   no-content / JSON / text / failure outcomes
//! - The transport seam it runs on, with a `reqwest` implementation
//! - The OpenWeather current-weather response shape
//! - Configuration handling
//!
//! It is used by `wxfetch-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod executor;
pub mod model;
pub mod openweather;
pub mod request;
pub mod transport;

pub use config::Config;
pub use error::{DescriptorError, ExecuteError, HttpStatusError, PayloadDecodeError, TransportError};
pub use executor::{RequestExecutor, ResponseOutcome};
pub use model::ApiResponse;
pub use openweather::WeatherClient;
pub use request::{RequestDescriptor, RequestDescriptorBuilder};
pub use transport::{BufferedBody, HttpTransport, RawResponse, ResponseBody, Transport};

pub use reqwest::{Method, StatusCode, header::HeaderMap};
