use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, Select};
use wxfetch_core::{
    Config, RequestDescriptor, RequestExecutor, ResponseOutcome, WeatherClient,
    openweather::transport_from_config,
};

use crate::output;

const UNITS: &[&str] = &["metric", "imperial", "standard"];

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wxfetch", version, about = "Typed HTTP fetcher for OpenWeather")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and preferred units.
    Configure,

    /// Show current weather for a location.
    Current {
        /// Location name, e.g. "London" or "Oslo,NO".
        location: String,

        /// Print the raw payload as pretty JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Run a single request and print the classified outcome.
    Request {
        /// Absolute URL, or a path relative to the configured base URL.
        url: String,

        /// HTTP method.
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,

        /// Request header as "Name: value". May be repeated.
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Request body.
        #[arg(short = 'd', long)]
        data: Option<String>,

        /// Print response headers when the request fails.
        #[arg(short, long)]
        include: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Current { location, json } => current(&location, json).await,
            Command::Request {
                url,
                method,
                headers,
                data,
                include,
            } => request(url, method, headers, data, include).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }
    cfg.set_api_key(api_key.trim().to_string());

    let start = UNITS.iter().position(|u| *u == cfg.units).unwrap_or(0);
    let units = Select::new("Units:", UNITS.to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read units")?;
    cfg.units = units.to_string();

    let path = cfg.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

async fn current(location: &str, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let client = WeatherClient::from_config(&cfg)?;

    match client.current(location).await? {
        ResponseOutcome::Json(weather) if json => {
            println!("{}", serde_json::to_string_pretty(&weather)?);
        }
        ResponseOutcome::Json(weather) => {
            println!("{}", output::weather_summary(&weather, &cfg.units));
        }
        ResponseOutcome::Failure(raw) => {
            let status = raw.status();
            let body = raw.text().await;
            bail!("OpenWeather current {}", output::failure_message(status, body));
        }
        other => bail!("Unexpected {} response from OpenWeather", other.kind()),
    }

    Ok(())
}

async fn request(
    url: String,
    method: String,
    headers: Vec<String>,
    data: Option<String>,
    include: bool,
) -> anyhow::Result<()> {
    let cfg = Config::load()?;

    let mut builder = RequestDescriptor::builder(url).method(method);
    for raw in &headers {
        let (name, value) = output::parse_header(raw)
            .ok_or_else(|| anyhow!("Invalid header '{raw}', expected \"Name: value\""))?;
        builder = builder.header(name, value);
    }
    if let Some(data) = data {
        builder = builder.body(data);
    }
    let descriptor = builder.build()?;

    let executor = RequestExecutor::with_transport(transport_from_config(&cfg)?);
    let outcome = executor
        .execute::<serde_json::Value>(&descriptor)
        .await
        .context("Request failed")?;

    println!("outcome: {}", outcome.kind());
    match outcome {
        ResponseOutcome::NoContent => {}
        ResponseOutcome::Json(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        ResponseOutcome::Text(text) => println!("{text}"),
        ResponseOutcome::Failure(raw) => {
            let status = raw.status();
            if include {
                print!("{}", output::format_headers(raw.headers()));
            }
            let body = raw.text().await.context("Failed to read error response body")?;
            println!("{body}");
            bail!("Request failed with status {status}");
        }
    }

    Ok(())
}
