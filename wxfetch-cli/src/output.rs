//! Human-readable rendering for the CLI.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use wxfetch_core::{ApiResponse, HeaderMap, StatusCode, TransportError};

/// One-paragraph summary of a current-weather payload.
pub fn weather_summary(weather: &ApiResponse, units: &str) -> String {
    let (temp_unit, speed_unit) = unit_labels(units);
    let offset = utc_offset(weather.timezone);

    let condition = weather
        .weather
        .first()
        .map(|w| w.description.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    let mut lines = vec![
        format!("{}, {}", weather.name, weather.sys.country),
        format!("  {condition}"),
        format!(
            "  Temperature: {:.1}{temp_unit} (feels like {:.1}{temp_unit})",
            weather.main.temp, weather.main.feels_like
        ),
        format!("  Humidity: {}%", weather.main.humidity),
        format!("  Pressure: {} hPa", weather.main.pressure),
        format!("  Wind: {:.1} {speed_unit} at {}°", weather.wind.speed, weather.wind.deg),
    ];

    if let (Some(rise), Some(set)) = (weather.sunrise(), weather.sunset()) {
        lines.push(format!(
            "  Sunrise {} / Sunset {}",
            local_time(rise, offset),
            local_time(set, offset)
        ));
    }
    if let Some(at) = weather.observed_at() {
        lines.push(format!("  Observed {}", at.with_timezone(&offset).format("%Y-%m-%d %H:%M %:z")));
    }

    lines.join("\n")
}

fn unit_labels(units: &str) -> (&'static str, &'static str) {
    match units {
        "imperial" => ("°F", "mph"),
        "standard" => ("K", "m/s"),
        _ => ("°C", "m/s"),
    }
}

/// Shift in seconds to an offset; anything chrono cannot represent falls back to UTC.
fn utc_offset(timezone: i64) -> FixedOffset {
    i32::try_from(timezone)
        .ok()
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

fn local_time(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%H:%M").to_string()
}

/// Split `"Name: value"` into its parts. The value may itself contain colons.
pub fn parse_header(raw: &str) -> Option<(&str, &str)> {
    let (name, value) = raw.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, value.trim()))
}

pub fn format_headers(headers: &HeaderMap) -> String {
    let mut out = String::new();
    for (name, value) in headers {
        out.push_str(name.as_str());
        out.push_str(": ");
        out.push_str(&String::from_utf8_lossy(value.as_bytes()));
        out.push('\n');
    }
    out
}

/// Message for a non-2xx response. A body that could not be read is reported, not dropped.
pub fn failure_message(status: StatusCode, body: Result<String, TransportError>) -> String {
    match body {
        Ok(body) => format!("request failed with status {status}: {}", truncate_body(&body)),
        Err(err) => format!("request failed with status {status} (body unavailable: {err})"),
    }
}

pub fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
