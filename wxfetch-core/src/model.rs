//! Shape of the OpenWeather "current weather" (`/data/2.5/weather`) response.
//!
//! These types only describe the payload so it can be used as the `T` in
//! [`RequestExecutor::execute`](crate::RequestExecutor::execute). No field is
//! validated beyond what serde needs to deserialize it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub id: i64,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Main {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    pub all: f64,
}

/// `type` and `id` are missing for some stations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sys {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

/// Full current-weather payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub coord: Coord,
    pub weather: Vec<Weather>,
    pub base: String,
    pub main: Main,
    pub visibility: i64,
    pub wind: Wind,
    pub clouds: Clouds,
    /// Time of data calculation, unix seconds UTC.
    pub dt: i64,
    pub sys: Sys,
    /// Shift in seconds from UTC.
    pub timezone: i64,
    /// City id.
    pub id: i64,
    /// City name.
    pub name: String,
    pub cod: i64,
}

impl ApiResponse {
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.dt, 0)
    }

    pub fn sunrise(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.sys.sunrise, 0)
    }

    pub fn sunset(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.sys.sunset, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONDON: &str = r#"{
        "coord": {"lon": -0.1257, "lat": 51.5085},
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
        "base": "stations",
        "main": {"temp": 14.2, "feels_like": 13.6, "temp_min": 12.9, "temp_max": 15.3,
                 "pressure": 1012, "humidity": 77},
        "visibility": 10000,
        "wind": {"speed": 4.63, "deg": 240},
        "clouds": {"all": 75},
        "dt": 1697720400,
        "sys": {"type": 2, "id": 2075535, "country": "GB", "sunrise": 1697697234, "sunset": 1697734688},
        "timezone": 3600,
        "id": 2643743,
        "name": "London",
        "cod": 200
    }"#;

    #[test]
    fn deserializes_current_weather_payload() {
        let parsed: ApiResponse = serde_json::from_str(LONDON).expect("sample payload parses");

        assert_eq!(parsed.name, "London");
        assert_eq!(parsed.sys.kind, Some(2));
        assert_eq!(parsed.weather[0].description, "broken clouds");
        assert_eq!(parsed.main.pressure, 1012.0);
        assert_eq!(parsed.cod, 200);
        assert_eq!(
            parsed.observed_at().map(|t| t.to_rfc3339()).as_deref(),
            Some("2023-10-19T13:00:00+00:00")
        );
    }

    #[test]
    fn sys_type_and_id_are_optional() {
        let mut value: serde_json::Value = serde_json::from_str(LONDON).unwrap();
        let sys = value["sys"].as_object_mut().unwrap();
        sys.remove("type");
        sys.remove("id");

        let parsed: ApiResponse = serde_json::from_value(value).expect("payload without sys ids");
        assert_eq!(parsed.sys.kind, None);
        assert_eq!(parsed.sys.id, None);

        let back = serde_json::to_value(&parsed).unwrap();
        assert!(back["sys"].get("type").is_none());
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let mut value: serde_json::Value = serde_json::from_str(LONDON).unwrap();
        value.as_object_mut().unwrap().remove("main");

        assert!(serde_json::from_value::<ApiResponse>(value).is_err());
    }
}
