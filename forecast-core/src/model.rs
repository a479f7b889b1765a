//! Provider-shaped payload as returned by WeatherAPI.com `forecast.json`.
//!
//! Field names follow the provider's JSON keys so the structs deserialize directly.
//! Fields the provider does not always send are `Option` with `#[serde(default)]`;
//! everything else is required, and a body missing one is rejected as malformed.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWeatherPayload {
    pub location: RawLocation,
    pub current: RawCurrent,
    pub forecast: RawForecast,
}

/// Body of `current.json`: the same shape minus the forecast block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCurrentPayload {
    pub location: RawLocation,
    pub current: RawCurrent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLocation {
    pub name: String,
    #[serde(default)]
    pub region: Option<String>,
    pub country: String,
    /// Provider-formatted local time, e.g. "2024-01-15 14:05".
    pub localtime: String,
    #[serde(default)]
    pub localtime_epoch: Option<i64>,
    #[serde(default)]
    pub tz_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCondition {
    pub text: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub code: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCurrent {
    pub temp_c: f64,
    pub feelslike_c: f64,
    pub humidity: u8,
    pub wind_kph: f64,
    pub wind_dir: String,
    pub pressure_mb: f64,
    pub vis_km: f64,
    pub precip_mm: f64,
    pub uv: f64,
    pub gust_kph: f64,
    #[serde(default)]
    pub dewpoint_c: Option<f64>,
    #[serde(default)]
    pub cloud: Option<u8>,
    pub condition: RawCondition,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawForecast {
    pub forecastday: Vec<RawForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawForecastDay {
    /// "YYYY-MM-DD"
    pub date: String,
    pub day: RawDay,
    #[serde(default)]
    pub astro: Option<RawAstro>,
    #[serde(default)]
    pub hour: Vec<RawHour>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDay {
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    #[serde(default)]
    pub avgtemp_c: Option<f64>,
    pub avghumidity: f64,
    pub totalprecip_mm: f64,
    #[serde(default)]
    pub daily_chance_of_rain: Option<u8>,
    pub condition: RawCondition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAstro {
    pub sunrise: String,
    pub sunset: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHour {
    /// "YYYY-MM-DD HH:MM"
    pub time: String,
    pub temp_c: f64,
    pub condition: RawCondition,
    #[serde(default)]
    pub chance_of_rain: Option<u8>,
}

impl RawWeatherPayload {
    /// Replace the current-conditions block with one fetched separately.
    pub fn with_current(mut self, current: RawCurrentPayload) -> Self {
        self.current = current.current;
        self
    }
}
