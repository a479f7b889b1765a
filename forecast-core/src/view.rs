//! Presentation-agnostic view-model and the builder that derives it from a
//! [`RawWeatherPayload`].

use serde::Serialize;

use crate::{
    condition::{IconCategory, classify},
    datetime::{format_date, format_hour},
    model::{RawCurrent, RawForecastDay, RawHour, RawLocation, RawWeatherPayload},
};

/// Maximum number of entries in [`WeatherViewModel::upcoming_hours`].
pub const UPCOMING_HOURS: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherViewModel {
    pub location: LocationView,
    pub current: CurrentView,
    pub forecast_days: Vec<ForecastDayView>,
    /// First hours of the first forecast day, for a short-range display.
    pub upcoming_hours: Vec<HourView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationView {
    pub name: String,
    pub region: Option<String>,
    pub country: String,
    pub local_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentView {
    pub temp_c: f64,
    pub feels_like_c: f64,
    pub humidity: u8,
    pub wind_kph: f64,
    pub wind_dir: String,
    pub pressure_mb: f64,
    pub vis_km: f64,
    pub precip_mm: f64,
    pub uv: f64,
    pub gust_kph: f64,
    pub dewpoint_c: Option<f64>,
    pub cloud: Option<u8>,
    pub condition: String,
    pub last_updated: Option<String>,
    pub icon_category: IconCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastDayView {
    pub date: String,
    pub display_date: String,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    pub avg_temp_c: Option<f64>,
    pub avg_humidity: f64,
    pub total_precip_mm: f64,
    pub chance_of_rain: Option<u8>,
    pub condition: String,
    pub icon_category: IconCategory,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub hours: Vec<HourView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourView {
    pub time: String,
    pub display_time: String,
    pub temp_c: f64,
    pub condition: String,
    pub chance_of_rain: Option<u8>,
    pub icon_category: IconCategory,
}

/// Derive the view-model from a validated payload.
///
/// At most `requested_days` forecast days are kept, in provider order.
pub fn build(payload: &RawWeatherPayload, requested_days: usize) -> WeatherViewModel {
    let forecast_days: Vec<ForecastDayView> = payload
        .forecast
        .forecastday
        .iter()
        .take(requested_days)
        .map(day_view)
        .collect();

    let upcoming_hours = forecast_days
        .first()
        .map(|d| d.hours.iter().take(UPCOMING_HOURS).cloned().collect())
        .unwrap_or_default();

    WeatherViewModel {
        location: location_view(&payload.location),
        current: current_view(&payload.current),
        forecast_days,
        upcoming_hours,
    }
}

fn location_view(loc: &RawLocation) -> LocationView {
    LocationView {
        name: loc.name.clone(),
        region: loc.region.clone(),
        country: loc.country.clone(),
        local_time: loc.localtime.clone(),
    }
}

fn current_view(cur: &RawCurrent) -> CurrentView {
    CurrentView {
        temp_c: cur.temp_c,
        feels_like_c: cur.feelslike_c,
        humidity: cur.humidity,
        wind_kph: cur.wind_kph,
        wind_dir: cur.wind_dir.clone(),
        pressure_mb: cur.pressure_mb,
        vis_km: cur.vis_km,
        precip_mm: cur.precip_mm,
        uv: cur.uv,
        gust_kph: cur.gust_kph,
        dewpoint_c: cur.dewpoint_c,
        cloud: cur.cloud,
        condition: cur.condition.text.clone(),
        last_updated: cur.last_updated.clone(),
        icon_category: classify(&cur.condition.text),
    }
}

fn day_view(day: &RawForecastDay) -> ForecastDayView {
    ForecastDayView {
        date: day.date.clone(),
        display_date: format_date(&day.date),
        max_temp_c: day.day.maxtemp_c,
        min_temp_c: day.day.mintemp_c,
        avg_temp_c: day.day.avgtemp_c,
        avg_humidity: day.day.avghumidity,
        total_precip_mm: day.day.totalprecip_mm,
        chance_of_rain: day.day.daily_chance_of_rain,
        condition: day.day.condition.text.clone(),
        icon_category: classify(&day.day.condition.text),
        sunrise: day.astro.as_ref().map(|a| a.sunrise.clone()),
        sunset: day.astro.as_ref().map(|a| a.sunset.clone()),
        hours: day.hour.iter().map(hour_view).collect(),
    }
}

fn hour_view(hour: &RawHour) -> HourView {
    HourView {
        time: hour.time.clone(),
        display_time: format_hour(&hour.time),
        temp_c: hour.temp_c,
        condition: hour.condition.text.clone(),
        chance_of_rain: hour.chance_of_rain,
        icon_category: classify(&hour.condition.text),
    }
}
