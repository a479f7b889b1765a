use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use crate::{
    config::{Config, FetchMode},
    error::WeatherFetchError,
    model::{RawCurrentPayload, RawWeatherPayload},
};

use super::WeatherFetcher;

const CURRENT_ENDPOINT: &str = "current.json";
const FORECAST_ENDPOINT: &str = "forecast.json";

/// Fetcher for the WeatherAPI.com `v1` endpoints.
#[derive(Debug, Clone)]
pub struct WeatherApiFetcher {
    api_key: String,
    base_url: String,
    mode: FetchMode,
    http: Client,
}

impl WeatherApiFetcher {
    pub fn new(
        api_key: String,
        base_url: String,
        timeout: Duration,
        mode: FetchMode,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for WeatherAPI.com")?;

        Ok(Self { api_key, base_url: base_url.trim_end_matches('/').to_string(), mode, http })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(config.api_key()?, config.base_url.clone(), config.timeout(), config.fetch_mode)
    }

    async fn fetch_forecast(
        &self,
        location: &str,
        days: u8,
    ) -> Result<RawWeatherPayload, WeatherFetchError> {
        let days = days.to_string();
        self.get_json(
            FORECAST_ENDPOINT,
            &[
                ("key", self.api_key.as_str()),
                ("q", location),
                ("days", days.as_str()),
                ("aqi", "no"),
                ("alerts", "no"),
            ],
        )
        .await
    }

    async fn fetch_current(&self, location: &str) -> Result<RawCurrentPayload, WeatherFetchError> {
        self.get_json(
            CURRENT_ENDPOINT,
            &[("key", self.api_key.as_str()), ("q", location), ("aqi", "no")],
        )
        .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, WeatherFetchError> {
        let url = format!("{}/{endpoint}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| transport_error(endpoint, &e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| transport_error(endpoint, &e))?;

        if !status.is_success() {
            return Err(status_error(endpoint, status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(endpoint, error = %e, "WeatherAPI returned an unexpected body");
            WeatherFetchError::Malformed(format!("{endpoint}: {e}"))
        })
    }
}

#[async_trait]
impl WeatherFetcher for WeatherApiFetcher {
    async fn fetch(
        &self,
        location: &str,
        days: u8,
    ) -> Result<RawWeatherPayload, WeatherFetchError> {
        info!(location, days, mode = %self.mode, "Fetching weather data");

        let payload = match self.mode {
            FetchMode::Combined => self.fetch_forecast(location, days).await?,
            FetchMode::Split => {
                // The two endpoints are independent, so issue them together.
                let (current, forecast) = tokio::try_join!(
                    self.fetch_current(location),
                    self.fetch_forecast(location, days)
                )?;
                forecast.with_current(current)
            }
        };

        debug!(
            location = %payload.location.name,
            forecast_days = payload.forecast.forecastday.len(),
            "Weather data fetched successfully"
        );
        Ok(payload)
    }
}

fn status_error(endpoint: &str, status: StatusCode, body: &str) -> WeatherFetchError {
    error!(endpoint, %status, "WeatherAPI request failed");
    match status.as_u16() {
        400 => WeatherFetchError::NotFound,
        401 => WeatherFetchError::Unauthorized,
        _ => WeatherFetchError::Upstream(format!(
            "WeatherAPI {endpoint} request failed with status {status}: {}",
            truncate_body(body),
        )),
    }
}

fn transport_error(endpoint: &str, err: &reqwest::Error) -> WeatherFetchError {
    error!(endpoint, error = %err, "WeatherAPI request did not complete");
    if err.is_timeout() {
        WeatherFetchError::Upstream(format!("WeatherAPI {endpoint} request timed out"))
    } else {
        WeatherFetchError::Upstream(format!(
            "Failed to send request to WeatherAPI.com ({endpoint}): {err}"
        ))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
