use std::fmt::Debug;

use async_trait::async_trait;
use tracing::warn;

use crate::{
    Config,
    error::WeatherFetchError,
    model::RawWeatherPayload,
    provider::weatherapi::WeatherApiFetcher,
    view::{WeatherViewModel, build},
};

pub mod weatherapi;

/// Source of raw forecast payloads.
#[async_trait]
pub trait WeatherFetcher: Send + Sync + Debug {
    /// Fetch current conditions plus `days` forecast days for `location`.
    ///
    /// Every call is a fresh round trip; failures are always mapped to
    /// [`WeatherFetchError`].
    async fn fetch(&self, location: &str, days: u8)
    -> Result<RawWeatherPayload, WeatherFetchError>;
}

/// Construct the WeatherAPI.com fetcher from config.
pub fn fetcher_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherFetcher>> {
    Ok(Box::new(WeatherApiFetcher::from_config(config)?))
}

/// Race a fetch against `cancel`; a fired signal yields `Upstream`, never a partial payload.
pub async fn fetch_or_cancel<F>(
    fetcher: &dyn WeatherFetcher,
    location: &str,
    days: u8,
    cancel: F,
) -> Result<RawWeatherPayload, WeatherFetchError>
where
    F: Future<Output = ()>,
{
    tokio::select! {
        res = fetcher.fetch(location, days) => res,
        () = cancel => {
            warn!(location, "weather request cancelled");
            Err(WeatherFetchError::Upstream("request cancelled".to_string()))
        }
    }
}

/// Fetch and build in one step.
pub async fn forecast(
    fetcher: &dyn WeatherFetcher,
    location: &str,
    days: u8,
) -> Result<WeatherViewModel, WeatherFetchError> {
    let payload = fetcher.fetch(location, days).await?;
    Ok(build(&payload, usize::from(days)))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        condition::IconCategory,
        model::fixtures,
        test_support::{StubProvider, StubRoute},
    };

    /// Canned fetcher that never touches the network.
    #[derive(Debug)]
    struct FixedFetcher(Result<RawWeatherPayload, WeatherFetchError>);

    #[async_trait]
    impl WeatherFetcher for FixedFetcher {
        async fn fetch(
            &self,
            _location: &str,
            _days: u8,
        ) -> Result<RawWeatherPayload, WeatherFetchError> {
            self.0.clone()
        }
    }

    #[test]
    fn fetcher_from_config_works_when_key_is_set() {
        let cfg = Config { api_key: Some("KEY".into()), ..Config::default() };
        assert!(fetcher_from_config(&cfg).is_ok());
    }

    #[tokio::test]
    async fn forecast_passes_fetch_errors_through() {
        let fetcher = FixedFetcher(Err(WeatherFetchError::Unauthorized));
        let err = forecast(&fetcher, "London", 3).await.unwrap_err();
        assert_eq!(err, WeatherFetchError::Unauthorized);
    }

    #[tokio::test]
    async fn fired_cancel_signal_yields_upstream() {
        let stub = StubProvider::start(vec![(
            "forecast.json",
            StubRoute::json(200, &fixtures::london_forecast_json())
                .delayed(Duration::from_secs(5)),
        )])
        .await;
        let fetcher = WeatherApiFetcher::new(
            "TEST".into(),
            stub.base_url(),
            Duration::from_secs(30),
            crate::FetchMode::Combined,
        )
        .unwrap();

        let err = fetch_or_cancel(
            &fetcher,
            "London",
            3,
            tokio::time::sleep(Duration::from_millis(50)),
        )
        .await
        .unwrap_err();

        assert_eq!(err, WeatherFetchError::Upstream("request cancelled".into()));
    }

    #[tokio::test]
    async fn unfired_cancel_signal_lets_fetch_complete() {
        let fetcher = FixedFetcher(Ok(fixtures::london_payload()));

        let payload =
            fetch_or_cancel(&fetcher, "London", 3, std::future::pending()).await.unwrap();
        assert_eq!(payload.location.name, "London");
    }

    #[tokio::test]
    async fn london_end_to_end_through_stub_provider() {
        let stub = StubProvider::start(vec![(
            "forecast.json",
            StubRoute::json(200, &fixtures::london_forecast_json()),
        )])
        .await;
        let cfg = Config {
            api_key: Some("TEST".into()),
            base_url: stub.base_url(),
            ..Config::default()
        };
        let fetcher = WeatherApiFetcher::from_config(&cfg).unwrap();

        let vm = forecast(&fetcher, "London", 3).await.unwrap();

        assert_eq!(vm.location.name, "London");
        assert_eq!(vm.forecast_days.len(), 3);
        assert_eq!(vm.forecast_days[0].icon_category, IconCategory::Clear);
        assert_eq!(vm.forecast_days[0].display_date, "Mon, Jan 15");
        assert_eq!(vm.upcoming_hours.len(), 12);
    }
}
