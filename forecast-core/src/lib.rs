//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - The WeatherAPI.com fetcher and its typed error states
//! - Condition classification and date/hour formatting
//! - The presentation-agnostic weather view-model and its builder
//! - Configuration and the favorites/recent-searches store
//!
//! It is used by `forecast-cli`, but can also back any other renderer.

pub mod condition;
pub mod config;
pub mod datetime;
pub mod error;
pub mod model;
pub mod provider;
pub mod store;
pub mod view;

#[cfg(test)]
mod test_support;

pub use condition::{IconCategory, classify};
pub use config::{Config, FetchMode};
pub use datetime::{format_date, format_hour};
pub use error::WeatherFetchError;
pub use model::RawWeatherPayload;
pub use provider::{WeatherFetcher, fetch_or_cancel, fetcher_from_config, forecast};
pub use store::{Favorite, JsonFileStore, LocationStore, MemoryStore};
pub use view::{WeatherViewModel, build};
