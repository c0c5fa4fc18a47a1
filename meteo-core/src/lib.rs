//! Client library for the Open-Meteo weather API.
//!
//! This crate defines:
//! - Query URL construction for the forecast and archive endpoints
//! - An HTTP client with cancellation and status checking
//! - Typed views over the JSON responses
//! - Client configuration and its on-disk TOML form
//!
//! It is used by `meteo-cli`, but can also be reused by other binaries or services.
//!
//! ```no_run
//! # async fn run() -> Result<(), meteo_core::MeteoError> {
//! use meteo_core::{Client, ForecastOptions, Location, TemperatureUnit};
//!
//! let client = Client::new()?;
//! let opts = ForecastOptions {
//!     temperature_unit: Some(TemperatureUnit::Celsius),
//!     hourly: vec!["temperature_2m".into()],
//!     ..ForecastOptions::default()
//! };
//! let forecast = client.forecast(Location::new(52.3738, 4.8910), Some(&opts)).await?;
//! println!("{:?}", forecast.current_weather);
//! # Ok(())
//! # }
//! ```

pub mod cancel;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod response;
pub mod url;

pub use client::Client;
pub use config::{ClientConfig, DEFAULT_FORECAST_URL, DEFAULT_HISTORICAL_URL, DEFAULT_USER_AGENT};
pub use error::MeteoError;
pub use model::{
    ForecastOptions, HistoricalOptions, Location, PrecipitationUnit, TemperatureUnit, WindSpeedUnit,
};
pub use provider::WeatherSource;
pub use response::{
    CurrentWeather, DailyTimeline, Forecast, Historical, HourlyTimeline, Series, Site, Timeline,
    parse_current, parse_forecast, parse_historical,
};
