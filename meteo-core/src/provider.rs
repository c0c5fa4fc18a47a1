use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Client, Location, MeteoError,
    model::{ForecastOptions, HistoricalOptions},
    response::{CurrentWeather, Forecast, Historical},
};

/// The typed operations a caller needs, so that [`Client`] can be swapped for a fake.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current_weather(
        &self,
        location: Location,
        opts: Option<&ForecastOptions>,
    ) -> Result<CurrentWeather, MeteoError>;

    async fn forecast(
        &self,
        location: Location,
        opts: Option<&ForecastOptions>,
    ) -> Result<Forecast, MeteoError>;

    async fn historical(
        &self,
        location: Location,
        opts: Option<&HistoricalOptions>,
    ) -> Result<Historical, MeteoError>;
}

#[async_trait]
impl WeatherSource for Client {
    async fn current_weather(
        &self,
        location: Location,
        opts: Option<&ForecastOptions>,
    ) -> Result<CurrentWeather, MeteoError> {
        Client::current_weather(self, location, opts).await
    }

    async fn forecast(
        &self,
        location: Location,
        opts: Option<&ForecastOptions>,
    ) -> Result<Forecast, MeteoError> {
        Client::forecast(self, location, opts).await
    }

    async fn historical(
        &self,
        location: Location,
        opts: Option<&HistoricalOptions>,
    ) -> Result<Historical, MeteoError> {
        Client::historical(self, location, opts).await
    }
}
