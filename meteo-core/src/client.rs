use std::future::Future;

use reqwest::{StatusCode, header::USER_AGENT};
use tracing::{debug, warn};

use crate::{
    cancel,
    config::ClientConfig,
    error::MeteoError,
    model::{ForecastOptions, HistoricalOptions, Location},
    response::{self, CurrentWeather, Forecast, Historical},
    url::{forecast_url, historical_url},
};

/// Handle to the forecast and archive endpoints.
///
/// Cheap to clone; clones share one connection pool and may be used from many tasks at once.
#[derive(Debug, Clone)]
pub struct Client {
    forecast_url: String,
    historical_url: String,
    user_agent: String,
    http: reqwest::Client,
}

impl Client {
    /// Client for the public Open-Meteo endpoints.
    pub fn new() -> Result<Self, MeteoError> {
        Self::from_config(&ClientConfig::default())
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, MeteoError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(MeteoError::ClientBuild)?;

        Ok(Self::with_http(config, http))
    }

    /// Reuse an existing transport, e.g. one shared with the rest of an application.
    pub fn with_http(config: &ClientConfig, http: reqwest::Client) -> Self {
        Self {
            forecast_url: config.forecast_url.clone(),
            historical_url: config.historical_url.clone(),
            user_agent: config.user_agent.clone(),
            http,
        }
    }

    pub fn forecast_url(&self) -> &str {
        &self.forecast_url
    }

    pub fn historical_url(&self) -> &str {
        &self.historical_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// GET `url` and return the body of a `200 OK` response.
    ///
    /// Resolving `cancel` first abandons the request and yields [`MeteoError::Cancelled`].
    pub async fn fetch<C>(&self, url: &str, cancel: C) -> Result<Vec<u8>, MeteoError>
    where
        C: Future<Output = ()>,
    {
        cancel::until(self.send(url), cancel).await
    }

    async fn send(&self, url: &str) -> Result<Vec<u8>, MeteoError> {
        debug!(url, "sending request");

        let res = self
            .http
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|source| MeteoError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = res.status();
        if status != StatusCode::OK {
            // Only used to enrich the error.
            let body = res.text().await.unwrap_or_default();
            warn!(%status, url, "request rejected by server");
            return Err(MeteoError::Http { status, body });
        }

        let body = res.bytes().await.map_err(MeteoError::Body)?;
        debug!(url, bytes = body.len(), "received response");

        Ok(body.to_vec())
    }

    /// Raw forecast body, current weather included.
    pub async fn get_forecast(
        &self,
        location: Location,
        opts: Option<&ForecastOptions>,
    ) -> Result<Vec<u8>, MeteoError> {
        let url = forecast_url(&self.forecast_url, location, opts);
        self.fetch(&url, std::future::pending()).await
    }

    /// Raw archive body. Fails without any I/O when the dates are missing.
    pub async fn get_historical(
        &self,
        location: Location,
        opts: Option<&HistoricalOptions>,
    ) -> Result<Vec<u8>, MeteoError> {
        let url = historical_url(&self.historical_url, location, opts)?;
        self.fetch(&url, std::future::pending()).await
    }

    pub async fn current_weather(
        &self,
        location: Location,
        opts: Option<&ForecastOptions>,
    ) -> Result<CurrentWeather, MeteoError> {
        let body = self.get_forecast(location, opts).await?;
        response::parse_current(&body)
    }

    pub async fn forecast(
        &self,
        location: Location,
        opts: Option<&ForecastOptions>,
    ) -> Result<Forecast, MeteoError> {
        let body = self.get_forecast(location, opts).await?;
        response::parse_forecast(&body)
    }

    pub async fn historical(
        &self,
        location: Location,
        opts: Option<&HistoricalOptions>,
    ) -> Result<Historical, MeteoError> {
        let body = self.get_historical(location, opts).await?;
        response::parse_historical(&body)
    }
}
