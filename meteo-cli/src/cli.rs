use std::{future::Future, io};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use meteo_core::{
    Client, ClientConfig, ForecastOptions, HistoricalOptions, Location, PrecipitationUnit,
    TemperatureUnit, WeatherSource, WindSpeedUnit, cancel,
};
use tracing::warn;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Open-Meteo weather CLI")]
pub struct Cli {
    /// Log requests and responses to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the current weather for a coordinate.
    Current {
        #[command(flatten)]
        at: Coordinates,

        #[command(flatten)]
        units: UnitArgs,
    },

    /// Show the forecast, optionally with hourly and daily metrics.
    Forecast {
        #[command(flatten)]
        at: Coordinates,

        #[command(flatten)]
        units: UnitArgs,

        /// Also include this many days of the past.
        #[arg(long, default_value_t = 0)]
        past_days: u32,

        #[command(flatten)]
        metrics: MetricArgs,
    },

    /// Show observed weather for a date range.
    Historical {
        #[command(flatten)]
        at: Coordinates,

        #[command(flatten)]
        units: UnitArgs,

        /// First day, YYYY-MM-DD.
        #[arg(long)]
        start: NaiveDate,

        /// Last day (inclusive), YYYY-MM-DD.
        #[arg(long)]
        end: NaiveDate,

        #[command(flatten)]
        metrics: MetricArgs,
    },

    /// Change endpoints, user agent or timeout in the config file.
    Configure {
        #[arg(long)]
        forecast_url: Option<String>,

        #[arg(long)]
        historical_url: Option<String>,

        #[arg(long)]
        user_agent: Option<String>,

        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

#[derive(Debug, Args)]
pub struct Coordinates {
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
}

impl Coordinates {
    fn location(&self) -> Location {
        Location::new(self.lat, self.lon)
    }
}

#[derive(Debug, Args)]
pub struct UnitArgs {
    /// celsius or fahrenheit.
    #[arg(long)]
    pub temperature_unit: Option<TemperatureUnit>,

    /// kmh, ms, mph or kn.
    #[arg(long)]
    pub wind_speed_unit: Option<WindSpeedUnit>,

    /// mm or inch.
    #[arg(long)]
    pub precipitation_unit: Option<PrecipitationUnit>,

    /// IANA zone such as Europe/Amsterdam, or "auto".
    #[arg(long)]
    pub timezone: Option<String>,
}

#[derive(Debug, Args)]
pub struct MetricArgs {
    /// Comma-separated hourly metrics, e.g. temperature_2m,rain.
    #[arg(long, value_delimiter = ',')]
    pub hourly: Vec<String>,

    /// Comma-separated daily metrics, e.g. temperature_2m_max.
    #[arg(long, value_delimiter = ',')]
    pub daily: Vec<String>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure {
                forecast_url,
                historical_url,
                user_agent,
                timeout_secs,
            } => configure(forecast_url, historical_url, user_agent, timeout_secs),
            command => {
                let config = ClientConfig::load()?;
                let client =
                    Client::from_config(&config).context("Failed to create weather client")?;

                let output =
                    execute(&client, command, interrupted(tokio::signal::ctrl_c())).await?;
                print!("{output}");

                Ok(())
            }
        }
    }
}

/// Resolves once `signal` fires. If the handler could not be installed the
/// request simply cannot be interrupted.
async fn interrupted<S>(signal: S)
where
    S: Future<Output = io::Result<()>>,
{
    if let Err(err) = signal.await {
        warn!(error = %err, "Ctrl-C handler unavailable; requests cannot be interrupted");
        std::future::pending::<()>().await;
    }
}

/// Run a weather command against `source` and render the result.
pub async fn execute<C>(
    source: &dyn WeatherSource,
    command: Command,
    cancel: C,
) -> anyhow::Result<String>
where
    C: Future<Output = ()>,
{
    match command {
        Command::Current { at, units } => {
            let opts = forecast_options(units, 0, None);
            let current = cancel::until(source.current_weather(at.location(), Some(&opts)), cancel)
                .await
                .context("Failed to fetch current weather")?;
            Ok(render::current(&current))
        }
        Command::Forecast {
            at,
            units,
            past_days,
            metrics,
        } => {
            let opts = forecast_options(units, past_days, Some(metrics));
            let forecast = cancel::until(source.forecast(at.location(), Some(&opts)), cancel)
                .await
                .context("Failed to fetch forecast")?;
            Ok(render::forecast(&forecast))
        }
        Command::Historical {
            at,
            units,
            start,
            end,
            metrics,
        } => {
            let opts = HistoricalOptions {
                temperature_unit: units.temperature_unit,
                wind_speed_unit: units.wind_speed_unit,
                precipitation_unit: units.precipitation_unit,
                timezone: units.timezone,
                start_date: Some(start),
                end_date: Some(end),
                hourly: metrics.hourly,
                daily: metrics.daily,
            };
            let historical = cancel::until(source.historical(at.location(), Some(&opts)), cancel)
                .await
                .context("Failed to fetch historical weather")?;
            Ok(render::historical(&historical))
        }
        Command::Configure { .. } => {
            anyhow::bail!("`configure` does not talk to the weather service")
        }
    }
}

fn forecast_options(units: UnitArgs, past_days: u32, metrics: Option<MetricArgs>) -> ForecastOptions {
    let (hourly, daily) = metrics.map_or_else(Default::default, |m| (m.hourly, m.daily));

    ForecastOptions {
        temperature_unit: units.temperature_unit,
        wind_speed_unit: units.wind_speed_unit,
        precipitation_unit: units.precipitation_unit,
        timezone: units.timezone,
        past_days,
        hourly,
        daily,
    }
}

fn configure(
    forecast_url: Option<String>,
    historical_url: Option<String>,
    user_agent: Option<String>,
    timeout_secs: Option<u64>,
) -> anyhow::Result<()> {
    let mut config = ClientConfig::load()?;
    let nothing_given = forecast_url.is_none()
        && historical_url.is_none()
        && user_agent.is_none()
        && timeout_secs.is_none();

    if nothing_given {
        config.user_agent = inquire::Text::new("User-Agent:")
            .with_default(&config.user_agent)
            .prompt()
            .context("Failed to read User-Agent")?;
    }

    if let Some(url) = forecast_url {
        config.forecast_url = url;
    }
    if let Some(url) = historical_url {
        config.historical_url = url;
    }
    if let Some(agent) = user_agent {
        config.user_agent = agent;
    }
    if timeout_secs.is_some() {
        config.timeout_secs = timeout_secs;
    }

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{FixedOffset, TimeZone};
    use meteo_core::{CurrentWeather, Forecast, Historical, MeteoError, Site, Timeline};
    use std::sync::Mutex;

    /// Records the options it is called with and answers with canned data.
    #[derive(Debug, Default)]
    struct FakeSource {
        forecast_opts: Mutex<Vec<ForecastOptions>>,
        historical_opts: Mutex<Vec<HistoricalOptions>>,
    }

    fn sample_current() -> CurrentWeather {
        CurrentWeather {
            time: FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2023, 8, 1, 12, 0, 0)
                .unwrap(),
            temperature: 18.0,
            wind_speed: 5.5,
            wind_direction: 90.0,
            weather_code: 1,
            is_day: Some(true),
        }
    }

    #[async_trait]
    impl WeatherSource for FakeSource {
        async fn current_weather(
            &self,
            _location: Location,
            opts: Option<&ForecastOptions>,
        ) -> Result<CurrentWeather, MeteoError> {
            self.forecast_opts.lock().unwrap().extend(opts.cloned());
            Ok(sample_current())
        }

        async fn forecast(
            &self,
            _location: Location,
            opts: Option<&ForecastOptions>,
        ) -> Result<Forecast, MeteoError> {
            self.forecast_opts.lock().unwrap().extend(opts.cloned());
            Ok(Forecast {
                site: Site::default(),
                current_weather: Some(sample_current()),
                hourly: Timeline::default(),
                daily: Timeline::default(),
            })
        }

        async fn historical(
            &self,
            _location: Location,
            opts: Option<&HistoricalOptions>,
        ) -> Result<Historical, MeteoError> {
            self.historical_opts.lock().unwrap().extend(opts.cloned());
            Ok(Historical {
                site: Site::default(),
                hourly: Timeline::default(),
                daily: Timeline::default(),
            })
        }
    }

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(args).expect("arguments must parse").command
    }

    #[tokio::test]
    async fn forecast_flags_become_options() {
        let source = FakeSource::default();
        let command = parse(&[
            "meteo",
            "forecast",
            "--lat",
            "-33.87",
            "--lon",
            "151.21",
            "--temperature-unit",
            "fahrenheit",
            "--timezone",
            "Australia/Sydney",
            "--past-days",
            "2",
            "--hourly",
            "temperature_2m,rain",
        ]);

        let output = execute(&source, command, std::future::pending()).await.unwrap();
        assert!(output.contains("Current weather"));

        let seen = source.forecast_opts.lock().unwrap();
        assert_eq!(
            seen.as_slice(),
            &[ForecastOptions {
                temperature_unit: Some(TemperatureUnit::Fahrenheit),
                timezone: Some("Australia/Sydney".to_string()),
                past_days: 2,
                hourly: vec!["temperature_2m".to_string(), "rain".to_string()],
                ..ForecastOptions::default()
            }]
        );
    }

    #[tokio::test]
    async fn historical_flags_carry_dates() {
        let source = FakeSource::default();
        let command = parse(&[
            "meteo",
            "historical",
            "--lat",
            "52.52",
            "--lon",
            "13.41",
            "--start",
            "2023-07-25",
            "--end",
            "2023-08-08",
            "--daily",
            "temperature_2m_max",
        ]);

        execute(&source, command, std::future::pending()).await.unwrap();

        let seen = source.historical_opts.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].start_date, NaiveDate::from_ymd_opt(2023, 7, 25));
        assert_eq!(seen[0].end_date, NaiveDate::from_ymd_opt(2023, 8, 8));
        assert_eq!(seen[0].daily, vec!["temperature_2m_max".to_string()]);
    }

    #[test]
    fn unknown_unit_is_rejected_by_the_parser() {
        let err = Cli::try_parse_from([
            "meteo",
            "current",
            "--lat",
            "1",
            "--lon",
            "2",
            "--wind-speed-unit",
            "furlongs",
        ])
        .unwrap_err();

        assert!(err.to_string().contains("Unknown wind speed unit"));
    }

    #[tokio::test]
    async fn failed_signal_registration_does_not_cancel() {
        let source = FakeSource::default();
        let command = parse(&["meteo", "current", "--lat", "1", "--lon", "2"]);

        let broken_signal = async { Err(io::Error::other("signal handler unavailable")) };
        let output = execute(&source, command, interrupted(broken_signal))
            .await
            .expect("command must not be reported as cancelled");
        assert!(output.contains("Current weather"));
    }

    #[tokio::test]
    async fn delivered_signal_cancels() {
        let source = FakeSource::default();
        let command = parse(&["meteo", "current", "--lat", "1", "--lon", "2"]);

        let err = execute(&source, command, interrupted(async { Ok(()) }))
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("cancelled"));
    }

    #[tokio::test]
    async fn cancellation_surfaces_as_error() {
        let source = FakeSource::default();
        let command = parse(&["meteo", "current", "--lat", "1", "--lon", "2"]);

        // The fake answers immediately, so only an already-fired cancel can win.
        let err = execute(&source, command, async {}).await.unwrap_err();
        assert!(format!("{err:#}").contains("cancelled"));
    }
}
