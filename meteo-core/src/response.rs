//! Typed views over Open-Meteo JSON bodies.
//!
//! Hourly and daily sections come back column-wise: one `time` array plus one
//! array per metric. They are kept that way here ([`Timeline`]) and checked so
//! that every series lines up with its timestamps.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::MeteoError;

/// Where the server says the data is for, which may differ slightly from the requested point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Site {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub elevation: f64,
    #[serde(default, rename = "generationtime_ms")]
    pub generation_time_ms: f64,
    #[serde(default)]
    pub utc_offset_seconds: i32,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub timezone_abbreviation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentWeather {
    pub time: DateTime<FixedOffset>,
    pub temperature: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    /// WMO weather interpretation code.
    pub weather_code: u16,
    /// Older responses do not carry the flag.
    pub is_day: Option<bool>,
}

/// One metric's values; numeric for almost everything, text for e.g. `sunrise`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Series {
    Numbers(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl Series {
    pub fn len(&self) -> usize {
        match self {
            Series::Numbers(v) => v.len(),
            Series::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_numbers(&self) -> Option<&[Option<f64>]> {
        match self {
            Series::Numbers(v) => Some(v),
            Series::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&[Option<String>]> {
        match self {
            Series::Text(v) => Some(v),
            Series::Numbers(_) => None,
        }
    }
}

/// Timestamps plus metric series of the same length, one entry per timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline<T> {
    pub times: Vec<T>,
    /// Metric name to unit label, e.g. `temperature_2m` to `°C`.
    pub units: BTreeMap<String, String>,
    pub metrics: BTreeMap<String, Series>,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self {
            times: Vec::new(),
            units: BTreeMap::new(),
            metrics: BTreeMap::new(),
        }
    }
}

impl<T> Timeline<T> {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn series(&self, metric: &str) -> Option<&Series> {
        self.metrics.get(metric)
    }

    pub fn numbers(&self, metric: &str) -> Option<&[Option<f64>]> {
        self.series(metric).and_then(Series::as_numbers)
    }

    pub fn unit(&self, metric: &str) -> Option<&str> {
        self.units.get(metric).map(String::as_str)
    }
}

pub type HourlyTimeline = Timeline<DateTime<FixedOffset>>;
pub type DailyTimeline = Timeline<NaiveDate>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub site: Site,
    pub current_weather: Option<CurrentWeather>,
    pub hourly: HourlyTimeline,
    pub daily: DailyTimeline,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Historical {
    pub site: Site,
    pub hourly: HourlyTimeline,
    pub daily: DailyTimeline,
}

pub fn parse_current(body: &[u8]) -> Result<CurrentWeather, MeteoError> {
    let raw: RawCurrentEnvelope = serde_json::from_slice(body)?;
    let offset = utc_offset(raw.utc_offset_seconds)?;
    raw.current_weather.into_current(offset)
}

pub fn parse_forecast(body: &[u8]) -> Result<Forecast, MeteoError> {
    let raw: RawEnvelope = serde_json::from_slice(body)?;
    let offset = utc_offset(raw.site.utc_offset_seconds)?;

    let current_weather = raw
        .current_weather
        .map(|current| current.into_current(offset))
        .transpose()?;
    let hourly = hourly_timeline(raw.hourly, raw.hourly_units, offset)?;
    let daily = daily_timeline(raw.daily, raw.daily_units)?;

    Ok(Forecast {
        site: raw.site,
        current_weather,
        hourly,
        daily,
    })
}

pub fn parse_historical(body: &[u8]) -> Result<Historical, MeteoError> {
    let raw: RawEnvelope = serde_json::from_slice(body)?;
    let offset = utc_offset(raw.site.utc_offset_seconds)?;

    let hourly = hourly_timeline(raw.hourly, raw.hourly_units, offset)?;
    let daily = daily_timeline(raw.daily, raw.daily_units)?;

    Ok(Historical {
        site: raw.site,
        hourly,
        daily,
    })
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(flatten)]
    site: Site,
    current_weather: Option<RawCurrent>,
    #[serde(default)]
    hourly_units: BTreeMap<String, String>,
    hourly: Option<RawSection>,
    #[serde(default)]
    daily_units: BTreeMap<String, String>,
    daily: Option<RawSection>,
}

#[derive(Debug, Deserialize)]
struct RawCurrentEnvelope {
    #[serde(default)]
    utc_offset_seconds: i32,
    current_weather: RawCurrent,
}

#[derive(Debug, Deserialize)]
struct RawCurrent {
    time: String,
    temperature: f64,
    #[serde(alias = "wind_speed")]
    windspeed: f64,
    #[serde(alias = "wind_direction")]
    winddirection: f64,
    #[serde(alias = "weather_code")]
    weathercode: u16,
    is_day: Option<u8>,
}

impl RawCurrent {
    fn into_current(self, offset: FixedOffset) -> Result<CurrentWeather, MeteoError> {
        let time = parse_local_time(&self.time, offset).ok_or_else(|| MeteoError::Timestamp {
            section: "current_weather",
            value: self.time.clone(),
        })?;

        Ok(CurrentWeather {
            time,
            temperature: self.temperature,
            wind_speed: self.windspeed,
            wind_direction: self.winddirection,
            weather_code: self.weathercode,
            is_day: self.is_day.map(|flag| flag != 0),
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawSection {
    time: Vec<String>,
    #[serde(flatten)]
    series: BTreeMap<String, Series>,
}

fn hourly_timeline(
    raw: Option<RawSection>,
    units: BTreeMap<String, String>,
    offset: FixedOffset,
) -> Result<HourlyTimeline, MeteoError> {
    build_timeline("hourly", raw, units, |s| parse_local_time(s, offset))
}

fn daily_timeline(
    raw: Option<RawSection>,
    units: BTreeMap<String, String>,
) -> Result<DailyTimeline, MeteoError> {
    build_timeline("daily", raw, units, |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

fn build_timeline<T>(
    section: &'static str,
    raw: Option<RawSection>,
    mut units: BTreeMap<String, String>,
    parse_time: impl Fn(&str) -> Option<T>,
) -> Result<Timeline<T>, MeteoError> {
    let Some(raw) = raw else {
        return Ok(Timeline::default());
    };

    let times = raw
        .time
        .iter()
        .map(|s| {
            parse_time(s).ok_or_else(|| MeteoError::Timestamp {
                section,
                value: s.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (metric, series) in &raw.series {
        if series.len() != times.len() {
            return Err(MeteoError::SeriesLength {
                section,
                metric: metric.clone(),
                expected: times.len(),
                actual: series.len(),
            });
        }
    }

    units.remove("time");

    Ok(Timeline {
        times,
        units,
        metrics: raw.series,
    })
}

fn utc_offset(seconds: i32) -> Result<FixedOffset, MeteoError> {
    FixedOffset::east_opt(seconds).ok_or_else(|| MeteoError::Timestamp {
        section: "utc_offset_seconds",
        value: seconds.to_string(),
    })
}

/// Times are local to the requested timezone and carry no offset of their own.
fn parse_local_time(value: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()?;

    naive.and_local_timezone(offset).single()
}
