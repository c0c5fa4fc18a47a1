use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the globe. The range is not checked here; the server rejects nonsense.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

impl Location {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

macro_rules! unit_enum {
    ($(#[$meta:meta])* $name:ident, $label:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub const fn all() -> &'static [$name] {
                &[$($name::$variant),+]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<&str> for $name {
            type Error = anyhow::Error;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                let lower = value.to_lowercase();

                match lower.as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => {
                        let supported: Vec<&str> = $name::all().iter().map(|u| u.as_str()).collect();
                        Err(anyhow::anyhow!(
                            "Unknown {} '{}'. Supported values: {}.",
                            $label,
                            value,
                            supported.join(", ")
                        ))
                    }
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::try_from(s)
            }
        }
    };
}

unit_enum!(
    /// Unit for every temperature metric in the response.
    TemperatureUnit, "temperature unit" {
        Celsius => "celsius",
        Fahrenheit => "fahrenheit",
    }
);

unit_enum!(
    WindSpeedUnit, "wind speed unit" {
        Kmh => "kmh",
        Ms => "ms",
        Mph => "mph",
        Kn => "kn",
    }
);

unit_enum!(
    PrecipitationUnit, "precipitation unit" {
        Mm => "mm",
        Inch => "inch",
    }
);

/// Knobs for the forecast endpoint. Leaving a field unset keeps the server default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastOptions {
    pub temperature_unit: Option<TemperatureUnit>,
    pub wind_speed_unit: Option<WindSpeedUnit>,
    pub precipitation_unit: Option<PrecipitationUnit>,
    /// IANA name such as `Europe/Amsterdam`, or `auto`.
    pub timezone: Option<String>,
    /// Always sent once options are given; `0` is a real request for no past days.
    pub past_days: u32,
    /// See <https://open-meteo.com/en/docs> for metric names.
    pub hourly: Vec<String>,
    pub daily: Vec<String>,
}

/// Knobs for the archive endpoint.
///
/// Both dates are required when a request is built; they are optional here
/// only so that a half-filled value can be rejected with a proper error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalOptions {
    pub temperature_unit: Option<TemperatureUnit>,
    pub wind_speed_unit: Option<WindSpeedUnit>,
    pub precipitation_unit: Option<PrecipitationUnit>,
    pub timezone: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub hourly: Vec<String>,
    pub daily: Vec<String>,
}

impl HistoricalOptions {
    /// Options covering `start..=end` with everything else left to the server.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start_date: Some(start),
            end_date: Some(end),
            ..Self::default()
        }
    }
}
