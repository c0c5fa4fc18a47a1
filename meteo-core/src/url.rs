//! Query-string construction for the forecast and archive endpoints.
//!
//! Parameter order is fixed so that the output is reproducible:
//! coordinates, then endpoint-specific parameters, then units, timezone,
//! `past_days` (forecast only) and finally the metric lists.

use std::fmt::Write;

use crate::{
    error::MeteoError,
    model::{ForecastOptions, HistoricalOptions, Location, PrecipitationUnit, TemperatureUnit, WindSpeedUnit},
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Build the forecast URL. Without options only the coordinates and the current-weather flag are sent.
pub fn forecast_url(base_url: &str, location: Location, opts: Option<&ForecastOptions>) -> String {
    let mut url = base_query(base_url, location);
    url.push_str("&current_weather=true");

    let Some(opts) = opts else {
        return url;
    };

    push_common(
        &mut url,
        Common {
            temperature_unit: opts.temperature_unit,
            wind_speed_unit: opts.wind_speed_unit,
            precipitation_unit: opts.precipitation_unit,
            timezone: opts.timezone.as_deref(),
        },
    );
    let _ = write!(url, "&past_days={}", opts.past_days);
    push_metrics(&mut url, &opts.hourly, &opts.daily);

    url
}

/// Build the archive URL.
///
/// Both dates must be present; a missing options value counts as missing dates.
pub fn historical_url(
    base_url: &str,
    location: Location,
    opts: Option<&HistoricalOptions>,
) -> Result<String, MeteoError> {
    let dates = opts.and_then(|o| o.start_date.zip(o.end_date).map(|dates| (o, dates)));
    let Some((opts, (start, end))) = dates else {
        return Err(MeteoError::Config(
            "please provide a start date and end date for historical data".to_string(),
        ));
    };

    if end < start {
        return Err(MeteoError::Config(format!(
            "end date {end} is before start date {start}"
        )));
    }

    let mut url = base_query(base_url, location);
    let _ = write!(
        url,
        "&start_date={}&end_date={}",
        start.format(DATE_FORMAT),
        end.format(DATE_FORMAT)
    );

    push_common(
        &mut url,
        Common {
            temperature_unit: opts.temperature_unit,
            wind_speed_unit: opts.wind_speed_unit,
            precipitation_unit: opts.precipitation_unit,
            timezone: opts.timezone.as_deref(),
        },
    );
    push_metrics(&mut url, &opts.hourly, &opts.daily);

    Ok(url)
}

struct Common<'a> {
    temperature_unit: Option<TemperatureUnit>,
    wind_speed_unit: Option<WindSpeedUnit>,
    precipitation_unit: Option<PrecipitationUnit>,
    timezone: Option<&'a str>,
}

fn base_query(base_url: &str, location: Location) -> String {
    format!(
        "{base_url}?latitude={:.6}&longitude={:.6}",
        location.latitude(),
        location.longitude()
    )
}

fn push_common(url: &mut String, common: Common<'_>) {
    if let Some(unit) = common.temperature_unit {
        let _ = write!(url, "&temperature_unit={unit}");
    }
    if let Some(unit) = common.wind_speed_unit {
        let _ = write!(url, "&wind_speed_unit={unit}");
    }
    if let Some(unit) = common.precipitation_unit {
        let _ = write!(url, "&precipitation_unit={unit}");
    }
    // Zone names carry slashes, e.g. America/Chicago.
    if let Some(tz) = common.timezone.filter(|tz| !tz.is_empty()) {
        let _ = write!(url, "&timezone={}", urlencoding::encode(tz));
    }
}

fn push_metrics(url: &mut String, hourly: &[String], daily: &[String]) {
    if !hourly.is_empty() {
        let _ = write!(url, "&hourly={}", hourly.join(","));
    }
    if !daily.is_empty() {
        let _ = write!(url, "&daily={}", daily.join(","));
    }
}
