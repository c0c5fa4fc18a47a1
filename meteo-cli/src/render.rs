//! Plain-text output for the terminal.

use std::fmt::{Display, Write};

use meteo_core::{CurrentWeather, Forecast, Historical, Series, Site, Timeline};

pub fn current(current: &CurrentWeather) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Current weather at {}", current.time.format("%Y-%m-%d %H:%M %:z"));
    let _ = writeln!(out, "  temperature:    {}", current.temperature);
    let _ = writeln!(out, "  wind speed:     {}", current.wind_speed);
    let _ = writeln!(out, "  wind direction: {}°", current.wind_direction);
    let _ = writeln!(out, "  weather code:   {}", current.weather_code);
    if let Some(is_day) = current.is_day {
        let _ = writeln!(out, "  daylight:       {}", if is_day { "yes" } else { "no" });
    }
    out
}

pub fn forecast(forecast: &Forecast) -> String {
    let mut out = site(&forecast.site);
    if let Some(now) = &forecast.current_weather {
        out.push('\n');
        out.push_str(&current(now));
    }
    push_timeline(&mut out, "Hourly", &forecast.hourly, |t| t.format("%Y-%m-%d %H:%M").to_string());
    push_timeline(&mut out, "Daily", &forecast.daily, |d| d.to_string());
    out
}

pub fn historical(historical: &Historical) -> String {
    let mut out = site(&historical.site);
    push_timeline(&mut out, "Hourly", &historical.hourly, |t| t.format("%Y-%m-%d %H:%M").to_string());
    push_timeline(&mut out, "Daily", &historical.daily, |d| d.to_string());
    out
}

fn site(site: &Site) -> String {
    format!(
        "Location {:.4}, {:.4} ({} m), timezone {} ({})\n",
        site.latitude, site.longitude, site.elevation, site.timezone, site.timezone_abbreviation
    )
}

fn push_timeline<T>(
    out: &mut String,
    title: &str,
    timeline: &Timeline<T>,
    label: impl Fn(&T) -> String,
) {
    if timeline.is_empty() {
        return;
    }

    let _ = writeln!(out, "\n{title}:");

    let mut header = format!("{:<18}", "time");
    for metric in timeline.metrics.keys() {
        match timeline.unit(metric) {
            Some(unit) => {
                let _ = write!(header, " {:>22}", format!("{metric} ({unit})"));
            }
            None => {
                let _ = write!(header, " {metric:>22}");
            }
        }
    }
    let _ = writeln!(out, "{}", header.trim_end());

    for (i, time) in timeline.times.iter().enumerate() {
        let mut row = format!("{:<18}", label(time));
        for series in timeline.metrics.values() {
            let _ = write!(row, " {:>22}", cell(series, i));
        }
        let _ = writeln!(out, "{}", row.trim_end());
    }
}

fn cell(series: &Series, i: usize) -> String {
    match series {
        Series::Numbers(values) => or_dash(values.get(i).copied().flatten()),
        Series::Text(values) => or_dash(values.get(i).cloned().flatten()),
    }
}

fn or_dash<V: Display>(value: Option<V>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, TimeZone};
    use meteo_core::DailyTimeline;
    use std::collections::BTreeMap;

    #[test]
    fn current_shows_every_field() {
        let time = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2023, 8, 1, 12, 0, 0)
            .unwrap();
        let text = current(&CurrentWeather {
            time,
            temperature: 21.5,
            wind_speed: 9.0,
            wind_direction: 180.0,
            weather_code: 2,
            is_day: Some(false),
        });

        assert!(text.contains("2023-08-01 12:00 +01:00"));
        assert!(text.contains("temperature:    21.5"));
        assert!(text.contains("daylight:       no"));
    }

    #[test]
    fn timeline_rows_mark_missing_values() {
        let daily = DailyTimeline {
            times: vec![
                NaiveDate::from_ymd_opt(2023, 5, 1).unwrap(),
                NaiveDate::from_ymd_opt(2023, 5, 2).unwrap(),
            ],
            units: BTreeMap::from([("rain_sum".to_string(), "mm".to_string())]),
            metrics: BTreeMap::from([(
                "rain_sum".to_string(),
                Series::Numbers(vec![Some(1.5), None]),
            )]),
        };

        let text = historical(&Historical {
            site: Site::default(),
            hourly: Timeline::default(),
            daily,
        });

        assert!(text.contains("Daily:"));
        assert!(!text.contains("Hourly:"));
        assert!(text.contains("rain_sum (mm)"));
        let rows: Vec<&str> = text.lines().filter(|l| l.starts_with("2023-05-0")).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].ends_with("1.5"));
        assert!(rows[1].ends_with('-'));
    }
}
