//! Forecast batch builders shared by the integration tests

#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Europe::Amsterdam;
use serde_json::{Value, json};
use soaralarm::forecast::{ForecastBatch, NamedSeries};
use soaralarm::models::{AltitudeBand, DailyEntry, HourlySeries, RawSeries};

pub fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

pub fn local(date: NaiveDate, hour: u32) -> DateTime<Utc> {
    Amsterdam
        .from_local_datetime(&date.and_hms_opt(hour, 0, 0).unwrap())
        .unwrap()
        .with_timezone(&Utc)
}

/// Calm, dry days from local midnight of June 1st; sunrise 06:00, sunset 20:00
pub fn calm(days: u32) -> RawSeries {
    let start = local(june(1), 0);
    let hours = (days * 24) as usize;
    let time = (0..hours).map(|i| start + Duration::hours(i as i64)).collect();
    let daily = (0..days)
        .map(|d| {
            let date = june(1 + d);
            DailyEntry {
                date,
                sunrise: local(date, 6),
                sunset: local(date, 20),
            }
        })
        .collect();

    RawSeries::new(
        Amsterdam,
        daily,
        HourlySeries {
            time,
            temperature: vec![15.0; hours],
            visibility: vec![24_000.0; hours],
            wind_speed: vec![5.0; hours],
            wind_direction: vec![0.0; hours],
            wind_gusts: vec![10.0; hours],
            precipitation: vec![0.0; hours],
            temperature_aloft: Vec::new(),
            solar_irradiation: None,
        },
    )
}

/// Wind of `speed` km/h from `direction` on local `hours` of `date`
pub fn with_wind(
    mut series: RawSeries,
    date: NaiveDate,
    hours: std::ops::Range<u32>,
    speed: f64,
    direction: f64,
) -> RawSeries {
    for hour in hours {
        let target = local(date, hour);
        let i = series.hourly.time.iter().position(|t| *t == target).unwrap();
        series.hourly.wind_speed[i] = speed;
        series.hourly.wind_gusts[i] = speed + 8.0;
        series.hourly.wind_direction[i] = direction;
    }
    series
}

/// Unstable sunny air: 800 m band 10 °C colder than the surface
pub fn unstable(mut series: RawSeries) -> RawSeries {
    let hours = series.len();
    series.hourly.temperature_aloft = vec![AltitudeBand {
        altitude_m: 800.0,
        temperature: vec![5.0; hours],
    }];
    series.hourly.solar_irradiation = Some(vec![450.0; hours]);
    series
}

pub fn batch(model: &str, sites: Vec<(&str, RawSeries)>) -> ForecastBatch {
    ForecastBatch {
        model: model.to_string(),
        sites: sites
            .into_iter()
            .map(|(site, series)| NamedSeries {
                site: site.to_string(),
                series,
            })
            .collect(),
    }
}

pub fn to_json(batches: &[ForecastBatch]) -> Value {
    json!(batches)
}
