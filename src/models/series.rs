//! Raw forecast series as delivered by the retrieval layer
//!
//! A series holds one site's daily sunrise/sunset entries and parallel hourly
//! arrays. The classifiers only ever read it; [`RawSeries::validate`] checks
//! the shape invariants the rest of the crate relies on.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// Sunrise and sunset for one local calendar date
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

/// Temperatures at one altitude above the site
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AltitudeBand {
    pub altitude_m: f64,
    pub temperature: Vec<f64>,
}

/// Parallel hourly arrays, all indexed like `time`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HourlySeries {
    pub time: Vec<DateTime<Utc>>,
    /// °C at 2 m
    pub temperature: Vec<f64>,
    /// Metres
    pub visibility: Vec<f64>,
    /// km/h at 10 m
    pub wind_speed: Vec<f64>,
    /// Degrees, direction the wind comes from
    pub wind_direction: Vec<f64>,
    /// km/h
    pub wind_gusts: Vec<f64>,
    /// mm
    pub precipitation: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub temperature_aloft: Vec<AltitudeBand>,
    /// W/m²
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solar_irradiation: Option<Vec<f64>>,
}

/// One site's forecast
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawSeries {
    /// Zone used for calendar dates and wall-clock comparisons
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
    #[serde(default)]
    pub daily: Vec<DailyEntry>,
    pub hourly: HourlySeries,
}

fn default_timezone() -> Tz {
    chrono_tz::Europe::Berlin
}

/// A single timestamp's slice across the surface arrays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourRecord {
    pub index: usize,
    pub time: DateTime<Utc>,
    pub temperature: f64,
    pub visibility: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub wind_gusts: f64,
    pub precipitation: f64,
}

impl RawSeries {
    #[must_use]
    pub fn new(timezone: Tz, daily: Vec<DailyEntry>, hourly: HourlySeries) -> Self {
        Self {
            timezone,
            daily,
            hourly,
        }
    }

    /// Check array lengths, hourly cadence and daily coverage
    pub fn validate(&self) -> crate::Result<()> {
        let hourly = &self.hourly;
        let expected = hourly.time.len();

        let surface = [
            ("temperature", hourly.temperature.len()),
            ("visibility", hourly.visibility.len()),
            ("wind_speed", hourly.wind_speed.len()),
            ("wind_direction", hourly.wind_direction.len()),
            ("wind_gusts", hourly.wind_gusts.len()),
            ("precipitation", hourly.precipitation.len()),
        ];
        for (name, len) in surface {
            check_length(name, len, expected)?;
        }
        for band in &hourly.temperature_aloft {
            check_length(
                &format!("temperature at {} m", band.altitude_m),
                band.temperature.len(),
                expected,
            )?;
        }
        if let Some(irradiation) = &hourly.solar_irradiation {
            check_length("solar_irradiation", irradiation.len(), expected)?;
        }

        for pair in hourly.time.windows(2) {
            if pair[1] - pair[0] != Duration::hours(1) {
                return Err(ForecastError::malformed(format!(
                    "hourly timestamps must advance by one hour, got {} -> {}",
                    pair[0], pair[1]
                )));
            }
        }

        let dates = self.local_dates();
        if dates.len() != self.daily.len() {
            return Err(ForecastError::malformed(format!(
                "{} daily entries for {} calendar dates",
                self.daily.len(),
                dates.len()
            )));
        }

        Ok(())
    }

    /// Local calendar date of an instant
    #[must_use]
    pub fn local_date(&self, time: DateTime<Utc>) -> NaiveDate {
        time.with_timezone(&self.timezone).date_naive()
    }

    /// Distinct local dates spanned by the hourly arrays, in order
    #[must_use]
    pub fn local_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .hourly
            .time
            .iter()
            .map(|t| self.local_date(*t))
            .collect();
        dates.dedup();
        dates
    }

    /// Sunrise/sunset entry for exactly `date`
    pub fn daily_entry(&self, date: NaiveDate) -> crate::Result<&DailyEntry> {
        self.daily
            .iter()
            .find(|entry| entry.date == date)
            .ok_or_else(|| ForecastError::missing_day(date))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hourly.time.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hourly.time.is_empty()
    }

    /// Hour `index` across the surface arrays
    #[must_use]
    pub fn hour(&self, index: usize) -> Option<HourRecord> {
        let h = &self.hourly;
        Some(HourRecord {
            index,
            time: *h.time.get(index)?,
            temperature: *h.temperature.get(index)?,
            visibility: *h.visibility.get(index)?,
            wind_speed: *h.wind_speed.get(index)?,
            wind_direction: *h.wind_direction.get(index)?,
            wind_gusts: *h.wind_gusts.get(index)?,
            precipitation: *h.precipitation.get(index)?,
        })
    }

    /// Every hour in timestamp order
    pub fn hours(&self) -> impl Iterator<Item = HourRecord> + '_ {
        (0..self.len()).filter_map(|i| self.hour(i))
    }

    /// Hours on local `date` whose timestamp lies within `[start, end]`
    pub fn hours_within(
        &self,
        date: NaiveDate,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Iterator<Item = HourRecord> + '_ {
        self.hours()
            .filter(move |h| h.time >= start && h.time <= end && self.local_date(h.time) == date)
    }

    /// Temperature band closest to `altitude_m`, within one metre
    #[must_use]
    pub fn aloft_band(&self, altitude_m: f64) -> Option<&AltitudeBand> {
        self.hourly
            .temperature_aloft
            .iter()
            .find(|band| (band.altitude_m - altitude_m).abs() < 1.0)
    }
}

fn check_length(name: &str, len: usize, expected: usize) -> crate::Result<()> {
    if len == expected {
        Ok(())
    } else {
        Err(ForecastError::malformed(format!(
            "{name} has {len} values, expected {expected}"
        )))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Builders shared by the unit tests of the flyability modules

    use super::*;
    use chrono::TimeZone;

    /// Hourly cadence starting at local midnight of `first` for `days` days,
    /// calm dry weather everywhere; sunrise 06:00 and sunset 20:00 local.
    pub fn calm_series(first: NaiveDate, days: u32) -> RawSeries {
        let tz = chrono_tz::Europe::Amsterdam;
        let start = tz
            .from_local_datetime(&first.and_hms_opt(0, 0, 0).unwrap())
            .unwrap()
            .with_timezone(&Utc);
        let hours = (days * 24) as usize;
        let time: Vec<DateTime<Utc>> = (0..hours)
            .map(|i| start + Duration::hours(i as i64))
            .collect();

        let mut series = RawSeries::new(
            tz,
            Vec::new(),
            HourlySeries {
                time,
                temperature: vec![15.0; hours],
                visibility: vec![24_000.0; hours],
                wind_speed: vec![0.0; hours],
                wind_direction: vec![0.0; hours],
                wind_gusts: vec![0.0; hours],
                precipitation: vec![0.0; hours],
                temperature_aloft: Vec::new(),
                solar_irradiation: None,
            },
        );
        series.daily = series
            .local_dates()
            .into_iter()
            .map(|date| DailyEntry {
                date,
                sunrise: local(tz, date, 6),
                sunset: local(tz, date, 20),
            })
            .collect();
        series
    }

    pub fn local(tz: Tz, date: NaiveDate, hour: u32) -> DateTime<Utc> {
        tz.from_local_datetime(&date.and_hms_opt(hour, 0, 0).unwrap())
            .unwrap()
            .with_timezone(&Utc)
    }

    /// Index of local `hour` on `date`
    pub fn index_at(series: &RawSeries, date: NaiveDate, hour: u32) -> usize {
        let target = local(series.timezone, date, hour);
        series
            .hourly
            .time
            .iter()
            .position(|t| *t == target)
            .unwrap()
    }

    /// Set soaring-relevant wind at one local hour
    pub fn set_wind(
        series: &mut RawSeries,
        date: NaiveDate,
        hour: u32,
        speed: f64,
        gusts: f64,
        direction: f64,
    ) {
        let i = index_at(series, date, hour);
        series.hourly.wind_speed[i] = speed;
        series.hourly.wind_gusts[i] = gusts;
        series.hourly.wind_direction[i] = direction;
    }

    /// Add an 800 m band and irradiation, both constant
    pub fn with_thermal_levels(mut series: RawSeries, aloft: f64, irradiation: f64) -> RawSeries {
        let hours = series.len();
        series.hourly.temperature_aloft = vec![AltitudeBand {
            altitude_m: 800.0,
            temperature: vec![aloft; hours],
        }];
        series.hourly.solar_irradiation = Some(vec![irradiation; hours]);
        series
    }
}
