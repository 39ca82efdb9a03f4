//! Astronomical sunrise and sunset
//!
//! Some feeds deliver hourly data without a `daily` block. For those the
//! daylight entries are computed from the site position.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use sunrise::{Coordinates, SolarDay, SolarEvent};
use tracing::debug;

use crate::error::ForecastError;
use crate::models::{DailyEntry, Position, RawSeries};

/// Local wall-clock stand-ins when the sun never rises or never sets
const POLAR_SUNRISE_HOUR: u32 = 6;
const POLAR_SUNSET_HOUR: u32 = 19;

/// Sunrise and sunset at `position` on local `date`
pub fn solar_entry(position: Position, date: NaiveDate, timezone: Tz) -> crate::Result<DailyEntry> {
    let coordinates = Coordinates::new(position.lat, position.lon).ok_or_else(|| {
        ForecastError::validation(format!(
            "Invalid coordinates: lat={}, lon={}",
            position.lat, position.lon
        ))
    })?;

    let solar_day = SolarDay::new(coordinates, date);
    let sunrise = solar_day
        .event_time(SolarEvent::Sunrise)
        .unwrap_or_else(|| local_hour(timezone, date, POLAR_SUNRISE_HOUR));
    let sunset = solar_day
        .event_time(SolarEvent::Sunset)
        .unwrap_or_else(|| local_hour(timezone, date, POLAR_SUNSET_HOUR));

    Ok(DailyEntry {
        date,
        sunrise,
        sunset,
    })
}

/// Derive `daily` from the hourly dates when the feed left it out.
///
/// Returns whether anything was filled in.
pub fn fill_missing_daily(series: &mut RawSeries, position: Position) -> crate::Result<bool> {
    if !series.daily.is_empty() || series.is_empty() {
        return Ok(false);
    }

    let timezone = series.timezone;
    series.daily = series
        .local_dates()
        .into_iter()
        .map(|date| solar_entry(position, date, timezone))
        .collect::<crate::Result<Vec<_>>>()?;

    debug!(
        "Computed {} daylight entries for {:.3}N {:.3}E",
        series.daily.len(),
        position.lat,
        position.lon
    );
    Ok(true)
}

fn local_hour(timezone: Tz, date: NaiveDate, hour: u32) -> DateTime<Utc> {
    let wall_clock = date.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default());
    timezone
        .from_local_datetime(&wall_clock)
        .earliest()
        .map_or_else(|| wall_clock.and_utc(), |local| local.with_timezone(&Utc))
}
