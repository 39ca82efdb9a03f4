//! Thermal classification
//!
//! Thermal sites are judged hour by hour between sunrise and sunset. An hour
//! is flyable when it is dry, clear enough and the wind is light and from an
//! acceptable direction. A flyable hour also counts as a thermal hour when the
//! air cools fast enough with height and the sun delivers enough energy.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::angle::HeadingRange;
use super::soar::GanttInterval;
use super::summary::{ClassifiedDay, MarkerColor};
use super::window::window;
use crate::error::ForecastError;
use crate::models::{HourRecord, RawSeries, SiteKind, ThermalSite};

/// Altitude of the temperature band the lapse rate is taken against
pub const REFERENCE_ALTITUDE_M: f64 = 800.0;
/// °C/km
pub const MIN_LAPSE_RATE: f64 = 7.0;
/// W/m²
pub const MIN_IRRADIATION: f64 = 200.0;
pub const MAX_PRECIPITATION: f64 = 0.01;
pub const MIN_VISIBILITY: f64 = 0.5;

/// Thermal result for one (site, date)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThermalDay {
    pub date: NaiveDate,
    pub flyable_hours: u32,
    /// Subset of the flyable hours
    pub thermal_hours: u32,
}

impl ClassifiedDay for ThermalDay {
    fn good_hours(&self) -> u32 {
        self.thermal_hours
    }

    fn marginal_hours(&self) -> u32 {
        self.flyable_hours.saturating_sub(self.thermal_hours)
    }

    fn gantt(&self) -> &[GanttInterval] {
        &[]
    }

    fn marker(&self) -> MarkerColor {
        MarkerColor::for_thermal(self.flyable_hours, self.thermal_hours)
    }
}

/// Temperature drop per kilometre between the surface and `altitude_m`
#[must_use]
pub fn lapse_rate(surface: f64, aloft: f64, altitude_m: f64) -> f64 {
    (surface - aloft) / (altitude_m / 1000.0)
}

/// Dry, clear, light wind from inside `heading_range`
#[must_use]
pub fn is_flyable(site: &ThermalSite, heading_range: &HeadingRange, hour: &HourRecord) -> bool {
    hour.precipitation < MAX_PRECIPITATION
        && hour.visibility > MIN_VISIBILITY
        && hour.wind_speed < site.max_wind_speed
        && heading_range.contains(hour.wind_direction)
}

/// Whether the atmosphere above a flyable hour supports thermals
#[must_use]
pub fn is_thermal(surface: f64, aloft: f64, irradiation: f64) -> bool {
    lapse_rate(surface, aloft, REFERENCE_ALTITUDE_M) >= MIN_LAPSE_RATE
        && irradiation >= MIN_IRRADIATION
}

/// Classify one thermal day.
///
/// Requires the reference temperature band and solar irradiation; a series
/// without them is malformed for thermal use.
pub fn classify(site: &ThermalSite, series: &RawSeries, date: NaiveDate) -> crate::Result<ThermalDay> {
    series.validate()?;
    let aloft = series.aloft_band(REFERENCE_ALTITUDE_M).ok_or_else(|| {
        ForecastError::malformed(format!(
            "no temperature band at {REFERENCE_ALTITUDE_M} m for thermal site '{}'",
            site.name
        ))
    })?;
    let irradiation = series.hourly.solar_irradiation.as_deref().ok_or_else(|| {
        ForecastError::malformed(format!(
            "no solar irradiation for thermal site '{}'",
            site.name
        ))
    })?;

    let day_window = window(SiteKind::Thermal, series, date)?;
    let heading_range = site.heading_range();

    let (flyable_hours, thermal_hours) = day_window
        .hours(series, date)
        .filter(|hour| is_flyable(site, &heading_range, hour))
        .fold((0, 0), |(flyable, thermal), hour| {
            let lifting = is_thermal(
                hour.temperature,
                aloft.temperature[hour.index],
                irradiation[hour.index],
            );
            (flyable + 1, thermal + u32::from(lifting))
        });

    Ok(ThermalDay {
        date,
        flyable_hours,
        thermal_hours,
    })
}
