//! Day windowing
//!
//! Each calendar day is cut down to the hours worth looking at: for slope
//! soaring that is an hour before sunrise until two hours after sunset, for
//! thermals plain daylight. A user preference window can narrow soaring hours
//! further by wall-clock time.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::models::{DailyEntry, HourRecord, RawSeries, SiteKind};

/// Hours before sunrise considered for soaring sites
pub const SOAR_LEAD_HOURS: i64 = 1;
/// Hours after sunset considered for soaring sites
pub const SOAR_TRAIL_HOURS: i64 = 2;

/// Analysis bounds for one (site, date); inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// Sunrise − 1h to sunset + 2h
    #[must_use]
    pub fn soar(entry: &DailyEntry) -> Self {
        Self {
            start: entry.sunrise - Duration::hours(SOAR_LEAD_HOURS),
            end: entry.sunset + Duration::hours(SOAR_TRAIL_HOURS),
        }
    }

    /// Sunrise to sunset
    #[must_use]
    pub fn daylight(entry: &DailyEntry) -> Self {
        Self {
            start: entry.sunrise,
            end: entry.sunset,
        }
    }

    /// Hours of `series` on local `date` that fall inside this window
    pub fn hours<'a>(
        &self,
        series: &'a RawSeries,
        date: NaiveDate,
    ) -> impl Iterator<Item = HourRecord> + 'a {
        series.hours_within(date, self.start, self.end)
    }
}

/// Window for `date` according to the site type.
///
/// Fails with `MissingDayData` when the series has no entry for exactly that date.
pub fn window(kind: SiteKind, series: &RawSeries, date: NaiveDate) -> crate::Result<DayWindow> {
    let entry = series.daily_entry(date)?;
    Ok(match kind {
        SiteKind::Soar => DayWindow::soar(entry),
        SiteKind::Thermal => DayWindow::daylight(entry),
    })
}

/// User-preferred wall-clock band, same-day comparison only.
///
/// A band whose start lies after its end (crossing midnight) admits nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Default for PreferenceWindow {
    fn default() -> Self {
        Self {
            start: NaiveTime::default(),
            end: NaiveTime::from_hms_opt(23, 59, 0).unwrap_or_default(),
        }
    }
}

impl PreferenceWindow {
    #[must_use]
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Parse a pair of `HH:MM` strings
    pub fn parse(start: &str, end: &str) -> crate::Result<Self> {
        Ok(Self::new(parse_time_of_day(start)?, parse_time_of_day(end)?))
    }

    #[must_use]
    pub fn crosses_midnight(&self) -> bool {
        self.start > self.end
    }

    /// Whether `time` falls inside the band in local wall-clock time
    #[must_use]
    pub fn admits(&self, time: DateTime<Utc>, timezone: Tz) -> bool {
        let wall_clock = time.with_timezone(&timezone).time();
        self.start <= wall_clock && wall_clock <= self.end
    }
}

/// `HH:MM` or `HH:MM:SS`
pub fn parse_time_of_day(value: &str) -> crate::Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| {
            crate::ForecastError::validation(format!("Invalid time of day '{value}', expected HH:MM"))
        })
}

/// Shift `time` back by `day_index` calendar days so that intervals from
/// different dates overlay on the first day's 24 hour axis.
///
/// The shift is done on the local wall clock, so 05:00 stays 05:00 across a
/// daylight saving change.
#[must_use]
pub fn nominal_timestamp(time: DateTime<Utc>, day_index: i64, timezone: Tz) -> DateTime<Utc> {
    shift_wall_clock(time, -day_index, timezone)
}

/// Inverse of [`nominal_timestamp`]
#[must_use]
pub fn calendar_timestamp(nominal: DateTime<Utc>, day_index: i64, timezone: Tz) -> DateTime<Utc> {
    shift_wall_clock(nominal, day_index, timezone)
}

fn shift_wall_clock(time: DateTime<Utc>, days: i64, timezone: Tz) -> DateTime<Utc> {
    let wall_clock = time.with_timezone(&timezone).naive_local() + Duration::days(days);
    // Wall-clock times skipped by a spring-forward fall back to a fixed 24h shift
    timezone
        .from_local_datetime(&wall_clock)
        .earliest()
        .map_or_else(|| time + Duration::days(days), |local| local.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::series::fixtures::{calm_series, local};
    use crate::ForecastError;

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    #[test]
    fn test_soar_window_margins() {
        let series = calm_series(june(1), 2);
        let w = window(SiteKind::Soar, &series, june(2)).unwrap();
        assert_eq!(w.start, local(series.timezone, june(2), 5));
        assert_eq!(w.end, local(series.timezone, june(2), 22));
    }

    #[test]
    fn test_thermal_window_is_daylight() {
        let series = calm_series(june(1), 1);
        let w = window(SiteKind::Thermal, &series, june(1)).unwrap();
        assert_eq!(w.start, local(series.timezone, june(1), 6));
        assert_eq!(w.end, local(series.timezone, june(1), 20));
    }

    #[test]
    fn test_missing_date_fails() {
        let series = calm_series(june(1), 1);
        let err = window(SiteKind::Soar, &series, june(2)).unwrap_err();
        assert!(matches!(err, ForecastError::MissingDayData { .. }));
    }

    #[test]
    fn test_window_hours_are_inclusive() {
        let series = calm_series(june(1), 2);
        let w = window(SiteKind::Soar, &series, june(1)).unwrap();
        // 05:00 through 22:00 inclusive
        assert_eq!(w.hours(&series, june(1)).count(), 18);
    }

    #[test]
    fn test_window_stays_on_its_own_date() {
        let mut series = calm_series(june(1), 2);
        // Late sunset pushes the soar window past local midnight
        series.daily[0].sunset = local(series.timezone, june(1), 23);
        let w = window(SiteKind::Soar, &series, june(1)).unwrap();
        assert!(w.end > local(series.timezone, june(2), 0));
        let last = w.hours(&series, june(1)).last().unwrap();
        assert_eq!(last.time, local(series.timezone, june(1), 23));
    }

    #[test]
    fn test_default_preference_admits_whole_day() {
        let pref = PreferenceWindow::default();
        let tz = chrono_tz::Europe::Amsterdam;
        assert!(pref.admits(local(tz, june(1), 0), tz));
        assert!(pref.admits(local(tz, june(1), 23), tz));
    }

    #[test]
    fn test_preference_uses_local_wall_clock() {
        let pref = PreferenceWindow::parse("10:00", "18:00").unwrap();
        let tz = chrono_tz::Europe::Amsterdam;
        assert!(!pref.admits(local(tz, june(1), 9), tz));
        assert!(pref.admits(local(tz, june(1), 10), tz));
        assert!(pref.admits(local(tz, june(1), 18), tz));
        assert!(!pref.admits(local(tz, june(1), 19), tz));
    }

    #[test]
    fn test_midnight_crossing_preference_admits_nothing() {
        let pref = PreferenceWindow::parse("22:00", "04:00").unwrap();
        let tz = chrono_tz::Europe::Amsterdam;
        assert!(pref.crosses_midnight());
        for hour in [0, 3, 12, 22, 23] {
            assert!(!pref.admits(local(tz, june(1), hour), tz));
        }
    }

    #[test]
    fn test_parse_time_of_day_rejects_garbage() {
        assert!(parse_time_of_day("25:00").is_err());
        assert!(parse_time_of_day("noon").is_err());
        assert_eq!(
            parse_time_of_day("07:30:00").unwrap(),
            NaiveTime::from_hms_opt(7, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_nominal_timestamp_round_trip() {
        let tz = chrono_tz::Europe::Amsterdam;
        let t = local(tz, june(4), 14);
        let nominal = nominal_timestamp(t, 3, tz);
        assert_eq!(nominal, local(tz, june(1), 14));
        assert_eq!(calendar_timestamp(nominal, 3, tz), t);
        assert_eq!(nominal_timestamp(t, 0, tz), t);
    }

    #[test]
    fn test_nominal_timestamp_keeps_wall_clock_across_dst_end() {
        let tz = chrono_tz::Europe::Amsterdam;
        let october = |day| NaiveDate::from_ymd_opt(2025, 10, day).unwrap();
        // Clocks go back on the 26th, so two calendar days span 49 hours
        let t = local(tz, october(27), 5);
        let nominal = nominal_timestamp(t, 2, tz);
        assert_eq!(nominal, local(tz, october(25), 5));
        assert_eq!(t - nominal, Duration::hours(49));
        assert_eq!(calendar_timestamp(nominal, 2, tz), t);
    }

    #[test]
    fn test_nominal_timestamp_across_dst_start() {
        let tz = chrono_tz::Europe::Amsterdam;
        let march = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        let t = local(tz, march(31), 14);
        assert_eq!(nominal_timestamp(t, 2, tz), local(tz, march(29), 14));
    }
}
