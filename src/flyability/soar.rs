//! Slope-soaring classification
//!
//! Every hour inside the soar window gets one of three states. Admissible
//! hours are sorted into a sector of the "wind pizza" by how far the wind
//! direction is off the site heading, and the hourly states are run-length
//! encoded into a gantt timeline.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::angle::HeadingRange;
use super::summary::{ClassifiedDay, MarkerColor};
use super::window::{PreferenceWindow, nominal_timestamp, window};
use crate::models::{HourRecord, RawSeries, SiteKind, SoarSite};

/// Half width of the head-on sector in degrees
pub const GOOD_HALF_WIDTH: f64 = 22.5;
/// Precipitation at or above this (mm) grounds the hour
pub const MAX_PRECIPITATION: f64 = 0.01;
/// Visibility must exceed this
pub const MIN_VISIBILITY: f64 = 99.0;

/// Flight condition for one hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoarState {
    Good,
    Cross,
    No,
}

/// Relative-heading sector of an admissible hour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sector {
    CrossLow,
    Good,
    CrossHigh,
}

impl Sector {
    #[must_use]
    pub fn state(self) -> SoarState {
        match self {
            Sector::Good => SoarState::Good,
            Sector::CrossLow | Sector::CrossHigh => SoarState::Cross,
        }
    }

    fn bucket(self) -> usize {
        match self {
            Sector::CrossLow => 0,
            Sector::Good => 1,
            Sector::CrossHigh => 2,
        }
    }
}

/// Hour counts per sector: `[cross_low, good, cross_high]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindPizza(pub [u32; 3]);

impl WindPizza {
    pub fn record(&mut self, sector: Sector) {
        self.0[sector.bucket()] += 1;
    }

    #[must_use]
    pub fn cross_low(&self) -> u32 {
        self.0[0]
    }

    #[must_use]
    pub fn good(&self) -> u32 {
        self.0[1]
    }

    #[must_use]
    pub fn cross_high(&self) -> u32 {
        self.0[2]
    }

    #[must_use]
    pub fn cross(&self) -> u32 {
        self.cross_low() + self.cross_high()
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }
}

/// Contiguous run of one state, timestamps on the nominal day axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GanttInterval {
    pub state: SoarState,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Soaring result for one (site, date)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoarDay {
    pub date: NaiveDate,
    pub gantt: Vec<GanttInterval>,
    pub wind_pizza: WindPizza,
    pub good_hours: u32,
    pub cross_hours: u32,
    /// Hours in the window that are neither good nor cross
    pub no_hours: u32,
}

impl SoarDay {
    /// A day without any hour inside its window
    #[must_use]
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            gantt: Vec::new(),
            wind_pizza: WindPizza::default(),
            good_hours: 0,
            cross_hours: 0,
            no_hours: 0,
        }
    }
}

impl ClassifiedDay for SoarDay {
    fn good_hours(&self) -> u32 {
        self.good_hours
    }

    fn marginal_hours(&self) -> u32 {
        self.cross_hours
    }

    fn gantt(&self) -> &[GanttInterval] {
        &self.gantt
    }

    fn marker(&self) -> MarkerColor {
        MarkerColor::for_soar(self.good_hours, self.cross_hours)
    }
}

/// Heading bands of one site, built once per classification
#[derive(Debug, Clone, Copy)]
pub struct Sectors {
    cross_low: HeadingRange,
    good: HeadingRange,
    cross_high: HeadingRange,
}

impl Sectors {
    #[must_use]
    pub fn for_site(site: &SoarSite) -> Self {
        let (min_offset, max_offset) = site.head_range;
        Self {
            cross_low: HeadingRange::around(site.heading, min_offset, -GOOD_HALF_WIDTH),
            good: HeadingRange::around(site.heading, -GOOD_HALF_WIDTH, GOOD_HALF_WIDTH),
            cross_high: HeadingRange::around(site.heading, GOOD_HALF_WIDTH, max_offset),
        }
    }

    /// Sector containing `direction`; band edges belong to no sector
    #[must_use]
    pub fn sector(&self, direction: f64) -> Option<Sector> {
        if self.cross_low.contains_strictly(direction) {
            Some(Sector::CrossLow)
        } else if self.good.contains_strictly(direction) {
            Some(Sector::Good)
        } else if self.cross_high.contains_strictly(direction) {
            Some(Sector::CrossHigh)
        } else {
            None
        }
    }
}

/// Dry, clear and inside the site's wind band and the preference window
#[must_use]
pub fn is_admissible(
    site: &SoarSite,
    hour: &HourRecord,
    series: &RawSeries,
    preference: &PreferenceWindow,
) -> bool {
    let (min_speed, max_gust) = site.wind_range;
    preference.admits(hour.time, series.timezone)
        && hour.precipitation < MAX_PRECIPITATION
        && hour.visibility > MIN_VISIBILITY
        && hour.wind_speed > min_speed
        && hour.wind_gusts < max_gust
}

/// Classify one soaring day, with the gantt on the axis of the series'
/// first date.
///
/// Fails with `MissingDayData` when `date` has no daylight entry and with
/// `MalformedSeries` when the series breaks its shape invariants. A window
/// without samples yields [`SoarDay::empty`].
pub fn classify(
    site: &SoarSite,
    series: &RawSeries,
    date: NaiveDate,
    preference: &PreferenceWindow,
) -> crate::Result<SoarDay> {
    let origin = series.daily.first().map_or(date, |entry| entry.date);
    classify_on_axis(site, series, date, origin, preference)
}

/// Like [`classify`], with gantt timestamps moved onto the wall-clock axis of
/// `origin`. Runs over several sites pass their common first date here.
pub fn classify_on_axis(
    site: &SoarSite,
    series: &RawSeries,
    date: NaiveDate,
    origin: NaiveDate,
    preference: &PreferenceWindow,
) -> crate::Result<SoarDay> {
    series.validate()?;
    let day_window = window(SiteKind::Soar, series, date)?;
    let day_index = (date - origin).num_days();
    let sectors = Sectors::for_site(site);

    let mut pizza = WindPizza::default();
    let mut no_hours = 0;
    let states: Vec<(DateTime<Utc>, SoarState)> = day_window
        .hours(series, date)
        .map(|hour| {
            let sector = is_admissible(site, &hour, series, preference)
                .then(|| sectors.sector(hour.wind_direction))
                .flatten();
            let state = match sector {
                Some(sector) => {
                    pizza.record(sector);
                    sector.state()
                }
                None => {
                    no_hours += 1;
                    SoarState::No
                }
            };
            (nominal_timestamp(hour.time, day_index, series.timezone), state)
        })
        .collect();

    if states.is_empty() {
        trace!("{}: no hours inside the soar window on {date}", site.name);
        return Ok(SoarDay::empty(date));
    }

    Ok(SoarDay {
        date,
        gantt: run_length(&states),
        wind_pizza: pizza,
        good_hours: pizza.good(),
        cross_hours: pizza.cross(),
        no_hours,
    })
}

/// Collapse hourly states into intervals. A new interval opens at every
/// state change; the open one is closed at the final timestamp.
#[must_use]
pub fn run_length(states: &[(DateTime<Utc>, SoarState)]) -> Vec<GanttInterval> {
    let Some((&(first_time, first_state), rest)) = states.split_first() else {
        return Vec::new();
    };

    let (mut gantt, (open_state, open_start, last_time)) = rest.iter().fold(
        (Vec::new(), (first_state, first_time, first_time)),
        |(mut gantt, (state, start, _)), &(time, next)| {
            if next == state {
                (gantt, (state, start, time))
            } else {
                gantt.push(GanttInterval {
                    state,
                    start,
                    end: time,
                });
                (gantt, (next, time, time))
            }
        },
    );

    gantt.push(GanttInterval {
        state: open_state,
        start: open_start,
        end: last_time,
    });
    gantt
}
