//! Day aggregation across sites
//!
//! For each date the site with the most good hours wins. When nobody has a
//! good hour the site with the most flyable hours wins, and an all-zero day
//! falls back to the first site that has data at all.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::soar::GanttInterval;

/// What the aggregator needs from a classified day
pub trait ClassifiedDay {
    fn good_hours(&self) -> u32;
    fn marginal_hours(&self) -> u32;
    /// Timeline for display; empty for site types without one
    fn gantt(&self) -> &[GanttInterval];
    /// Map overlay colour
    fn marker(&self) -> MarkerColor;

    fn total_hours(&self) -> u32 {
        self.good_hours() + self.marginal_hours()
    }
}

/// Best site of one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// Position of the winner in its catalog type-list
    pub best_site_index: usize,
    pub good_hours: u32,
    pub marginal_hours: u32,
    pub gantt: Vec<GanttInterval>,
}

impl DaySummary {
    #[must_use]
    pub fn total_hours(&self) -> u32 {
        self.good_hours + self.marginal_hours
    }
}

/// Pick the best site for `date` from per-site results in catalog order.
///
/// `None` entries are sites without data for the date; they never win.
/// Returns `None` only when no site has data.
pub fn summarize<T: ClassifiedDay>(date: NaiveDate, days: &[Option<T>]) -> Option<DaySummary> {
    let mut best_by_good: Option<(usize, u32)> = None;
    let mut best_by_total: Option<(usize, u32)> = None;
    let mut first_with_data = None;

    for (index, day) in days.iter().enumerate() {
        let Some(day) = day else { continue };
        first_with_data.get_or_insert(index);

        let good = day.good_hours();
        if good > best_by_good.map_or(0, |(_, max)| max) {
            best_by_good = Some((index, good));
        }
        let total = day.total_hours();
        if total > best_by_total.map_or(0, |(_, max)| max) {
            best_by_total = Some((index, total));
        }
    }

    let winner = best_by_good
        .or(best_by_total)
        .map(|(index, _)| index)
        .or(first_with_data)?;
    let day = days.get(winner)?.as_ref()?;

    Some(DaySummary {
        date,
        best_site_index: winner,
        good_hours: day.good_hours(),
        marginal_hours: day.marginal_hours(),
        gantt: day.gantt().to_vec(),
    })
}

/// Map marker colour for one site and date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Green,
    Yellow,
    Orange,
    Red,
}

impl MarkerColor {
    /// Three good hours make a green day; a little good plus enough cross
    /// wind makes it yellow
    #[must_use]
    pub fn for_soar(good_hours: u32, cross_hours: u32) -> Self {
        let total = good_hours + cross_hours;
        if good_hours >= 3 {
            MarkerColor::Green
        } else if good_hours > 0 && total >= 3 {
            MarkerColor::Yellow
        } else if total > 0 {
            MarkerColor::Orange
        } else {
            MarkerColor::Red
        }
    }

    #[must_use]
    pub fn for_thermal(flyable_hours: u32, thermal_hours: u32) -> Self {
        if thermal_hours > 2 {
            MarkerColor::Green
        } else if flyable_hours > 2 {
            MarkerColor::Orange
        } else {
            MarkerColor::Red
        }
    }
}

impl fmt::Display for MarkerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerColor::Green => write!(f, "green"),
            MarkerColor::Yellow => write!(f, "yellow"),
            MarkerColor::Orange => write!(f, "orange"),
            MarkerColor::Red => write!(f, "red"),
        }
    }
}

/// Day name relative to `today` (Yesterday, Today, Tomorrow, weekday)
#[must_use]
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        -1 => "Yesterday".to_string(),
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%A").to_string(),
    }
}
