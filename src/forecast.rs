//! Forecast runs
//!
//! A [`ForecastBatch`] holds the raw series of one weather model keyed by
//! site name. Indexing it against the catalog resolves every name once; the
//! run then classifies each (site, date) pair in parallel and assembles a
//! [`ForecastReport`] in catalog order.
//!
//! A site whose series breaks the input contract is left out of the run and
//! listed in [`ForecastReport::failures`]; the other sites still classify.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::daylight::fill_missing_daily;
use crate::error::ForecastError;
use crate::flyability::summary::{ClassifiedDay, DaySummary, MarkerColor, day_label, summarize};
use crate::flyability::{PreferenceWindow, SoarDay, ThermalDay, soar, thermal};
use crate::models::{RawSeries, SiteCatalog, SiteKind};

/// Default model label
pub const DEFAULT_MODEL: &str = "knmi_seamless";

/// One site's series as it appears in a batch file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedSeries {
    pub site: String,
    #[serde(flatten)]
    pub series: RawSeries,
}

/// Raw series of one weather model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastBatch {
    #[serde(default = "default_model")]
    pub model: String,
    pub sites: Vec<NamedSeries>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// A batch file holds one batch or a list of them
#[derive(Deserialize)]
#[serde(untagged)]
enum BatchFile {
    Many(Vec<ForecastBatch>),
    One(ForecastBatch),
}

/// A site whose series was unusable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteFailure {
    pub site: String,
    pub message: String,
}

impl fmt::Display for SiteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "site '{}': {}", self.site, self.message)
    }
}

/// A batch resolved against one catalog type-list
#[derive(Debug, Clone)]
pub struct IndexedBatch {
    pub model: String,
    pub kind: SiteKind,
    /// One slot per catalog site, in catalog order
    slots: Vec<Option<RawSeries>>,
    failures: Vec<SiteFailure>,
}

impl ForecastBatch {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read every batch in a JSON file
    pub fn load(path: &Path) -> crate::Result<Vec<Self>> {
        let json = std::fs::read_to_string(path)?;
        let batches = match serde_json::from_str(&json)? {
            BatchFile::Many(batches) => batches,
            BatchFile::One(batch) => vec![batch],
        };
        debug!("Loaded {} forecast batches from {}", batches.len(), path.display());
        Ok(batches)
    }

    /// Resolve site names to catalog positions.
    ///
    /// Unknown names and repeated sites are logged and dropped. Series without
    /// daylight entries get them computed from the site position. A series
    /// that breaks the input contract is recorded as a [`SiteFailure`] and its
    /// site left without data.
    pub fn index(self, catalog: &SiteCatalog, kind: SiteKind) -> crate::Result<IndexedBatch> {
        let mut slots: Vec<Option<RawSeries>> = vec![None; catalog.len(kind)];
        let mut seen = vec![false; slots.len()];
        let mut failures = Vec::new();

        for NamedSeries { site, mut series } in self.sites {
            let Some(index) = catalog.index_of(kind, &site) else {
                warn!("Skipping series for unknown {kind} site '{site}'");
                continue;
            };
            if seen[index] {
                warn!(
                    "Duplicate series for {kind} site '{site}' in model {}, keeping the first",
                    self.model
                );
                continue;
            }
            seen[index] = true;

            let position = match kind {
                SiteKind::Soar => catalog.soar_sites()[index].position(),
                SiteKind::Thermal => catalog.thermal_sites()[index].position(),
            };
            fill_missing_daily(&mut series, position)?;
            match series.validate() {
                Ok(()) => slots[index] = Some(series),
                Err(ForecastError::MalformedSeries { message }) => {
                    warn!("Leaving out {kind} site '{site}': {message}");
                    failures.push(SiteFailure { site, message });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(IndexedBatch {
            model: self.model,
            kind,
            slots,
            failures,
        })
    }
}

impl IndexedBatch {
    #[must_use]
    pub fn series(&self, site_index: usize) -> Option<&RawSeries> {
        self.slots.get(site_index)?.as_ref()
    }

    /// Sites that have a series
    #[must_use]
    pub fn covered(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Sites whose series were rejected while indexing
    #[must_use]
    pub fn failures(&self) -> &[SiteFailure] {
        &self.failures
    }

    /// Earliest date of any series; the shared gantt axis of a run
    #[must_use]
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.slots
            .iter()
            .flatten()
            .flat_map(|series| series.daily.iter().map(|entry| entry.date))
            .min()
    }

    /// Every date any series has a daylight entry for, ascending
    #[must_use]
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.slots
            .iter()
            .flatten()
            .flat_map(|series| series.daily.iter().map(|entry| entry.date))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Results of one date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateReport<T> {
    pub date: NaiveDate,
    pub label: String,
    /// Catalog order; `None` means no data
    pub sites: Vec<Option<T>>,
    pub markers: Vec<Option<MarkerColor>>,
    pub summary: Option<DaySummary>,
}

/// Results of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastReport<T> {
    pub model: String,
    pub kind: SiteKind,
    /// Catalog site names, indexed like every per-site list in the report
    pub site_names: Vec<String>,
    pub dates: Vec<DateReport<T>>,
    /// Sites left out because their series was malformed
    #[serde(default)]
    pub failures: Vec<SiteFailure>,
}

impl<T: ClassifiedDay> ForecastReport<T> {
    /// Report for `date`, if it is part of the run
    #[must_use]
    pub fn date(&self, date: NaiveDate) -> Option<&DateReport<T>> {
        self.dates.iter().find(|report| report.date == date)
    }

    /// Name of the best site for `date`
    #[must_use]
    pub fn best_site(&self, date: NaiveDate) -> Option<&str> {
        let summary = self.date(date)?.summary.as_ref()?;
        self.site_names
            .get(summary.best_site_index)
            .map(String::as_str)
    }

    /// Every site failure of the run folded into one `MalformedSeries` error
    #[must_use]
    pub fn malformed_input(&self) -> Option<ForecastError> {
        if self.failures.is_empty() {
            return None;
        }
        let message = self
            .failures
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Some(ForecastError::malformed(message))
    }
}

/// Classify every soaring site of the batch on every date
#[instrument(skip_all, fields(model = %batch.model))]
pub fn soar_forecast(
    catalog: &SiteCatalog,
    batch: &IndexedBatch,
    preference: &PreferenceWindow,
    today: NaiveDate,
) -> crate::Result<ForecastReport<SoarDay>> {
    ensure_kind(batch, SiteKind::Soar)?;
    let sites = catalog.soar_sites();
    let site_names = sites.iter().map(|site| site.name.clone()).collect();
    let origin = batch.first_date();

    run(batch, site_names, today, |index, series, date| {
        let origin = origin.unwrap_or(date);
        soar::classify_on_axis(&sites[index], series, date, origin, preference)
    })
}

/// Classify every thermal site of the batch on every date
#[instrument(skip_all, fields(model = %batch.model))]
pub fn thermal_forecast(
    catalog: &SiteCatalog,
    batch: &IndexedBatch,
    today: NaiveDate,
) -> crate::Result<ForecastReport<ThermalDay>> {
    ensure_kind(batch, SiteKind::Thermal)?;
    let sites = catalog.thermal_sites();
    let site_names = sites.iter().map(|site| site.name.clone()).collect();

    run(batch, site_names, today, |index, series, date| {
        thermal::classify(&sites[index], series, date)
    })
}

/// Merge every batch of `model` into one.
///
/// When no batch carries `model` the first batch's model is used instead.
#[must_use]
pub fn select_model(batches: Vec<ForecastBatch>, model: &str) -> Option<ForecastBatch> {
    let wanted = if batches.iter().any(|batch| batch.model == model) {
        model.to_string()
    } else {
        let first = batches.first()?.model.clone();
        warn!("No batch for model {model}, using {first}");
        first
    };

    let sites = batches
        .into_iter()
        .filter(|batch| batch.model == wanted)
        .flat_map(|batch| batch.sites)
        .collect();
    Some(ForecastBatch {
        model: wanted,
        sites,
    })
}

fn ensure_kind(batch: &IndexedBatch, kind: SiteKind) -> crate::Result<()> {
    if batch.kind == kind {
        Ok(())
    } else {
        Err(ForecastError::validation(format!(
            "Batch was indexed for {} sites, not {kind}",
            batch.kind
        )))
    }
}

fn run<T, F>(
    batch: &IndexedBatch,
    site_names: Vec<String>,
    today: NaiveDate,
    classify: F,
) -> crate::Result<ForecastReport<T>>
where
    T: ClassifiedDay + Send,
    F: Fn(usize, &RawSeries, NaiveDate) -> crate::Result<T> + Sync,
{
    let dates = batch.dates();
    debug!(
        "Classifying {} of {} {} sites over {} dates",
        batch.covered(),
        site_names.len(),
        batch.kind,
        dates.len()
    );

    let per_site: Vec<SiteOutcome<T>> = (0..site_names.len())
        .into_par_iter()
        .map(|index| match batch.series(index) {
            Some(series) => classify_dates(&site_names[index], series, &dates, |s, d| {
                classify(index, s, d)
            }),
            None => Ok(SiteOutcome::no_data(&dates)),
        })
        .collect::<crate::Result<_>>()?;

    let mut failures = batch.failures().to_vec();
    let mut columns = Vec::with_capacity(per_site.len());
    for outcome in per_site {
        failures.extend(outcome.failure);
        columns.push(outcome.days.into_iter());
    }

    let reports: Vec<DateReport<T>> = dates
        .iter()
        .map(|&date| {
            let sites: Vec<Option<T>> = columns.iter_mut().map(|c| c.next().flatten()).collect();
            let markers = sites
                .iter()
                .map(|day| day.as_ref().map(ClassifiedDay::marker))
                .collect();
            let summary = summarize(date, &sites);
            DateReport {
                date,
                label: day_label(date, today),
                sites,
                markers,
                summary,
            }
        })
        .collect();

    info!(
        "Forecast {} for {} {} sites ready: {} dates, {} sites left out",
        batch.model,
        site_names.len(),
        batch.kind,
        reports.len(),
        failures.len()
    );

    Ok(ForecastReport {
        model: batch.model.clone(),
        kind: batch.kind,
        site_names,
        dates: reports,
        failures,
    })
}

/// Per-date results of one site
struct SiteOutcome<T> {
    days: Vec<Option<T>>,
    failure: Option<SiteFailure>,
}

impl<T> SiteOutcome<T> {
    fn no_data(dates: &[NaiveDate]) -> Self {
        Self {
            days: dates.iter().map(|_| None).collect(),
            failure: None,
        }
    }
}

/// One site across all dates. Day-scoped failures become `None`; a malformed
/// series empties the whole site and is reported back.
fn classify_dates<T>(
    site: &str,
    series: &RawSeries,
    dates: &[NaiveDate],
    classify: impl Fn(&RawSeries, NaiveDate) -> crate::Result<T>,
) -> crate::Result<SiteOutcome<T>> {
    let mut days = Vec::with_capacity(dates.len());
    for &date in dates {
        match classify(series, date) {
            Ok(day) => days.push(Some(day)),
            Err(e) if e.is_scoped_to_day() => {
                debug!("{site} on {date}: {e}, skipping");
                days.push(None);
            }
            Err(ForecastError::MalformedSeries { message }) => {
                warn!("Leaving out {site}: {message}");
                return Ok(SiteOutcome {
                    failure: Some(SiteFailure {
                        site: site.to_string(),
                        message,
                    }),
                    ..SiteOutcome::no_data(dates)
                });
            }
            Err(e) => return Err(e),
        }
    }
    Ok(SiteOutcome {
        days,
        failure: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::series::fixtures::{calm_series, local, set_wind, with_thermal_levels};
    use crate::models::{SoarSite, ThermalSite};

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn catalog() -> SiteCatalog {
        SiteCatalog::new(
            vec![
                SoarSite::new("West", 52.5, 4.59, 270.0),
                SoarSite::new("North", 52.56, 4.6, 0.0),
                SoarSite::new("South", 51.86, 4.05, 180.0),
            ],
            vec![
                ThermalSite::new("Hill", 50.4, 5.89),
                ThermalSite::new("Ridge", 50.3, 5.8),
            ],
        )
        .unwrap()
    }

    fn named(site: &str, series: RawSeries) -> NamedSeries {
        NamedSeries {
            site: site.to_string(),
            series,
        }
    }

    fn westerly(days: u32) -> RawSeries {
        let mut series = calm_series(june(1), days);
        for day in 0..days {
            for hour in 10..16 {
                set_wind(&mut series, june(1 + day), hour, 25.0, 30.0, 270.0);
            }
        }
        series
    }

    #[test]
    fn test_index_resolves_names_once() {
        let batch = ForecastBatch {
            model: "ecmwf_ifs".to_string(),
            sites: vec![
                named("South", calm_series(june(1), 2)),
                named("Nowhere", calm_series(june(1), 2)),
                named("West", westerly(2)),
                named("West", calm_series(june(1), 2)),
            ],
        };
        let indexed = batch.index(&catalog(), SiteKind::Soar).unwrap();
        assert_eq!(indexed.covered(), 2);
        assert!(indexed.series(1).is_none());
        assert!(indexed.series(2).is_some());
        // First series for West is kept
        assert_eq!(indexed.series(0).unwrap().hourly.wind_speed[10 + 24], 25.0);
        assert_eq!(indexed.dates(), vec![june(1), june(2)]);
    }

    #[test]
    fn test_malformed_series_only_drops_its_site() {
        let mut broken = calm_series(june(1), 1);
        broken.hourly.visibility.pop();
        let batch = ForecastBatch {
            model: DEFAULT_MODEL.to_string(),
            sites: vec![named("West", westerly(1)), named("North", broken)],
        };
        let indexed = batch.index(&catalog(), SiteKind::Soar).unwrap();
        assert_eq!(indexed.covered(), 1);
        assert!(indexed.series(1).is_none());
        assert_eq!(indexed.failures().len(), 1);
        assert_eq!(indexed.failures()[0].site, "North");
        assert!(indexed.failures()[0].message.contains("visibility"));

        let report =
            soar_forecast(&catalog(), &indexed, &PreferenceWindow::default(), june(1)).unwrap();
        assert_eq!(report.dates[0].sites[0].as_ref().unwrap().good_hours, 6);
        assert!(report.dates[0].sites[1].is_none());
        assert_eq!(report.best_site(june(1)), Some("West"));
        assert_eq!(report.failures, indexed.failures());

        let err = report.malformed_input().unwrap();
        assert!(matches!(err, ForecastError::MalformedSeries { .. }));
        assert!(err.to_string().contains("site 'North'"));
    }

    #[test]
    fn test_malformed_first_series_still_blocks_duplicates() {
        let mut broken = calm_series(june(1), 1);
        broken.hourly.wind_gusts.pop();
        let batch = ForecastBatch {
            model: DEFAULT_MODEL.to_string(),
            sites: vec![named("West", broken), named("West", westerly(1))],
        };
        let indexed = batch.index(&catalog(), SiteKind::Soar).unwrap();
        assert!(indexed.series(0).is_none());
        assert_eq!(indexed.failures().len(), 1);
    }

    #[test]
    fn test_clean_run_has_no_failures() {
        let batch = ForecastBatch {
            model: DEFAULT_MODEL.to_string(),
            sites: vec![named("West", westerly(1))],
        };
        let indexed = batch.index(&catalog(), SiteKind::Soar).unwrap();
        let report =
            soar_forecast(&catalog(), &indexed, &PreferenceWindow::default(), june(1)).unwrap();
        assert!(report.failures.is_empty());
        assert!(report.malformed_input().is_none());
    }

    #[test]
    fn test_gantt_axis_is_shared_by_all_sites() {
        // South's series only starts on the second day
        let mut south = calm_series(june(2), 1);
        for hour in 10..16 {
            set_wind(&mut south, june(2), hour, 25.0, 30.0, 180.0);
        }
        let batch = ForecastBatch {
            model: DEFAULT_MODEL.to_string(),
            sites: vec![named("West", westerly(2)), named("South", south)],
        };
        let indexed = batch.index(&catalog(), SiteKind::Soar).unwrap();
        assert_eq!(indexed.first_date(), Some(june(1)));
        let report =
            soar_forecast(&catalog(), &indexed, &PreferenceWindow::default(), june(1)).unwrap();

        let tz = chrono_tz::Europe::Amsterdam;
        let second = report.date(june(2)).unwrap();
        let west = second.sites[0].as_ref().unwrap();
        let south = second.sites[2].as_ref().unwrap();
        assert_eq!(west.gantt[1].start, local(tz, june(1), 10));
        assert_eq!(south.gantt[1].start, local(tz, june(1), 10));
        assert_eq!(west.gantt, south.gantt);
    }

    #[test]
    fn test_missing_daily_is_computed() {
        let mut series = calm_series(june(1), 2);
        series.daily.clear();
        let batch = ForecastBatch {
            model: DEFAULT_MODEL.to_string(),
            sites: vec![named("West", series)],
        };
        let indexed = batch.index(&catalog(), SiteKind::Soar).unwrap();
        assert_eq!(indexed.series(0).unwrap().daily.len(), 2);
    }

    #[test]
    fn test_soar_report_picks_best_site_per_date() {
        let batch = ForecastBatch {
            model: DEFAULT_MODEL.to_string(),
            sites: vec![
                named("West", westerly(2)),
                named("North", calm_series(june(1), 2)),
            ],
        };
        let indexed = batch.index(&catalog(), SiteKind::Soar).unwrap();
        let report =
            soar_forecast(&catalog(), &indexed, &PreferenceWindow::default(), june(2)).unwrap();

        assert_eq!(report.site_names, vec!["West", "North", "South"]);
        assert_eq!(report.dates.len(), 2);

        let first = &report.dates[0];
        assert_eq!(first.label, "Yesterday");
        assert_eq!(first.sites.len(), 3);
        assert!(first.sites[2].is_none());
        assert_eq!(first.sites[0].as_ref().unwrap().good_hours, 6);
        assert_eq!(first.markers[0], Some(MarkerColor::Green));
        assert_eq!(first.markers[1], Some(MarkerColor::Red));
        assert_eq!(first.markers[2], None);
        assert_eq!(report.best_site(june(1)), Some("West"));
        assert_eq!(report.dates[1].label, "Today");
    }

    #[test]
    fn test_missing_day_only_drops_that_pair() {
        let mut short = westerly(2);
        // Second date loses its daylight entry
        short.daily.truncate(1);
        short.hourly.time.truncate(24);
        for column in [
            &mut short.hourly.temperature,
            &mut short.hourly.visibility,
            &mut short.hourly.wind_speed,
            &mut short.hourly.wind_direction,
            &mut short.hourly.wind_gusts,
            &mut short.hourly.precipitation,
        ] {
            column.truncate(24);
        }

        let batch = ForecastBatch {
            model: DEFAULT_MODEL.to_string(),
            sites: vec![
                named("West", short),
                named("North", calm_series(june(1), 2)),
            ],
        };
        let indexed = batch.index(&catalog(), SiteKind::Soar).unwrap();
        let report =
            soar_forecast(&catalog(), &indexed, &PreferenceWindow::default(), june(1)).unwrap();

        let second = report.date(june(2)).unwrap();
        assert!(second.sites[0].is_none());
        assert!(second.sites[1].is_some());
        assert_eq!(second.summary.as_ref().unwrap().best_site_index, 1);
        assert_eq!(report.best_site(june(1)), Some("West"));
    }

    #[test]
    fn test_empty_batch_has_no_dates() {
        let batch = ForecastBatch {
            model: DEFAULT_MODEL.to_string(),
            sites: Vec::new(),
        };
        let indexed = batch.index(&catalog(), SiteKind::Soar).unwrap();
        let report =
            soar_forecast(&catalog(), &indexed, &PreferenceWindow::default(), june(1)).unwrap();
        assert!(report.dates.is_empty());
    }

    #[test]
    fn test_thermal_report() {
        let batch = ForecastBatch {
            model: DEFAULT_MODEL.to_string(),
            sites: vec![named(
                "Hill",
                with_thermal_levels(calm_series(june(1), 1), 5.0, 400.0),
            )],
        };
        let indexed = batch.index(&catalog(), SiteKind::Thermal).unwrap();
        let report = thermal_forecast(&catalog(), &indexed, june(1)).unwrap();

        let day = report.dates[0].sites[0].unwrap();
        assert_eq!(day.flyable_hours, 15);
        assert_eq!(day.thermal_hours, 15);
        assert_eq!(report.dates[0].summary.as_ref().unwrap().good_hours, 15);
        assert_eq!(report.best_site(june(1)), Some("Hill"));
    }

    #[test]
    fn test_kind_mismatch_is_rejected() {
        let batch = ForecastBatch {
            model: DEFAULT_MODEL.to_string(),
            sites: Vec::new(),
        };
        let indexed = batch.index(&catalog(), SiteKind::Soar).unwrap();
        let err = thermal_forecast(&catalog(), &indexed, june(1)).unwrap_err();
        assert!(matches!(err, ForecastError::Validation { .. }));
    }

    #[test]
    fn test_thermal_series_without_aloft_data_drops_only_its_site() {
        let batch = ForecastBatch {
            model: DEFAULT_MODEL.to_string(),
            sites: vec![
                named("Hill", calm_series(june(1), 1)),
                named(
                    "Ridge",
                    with_thermal_levels(calm_series(june(1), 1), 5.0, 400.0),
                ),
            ],
        };
        let indexed = batch.index(&catalog(), SiteKind::Thermal).unwrap();
        let report = thermal_forecast(&catalog(), &indexed, june(1)).unwrap();

        assert!(report.dates[0].sites[0].is_none());
        assert_eq!(report.dates[0].markers[0], None);
        assert_eq!(report.dates[0].sites[1].unwrap().thermal_hours, 15);
        assert_eq!(report.best_site(june(1)), Some("Ridge"));

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].site, "Hill");
        assert!(report.failures[0].message.contains("800"));
        assert!(report.malformed_input().is_some());
    }

    #[test]
    fn test_reports_are_identical_across_runs() {
        let build = || {
            let batch = ForecastBatch {
                model: DEFAULT_MODEL.to_string(),
                sites: vec![
                    named("West", westerly(3)),
                    named("South", westerly(3)),
                    named("North", westerly(3)),
                ],
            };
            let indexed = batch.index(&catalog(), SiteKind::Soar).unwrap();
            let report =
                soar_forecast(&catalog(), &indexed, &PreferenceWindow::default(), june(1)).unwrap();
            serde_json::to_string(&report).unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_select_model() {
        let batch = |model: &str| ForecastBatch {
            model: model.to_string(),
            sites: Vec::new(),
        };
        let picked = select_model(vec![batch("knmi_seamless"), batch("ecmwf_ifs")], "ecmwf_ifs");
        assert_eq!(picked.unwrap().model, "ecmwf_ifs");

        let fallback = select_model(vec![batch("knmi_seamless")], "icon_d2");
        assert_eq!(fallback.unwrap().model, "knmi_seamless");

        assert!(select_model(Vec::new(), "knmi_seamless").is_none());
    }

    #[test]
    fn test_select_model_merges_split_batches() {
        let batch = |model: &str, site: &str| ForecastBatch {
            model: model.to_string(),
            sites: vec![named(site, calm_series(june(1), 1))],
        };
        let merged = select_model(
            vec![
                batch("knmi_seamless", "West"),
                batch("ecmwf_ifs", "West"),
                batch("knmi_seamless", "North"),
            ],
            "knmi_seamless",
        )
        .unwrap();
        let names: Vec<&str> = merged.sites.iter().map(|s| s.site.as_str()).collect();
        assert_eq!(names, vec!["West", "North"]);
    }

    #[test]
    fn test_batch_json_shape() {
        let json = r#"{
            "model": "ecmwf_ifs",
            "sites": [{
                "site": "West",
                "timezone": "Europe/Amsterdam",
                "daily": [{"date": "2025-06-01",
                           "sunrise": "2025-06-01T04:00:00Z",
                           "sunset": "2025-06-01T18:00:00Z"}],
                "hourly": {
                    "time": ["2025-06-01T10:00:00Z", "2025-06-01T11:00:00Z"],
                    "temperature": [15.0, 16.0],
                    "visibility": [24000.0, 24000.0],
                    "wind_speed": [22.0, 25.0],
                    "wind_direction": [270.0, 275.0],
                    "wind_gusts": [30.0, 32.0],
                    "precipitation": [0.0, 0.0]
                }
            }]
        }"#;
        let batch = ForecastBatch::from_json(json).unwrap();
        assert_eq!(batch.model, "ecmwf_ifs");
        assert_eq!(batch.sites[0].site, "West");
        assert_eq!(batch.sites[0].series.timezone, chrono_tz::Europe::Amsterdam);

        let indexed = batch.index(&catalog(), SiteKind::Soar).unwrap();
        let report =
            soar_forecast(&catalog(), &indexed, &PreferenceWindow::default(), june(1)).unwrap();
        let west = report.dates[0].sites[0].as_ref().unwrap();
        assert_eq!(west.good_hours, 2);
    }
}
