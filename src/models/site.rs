//! Flying site descriptors and the site catalog
//!
//! Sites come in two flavours: slope-soaring sites, which care about the wind
//! blowing onto a preferred heading, and thermal sites, which care about
//! convective lift. The catalog keeps one ordered list per flavour; the
//! position of a site in its list is the key every forecast refers to.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ForecastError;
use crate::flyability::HeadingRange;

/// Site flavour
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SiteKind {
    Soar,
    Thermal,
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteKind::Soar => write!(f, "soar"),
            SiteKind::Thermal => write!(f, "thermal"),
        }
    }
}

impl std::str::FromStr for SiteKind {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "soar" | "soaring" => Ok(SiteKind::Soar),
            "thermal" | "therm" => Ok(SiteKind::Thermal),
            other => Err(ForecastError::validation(format!(
                "Unknown site type '{other}'. Must be one of: soar, thermal"
            ))),
        }
    }
}

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

/// Slope-soaring site
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SoarSite {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Ideal wind direction in degrees
    pub heading: f64,
    /// Acceptable offsets around `heading`, e.g. `(-55, 45)`
    #[serde(default = "default_head_range")]
    pub head_range: (f64, f64),
    /// Minimum mean wind speed and maximum gust, km/h
    #[serde(default = "default_wind_range")]
    pub wind_range: (f64, f64),
}

/// Thermal site
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThermalSite {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Absolute start of the acceptable wind band, may wrap through north
    #[serde(default)]
    pub start_heading_range: f64,
    #[serde(default = "default_end_heading")]
    pub end_heading_range: f64,
    /// km/h
    #[serde(default = "default_max_wind_speed")]
    pub max_wind_speed: f64,
}

/// A catalog entry of either flavour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Site {
    Soar(SoarSite),
    Thermal(ThermalSite),
}

fn default_head_range() -> (f64, f64) {
    (-45.0, 45.0)
}

fn default_wind_range() -> (f64, f64) {
    (20.0, 50.0)
}

fn default_end_heading() -> f64 {
    360.0
}

fn default_max_wind_speed() -> f64 {
    30.0
}

impl SoarSite {
    #[must_use]
    pub fn new(name: &str, lat: f64, lon: f64, heading: f64) -> Self {
        Self {
            name: name.to_string(),
            lat,
            lon,
            heading,
            head_range: default_head_range(),
            wind_range: default_wind_range(),
        }
    }

    #[must_use]
    pub fn with_head_range(mut self, min_offset: f64, max_offset: f64) -> Self {
        self.head_range = (min_offset, max_offset);
        self
    }

    #[must_use]
    pub fn with_wind_range(mut self, min_speed: f64, max_gust: f64) -> Self {
        self.wind_range = (min_speed, max_gust);
        self
    }

    #[must_use]
    pub fn position(&self) -> Position {
        Position {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

impl ThermalSite {
    #[must_use]
    pub fn new(name: &str, lat: f64, lon: f64) -> Self {
        Self {
            name: name.to_string(),
            lat,
            lon,
            start_heading_range: 0.0,
            end_heading_range: default_end_heading(),
            max_wind_speed: default_max_wind_speed(),
        }
    }

    #[must_use]
    pub fn with_heading_range(mut self, start: f64, end: f64) -> Self {
        self.start_heading_range = start;
        self.end_heading_range = end;
        self
    }

    #[must_use]
    pub fn with_max_wind_speed(mut self, max_wind_speed: f64) -> Self {
        self.max_wind_speed = max_wind_speed;
        self
    }

    /// Acceptable wind directions as a circular range
    #[must_use]
    pub fn heading_range(&self) -> HeadingRange {
        HeadingRange::new(self.start_heading_range, self.end_heading_range)
    }

    #[must_use]
    pub fn position(&self) -> Position {
        Position {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

impl Site {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Site::Soar(site) => &site.name,
            Site::Thermal(site) => &site.name,
        }
    }

    #[must_use]
    pub fn kind(&self) -> SiteKind {
        match self {
            Site::Soar(_) => SiteKind::Soar,
            Site::Thermal(_) => SiteKind::Thermal,
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        match self {
            Site::Soar(site) => site.position(),
            Site::Thermal(site) => site.position(),
        }
    }
}

/// Ordered per-type site lists
#[derive(Debug, Clone, Default)]
pub struct SiteCatalog {
    soar: Vec<SoarSite>,
    thermal: Vec<ThermalSite>,
}

impl SiteCatalog {
    /// Build a catalog, rejecting duplicate names within a type-list
    pub fn new(soar: Vec<SoarSite>, thermal: Vec<ThermalSite>) -> crate::Result<Self> {
        ensure_unique(SiteKind::Soar, soar.iter().map(|s| s.name.as_str()))?;
        ensure_unique(SiteKind::Thermal, thermal.iter().map(|s| s.name.as_str()))?;
        Ok(Self { soar, thermal })
    }

    /// Split a mixed list into per-type lists, keeping the given order
    pub fn from_sites(sites: Vec<Site>) -> crate::Result<Self> {
        let mut soar = Vec::new();
        let mut thermal = Vec::new();
        for site in sites {
            match site {
                Site::Soar(s) => soar.push(s),
                Site::Thermal(t) => thermal.push(t),
            }
        }
        Self::new(soar, thermal)
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        let sites: Vec<Site> = serde_json::from_str(json)?;
        Self::from_sites(sites)
    }

    /// Load a JSON site list from disk
    pub fn load(path: &Path) -> crate::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        tracing::debug!(
            "Loaded {} soar and {} thermal sites from {}",
            catalog.soar.len(),
            catalog.thermal.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Built-in sites along the Dutch coast plus Coo
    #[must_use]
    pub fn presets() -> Self {
        let soar = vec![
            SoarSite::new("Zoutelande (Main Dune)", 51.492_894, 3.499_841, 222.0)
                .with_head_range(-55.0, 45.0)
                .with_wind_range(18.0, 50.0),
            SoarSite::new("Wijk aan Zee (North)", 52.502_193, 4.589_126, 284.0),
            SoarSite::new("Castricum aan Zee", 52.564_313, 4.608_334, 279.0),
            SoarSite::new("Langevelderslag (Noordwijk)", 52.302_953, 4.475_574, 295.0),
            SoarSite::new("Rockanje (South)", 51.866_840, 4.052_526, 213.0),
            SoarSite::new("Renesse (East)", 51.740_870, 3.810_101, 13.0).with_wind_range(25.0, 50.0),
            SoarSite::new("Renesse (West)", 51.741_337, 3.760_768, 340.0).with_wind_range(25.0, 50.0),
        ];
        let thermal = vec![
            ThermalSite::new("Coo (West)", 50.398_975, 5.887_711)
                .with_heading_range(270.0, 90.0)
                .with_max_wind_speed(30.0),
        ];
        Self { soar, thermal }
    }

    #[must_use]
    pub fn soar_sites(&self) -> &[SoarSite] {
        &self.soar
    }

    #[must_use]
    pub fn thermal_sites(&self) -> &[ThermalSite] {
        &self.thermal
    }

    #[must_use]
    pub fn len(&self, kind: SiteKind) -> usize {
        match kind {
            SiteKind::Soar => self.soar.len(),
            SiteKind::Thermal => self.thermal.len(),
        }
    }

    /// Position of a named site within its type-list
    #[must_use]
    pub fn index_of(&self, kind: SiteKind, name: &str) -> Option<usize> {
        match kind {
            SiteKind::Soar => self.soar.iter().position(|s| s.name == name),
            SiteKind::Thermal => self.thermal.iter().position(|s| s.name == name),
        }
    }

    #[must_use]
    pub fn site_name(&self, kind: SiteKind, index: usize) -> Option<&str> {
        match kind {
            SiteKind::Soar => self.soar.get(index).map(|s| s.name.as_str()),
            SiteKind::Thermal => self.thermal.get(index).map(|s| s.name.as_str()),
        }
    }

    /// Flat list, soar sites first
    #[must_use]
    pub fn sites(&self) -> Vec<Site> {
        self.soar
            .iter()
            .cloned()
            .map(Site::Soar)
            .chain(self.thermal.iter().cloned().map(Site::Thermal))
            .collect()
    }
}

fn ensure_unique<'a>(kind: SiteKind, names: impl Iterator<Item = &'a str>) -> crate::Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ForecastError::validation(format!(
                "Duplicate {kind} site name '{name}'"
            )));
        }
    }
    Ok(())
}
