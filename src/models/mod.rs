//! Data models for soaralarm
//!
//! - Site: flying site descriptors and the catalog that orders them
//! - Series: raw hourly/daily forecast data for one site

pub mod series;
pub mod site;

pub use series::{AltitudeBand, DailyEntry, HourRecord, HourlySeries, RawSeries};
pub use site::{Position, Site, SiteCatalog, SiteKind, SoarSite, ThermalSite};
