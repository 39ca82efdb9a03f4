//! `soaralarm` - flight-suitability forecasts for paragliding sites
//!
//! This library turns hourly weather forecasts for slope-soaring and thermal
//! sites into per-day classifications, wind statistics and a best-site
//! summary per date.

pub mod config;
pub mod daylight;
pub mod error;
pub mod flyability;
pub mod forecast;
pub mod logging;
pub mod models;

// Re-export core types for public API
pub use config::SoarAlarmConfig;
pub use error::ForecastError;
pub use flyability::{
    ClassifiedDay, DaySummary, GanttInterval, HeadingRange, MarkerColor, PreferenceWindow,
    SoarDay, SoarState, ThermalDay, WindPizza,
};
pub use forecast::{
    ForecastBatch, ForecastReport, IndexedBatch, SiteFailure, soar_forecast, thermal_forecast,
};
pub use models::{RawSeries, Site, SiteCatalog, SiteKind, SoarSite, ThermalSite};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ForecastError>;
