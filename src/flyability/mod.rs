//! Flight-suitability classification
//!
//! - `angle`: circular heading ranges shared by both site types
//! - `window`: day windows, preference window and the nominal day axis
//! - `soar`: per-hour soaring states, wind pizza and gantt timeline
//! - `thermal`: flyable and thermal hour counts
//! - `summary`: best site per day, marker colours and day labels

pub mod angle;
pub mod soar;
pub mod summary;
pub mod thermal;
pub mod window;

pub use angle::HeadingRange;
pub use soar::{GanttInterval, Sector, SoarDay, SoarState, WindPizza};
pub use summary::{ClassifiedDay, DaySummary, MarkerColor, day_label, summarize};
pub use thermal::ThermalDay;
pub use window::{DayWindow, PreferenceWindow, calendar_timestamp, nominal_timestamp, window};
