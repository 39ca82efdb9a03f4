//! Circular heading ranges
//!
//! Wind directions live on a circle, so "between 270° and 90°" means the
//! northern half, not an empty interval. A [`HeadingRange`] records up front
//! whether its band wraps through north, and every direction test in the
//! crate goes through it.

use serde::{Deserialize, Serialize};

/// A band of compass directions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HeadingRange {
    /// No direction at all
    Empty,
    /// Every direction
    Full,
    /// `start <= end`, start in `[0, 360)` and end in `[0, 360]`
    Contiguous { start: f64, end: f64 },
    /// Band through north: `start > end`, both in `[0, 360)`
    Wrapping { start: f64, end: f64 },
}

impl HeadingRange {
    /// Absolute band from `start` clockwise to `end`.
    ///
    /// A span of 360° or more (e.g. `0..360`) covers the whole circle. An end
    /// of 360° stays the top of the band, so `270..360` does not admit 0°.
    #[must_use]
    pub fn new(start: f64, end: f64) -> Self {
        if end - start >= 360.0 {
            return HeadingRange::Full;
        }
        let start = normalize(start);
        let end = match normalize(end) {
            folded if folded == 0.0 && end >= 360.0 => 360.0,
            folded => folded,
        };
        if start <= end {
            HeadingRange::Contiguous { start, end }
        } else {
            HeadingRange::Wrapping { start, end }
        }
    }

    /// Band of relative offsets around `heading`, e.g. `around(284, -45, -22.5)`.
    ///
    /// Offsets are signed; an inverted pair (`min >= max`) is empty.
    #[must_use]
    pub fn around(heading: f64, min_offset: f64, max_offset: f64) -> Self {
        if min_offset >= max_offset {
            return HeadingRange::Empty;
        }
        if max_offset - min_offset >= 360.0 {
            return HeadingRange::Full;
        }
        Self::new(heading + min_offset, heading + max_offset)
    }

    /// Inclusive membership
    #[must_use]
    pub fn contains(&self, direction: f64) -> bool {
        let dir = normalize(direction);
        match *self {
            HeadingRange::Empty => false,
            HeadingRange::Full => true,
            HeadingRange::Contiguous { start, end } => start <= dir && dir <= end,
            HeadingRange::Wrapping { start, end } => dir >= start || dir <= end,
        }
    }

    /// Membership with both edges excluded
    #[must_use]
    pub fn contains_strictly(&self, direction: f64) -> bool {
        let dir = normalize(direction);
        match *self {
            HeadingRange::Empty => false,
            HeadingRange::Full => true,
            HeadingRange::Contiguous { start, end } => start < dir && dir < end,
            HeadingRange::Wrapping { start, end } => dir > start || dir < end,
        }
    }
}

/// `direction` folded into `[0, 360)`
#[must_use]
pub fn normalize(direction: f64) -> f64 {
    let folded = direction.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if folded >= 360.0 { 0.0 } else { folded }
}

/// Signed offset of `direction` from `heading`, folded into `[-180, 180)`
#[must_use]
pub fn relative_heading(direction: f64, heading: f64) -> f64 {
    (direction - heading + 180.0).rem_euclid(360.0) - 180.0
}
