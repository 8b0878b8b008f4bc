// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Track geometry for the run tracker
//!
//! Maps a completion percentage onto the boundary of a stadium shaped track
//! and derives the progress markers drawn on top of it.

use serde::{Deserialize, Serialize};

pub mod markers;
pub mod stadium;

pub use markers::{Dimensions, Marker, Markers, compute_markers};
pub use stadium::Stadium;

/// A point in screen coordinates; `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Selects which edge of the track ring a point is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Outer,
    Inner,
}

#[cfg(test)]
mod tests;
