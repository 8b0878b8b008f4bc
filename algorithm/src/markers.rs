// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{Boundary, Point, Stadium};
use common::DAYS_PER_GOAL_YEAR;
use serde::{Deserialize, Serialize};

/// A radial tick across the track ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub outer: Point,
    pub inner: Point,
}

impl Marker {
    /// Places the tick for `percent` on `stadium`.
    pub fn at(stadium: &Stadium, percent: f64) -> Self {
        Marker {
            outer: stadium.position_on_track(percent, Boundary::Outer),
            inner: stadium.position_on_track(percent, Boundary::Inner),
        }
    }
}

/// Everything the renderer needs to draw the two progress ticks.
///
/// A marker is `None` when its percentage lies outside `(0, 100]`, i.e.
/// nothing has been run yet or the pace is beyond the goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Markers {
    pub progress_percent: f64,
    pub pace_percent: f64,
    pub progress: Option<Marker>,
    pub pace: Option<Marker>,
}

/// Share of `total_km` covered by `current_km`, in percent.
///
/// Returns `0.0` when `total_km` is not positive.
pub fn progress_percent(current_km: f64, total_km: f64) -> f64 {
    if total_km > 0.0 {
        current_km / total_km * 100.0
    } else {
        0.0
    }
}

/// Share of `total_km` a runner on a linear pace has covered by `day_of_year`.
///
/// Returns `0.0` when `total_km` is not positive.
pub fn required_pace_percent(day_of_year: u32, total_km: f64) -> f64 {
    let required_km = day_of_year as f64 / DAYS_PER_GOAL_YEAR * total_km;
    progress_percent(required_km, total_km)
}

/// Computes the progress and required pace ticks for one frame.
///
/// ```rust
/// use algorithm::{Point, Stadium, compute_markers};
///
/// let stadium = Stadium::new(Point::new(250.0, 225.0), 400.0, 200.0, 35.0);
/// let markers = compute_markers(&stadium, 0.0, 1000.0, 1);
/// assert!(markers.progress.is_none());
/// assert!(markers.pace.is_some());
/// ```
pub fn compute_markers(
    stadium: &Stadium,
    current_km: f64,
    total_km: f64,
    day_of_year: u32,
) -> Markers {
    let progress_percent = progress_percent(current_km, total_km);
    let pace_percent = required_pace_percent(day_of_year, total_km);
    Markers {
        progress_percent,
        pace_percent,
        progress: visible(progress_percent).then(|| Marker::at(stadium, progress_percent)),
        pace: visible(pace_percent).then(|| Marker::at(stadium, pace_percent)),
    }
}

fn visible(percent: f64) -> bool {
    percent > 0.0 && percent <= 100.0
}

/// Size annotations of the track, scaled so one lap equals `total_km`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub km_per_unit: f64,
    pub width_km: f64,
    pub height_km: f64,
}

impl Dimensions {
    pub fn of(stadium: &Stadium, total_km: f64) -> Self {
        let perimeter = stadium.perimeter();
        let km_per_unit = if perimeter > 0.0 {
            total_km / perimeter
        } else {
            0.0
        };
        Dimensions {
            km_per_unit,
            width_km: stadium.width * km_per_unit,
            height_km: stadium.height * km_per_unit,
        }
    }
}
