// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{Boundary, Point};
use std::f64::consts::PI;

/// Gap between the viewport edge and the track.
const VIEWPORT_MARGIN: f64 = 20.0;
/// Track width relative to the usable viewport size.
const WIDTH_FACTOR: f64 = 1.4;
/// Track height relative to the usable viewport size.
const HEIGHT_FACTOR: f64 = 0.8;

/// A rectangle with two semicircular caps, the shape of an athletics track.
///
/// `width` and `height` describe the outer bounding box; the caps have the
/// diameter `height`. `thickness` is the width of the ring between the outer
/// and the inner boundary.
///
/// The shape is well formed when `0 < height <= width` and
/// `thickness < height / 2`. The geometry functions do not check this; callers
/// guarantee it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stadium {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub thickness: f64,
}

impl Stadium {
    pub fn new(center: Point, width: f64, height: f64, thickness: f64) -> Self {
        Stadium {
            center,
            width,
            height,
            thickness,
        }
    }

    /// Builds the stadium drawn into a viewport of the given size.
    ///
    /// The track is centered, `1.4` times as wide and `0.8` times as high as
    /// the smaller viewport side minus a 20 pixel margin.
    pub fn fit(viewport_width: f64, viewport_height: f64, thickness: f64) -> Self {
        let size = viewport_width.min(viewport_height) - VIEWPORT_MARGIN;
        Stadium {
            center: Point::new(viewport_width / 2.0, viewport_height / 2.0),
            width: size * WIDTH_FACTOR,
            height: size * HEIGHT_FACTOR,
            thickness,
        }
    }

    /// Length of one straight edge of the outer boundary.
    pub fn straight_length(&self) -> f64 {
        self.width - self.height
    }

    /// Arc length of one cap of the outer boundary.
    pub fn semicircle_length(&self) -> f64 {
        PI * (self.height / 2.0)
    }

    /// Length of the outer boundary; the reference for all percentages.
    pub fn perimeter(&self) -> f64 {
        2.0 * self.straight_length() + 2.0 * self.semicircle_length()
    }

    /// Cap radius of the requested boundary.
    pub fn radius(&self, boundary: Boundary) -> f64 {
        match boundary {
            Boundary::Outer => self.height / 2.0,
            Boundary::Inner => self.height / 2.0 - self.thickness,
        }
    }

    /// Center of the right cap. The left cap is mirrored at `center.x`.
    fn cap_offset(&self) -> f64 {
        self.straight_length() / 2.0
    }

    /// Maps `percent` of a lap onto the requested boundary.
    ///
    /// The lap starts at bottom-center and runs clockwise on screen:
    ///
    /// 1. half of the bottom straight, to the right,
    /// 2. the right cap, bottom to top,
    /// 3. the whole top straight, right to left,
    /// 4. the left cap, top to bottom,
    /// 5. the other half of the bottom straight, back to bottom-center.
    ///
    /// The distance along the lap is always measured on the outer boundary, so
    /// the inner and outer points of the same percentage share a vertical line
    /// on the straights and a radius on the caps.
    ///
    /// `percent` is clamped to `0..=100`; `0` and `100` are the same point.
    ///
    /// ```rust
    /// use algorithm::{Boundary, Point, Stadium};
    ///
    /// let stadium = Stadium::new(Point::new(0.0, 0.0), 400.0, 200.0, 35.0);
    /// let start = stadium.position_on_track(0.0, Boundary::Outer);
    /// assert_eq!(start, Point::new(0.0, 100.0));
    /// ```
    pub fn position_on_track(&self, percent: f64, boundary: Boundary) -> Point {
        let straight = self.straight_length();
        let semicircle = self.semicircle_length();
        let radius = self.radius(boundary);
        let cap = self.cap_offset();
        let Point { x: cx, y: cy } = self.center;

        let mut remaining = percent.clamp(0.0, 100.0) / 100.0 * self.perimeter();

        let half_straight = straight / 2.0;
        if remaining <= half_straight {
            return Point::new(cx + remaining, cy + radius);
        }
        remaining -= half_straight;

        if remaining <= semicircle {
            let angle = 90.0 - remaining / semicircle * 180.0;
            return on_arc(cx + cap, cy, radius, angle);
        }
        remaining -= semicircle;

        if remaining <= straight {
            return Point::new(cx + cap - remaining, cy - radius);
        }
        remaining -= straight;

        if remaining <= semicircle {
            let angle = 270.0 - remaining / semicircle * 180.0;
            return on_arc(cx - cap, cy, radius, angle);
        }
        remaining -= semicircle;

        Point::new(cx - cap + remaining, cy + radius)
    }
}

/// Point on a circle around `(cx, cy)` at `degrees`, screen orientation.
fn on_arc(cx: f64, cy: f64, radius: f64, degrees: f64) -> Point {
    let rad = degrees.to_radians();
    Point::new(cx + radius * rad.cos(), cy + radius * rad.sin())
}
