// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::theme::{Color, Theme};
use algorithm::{Boundary, Dimensions, Marker, Markers, Point, Stadium, compute_markers};
use module_core::{Progress, Viewport};
use std::fmt::Write as _;

const DIMENSION_OFFSET: f64 = 20.0;
const TICK_SIZE: f64 = 8.0;
const LEGEND_X: f64 = 15.0;
const LEGEND_DOT: f64 = 12.0;
const LEGEND_LINE_HEIGHT: f64 = 25.0;

/// Everything drawn for one frame of the track view, before it becomes SVG.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackScene {
    pub viewport: Viewport,
    pub stadium: Stadium,
    pub markers: Markers,
    pub dimensions: Dimensions,
    pub percent_text: String,
    pub distance_text: String,
}

impl TrackScene {
    /// Lays out the track for `viewport` and places the markers for `progress`
    /// on `day_of_year`.
    ///
    /// Viewports smaller than [`Viewport::MIN`] are grown to it.
    pub fn compute(
        viewport: Viewport,
        progress: &Progress,
        day_of_year: u32,
        thickness: f64,
    ) -> Self {
        let viewport = viewport.at_least_min();
        let stadium = Stadium::fit(viewport.width, viewport.height, thickness);
        let markers = compute_markers(
            &stadium,
            progress.current_km,
            progress.total_km,
            day_of_year,
        );
        TrackScene {
            viewport,
            stadium,
            markers,
            dimensions: Dimensions::of(&stadium, progress.total_km),
            percent_text: format!("{:.1}%", markers.progress_percent),
            distance_text: format!(
                "{:.1} / {:.0} km",
                progress.current_km, progress.total_km
            ),
        }
    }

    /// Renders the scene as a standalone SVG document.
    pub fn to_svg(&self, theme: &Theme) -> String {
        let Viewport { width, height } = self.viewport;
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}" font-family="{}">"#,
            fmt(width),
            fmt(height),
            fmt(width),
            fmt(height),
            escape_attr(&theme.font_family)
        );
        let _ = writeln!(
            out,
            r#"<rect x="0" y="0" width="{}" height="{}"{}/>"#,
            fmt(width),
            fmt(height),
            fill(theme.background)
        );
        self.write_track(&mut out, theme);
        if let Some(pace) = &self.markers.pace {
            write_marker(&mut out, pace, theme.pace, theme);
        }
        if let Some(progress) = &self.markers.progress {
            write_marker(&mut out, progress, theme.progress, theme);
        }
        self.write_readout(&mut out, theme);
        self.write_legend(&mut out, theme);
        self.write_start_line(&mut out, theme);
        self.write_dimensions(&mut out, theme);
        out.push_str("</svg>\n");
        out
    }

    fn write_track(&self, out: &mut String, theme: &Theme) {
        let _ = writeln!(
            out,
            r#"<path class="track" fill-rule="evenodd" d="{} {}"{}/>"#,
            stadium_path(&self.stadium, Boundary::Outer),
            stadium_path(&self.stadium, Boundary::Inner),
            fill(theme.track)
        );
    }

    fn write_readout(&self, out: &mut String, theme: &Theme) {
        let center = self.stadium.center;
        let _ = writeln!(
            out,
            r#"<text class="percent" x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" font-size="{}" font-weight="bold"{}>{}</text>"#,
            fmt(center.x),
            fmt(center.y - 15.0),
            fmt(theme.percent_font_size),
            fill(theme.progress),
            self.percent_text
        );
        let _ = writeln!(
            out,
            r#"<text class="distance" x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" font-size="{}"{}>{}</text>"#,
            fmt(center.x),
            fmt(center.y + 25.0),
            fmt(theme.distance_font_size),
            fill(theme.distance_text),
            self.distance_text
        );
    }

    fn write_legend(&self, out: &mut String, theme: &Theme) {
        let first_row = self.viewport.height - 2.0 * LEGEND_LINE_HEIGHT - 20.0;
        let rows = [(theme.progress, "Your progress"), (theme.pace, "Required pace")];
        for (row, (color, label)) in rows.iter().enumerate() {
            let y = first_row + row as f64 * LEGEND_LINE_HEIGHT;
            let _ = writeln!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}"{}/>"#,
                fmt(LEGEND_X + LEGEND_DOT / 2.0),
                fmt(y + LEGEND_DOT / 2.0),
                fmt(LEGEND_DOT / 2.0),
                fill(*color)
            );
            let _ = writeln!(
                out,
                r#"<text class="legend" x="{}" y="{}" font-size="{}"{}>{}</text>"#,
                fmt(LEGEND_X + LEGEND_DOT + 8.0),
                fmt(y + LEGEND_DOT + 2.0),
                fmt(theme.legend_font_size),
                fill(theme.legend_text),
                label
            );
        }
    }

    fn write_start_line(&self, out: &mut String, theme: &Theme) {
        let stadium = &self.stadium;
        let bottom = stadium.center.y + stadium.height / 2.0;
        write_line(
            out,
            Point::new(stadium.center.x, bottom - stadium.thickness),
            Point::new(stadium.center.x, bottom),
            theme.start_line,
            theme.start_line_width,
        );
    }

    fn write_dimensions(&self, out: &mut String, theme: &Theme) {
        let stadium = &self.stadium;
        let Point { x: cx, y: cy } = stadium.center;
        let half_tick = TICK_SIZE / 2.0;
        let color = theme.dimension_line;

        let top_line_y = cy - stadium.height / 2.0 - DIMENSION_OFFSET;
        let left_x = cx - stadium.width / 2.0;
        let right_x = cx + stadium.width / 2.0;
        write_line(out, Point::new(left_x, top_line_y), Point::new(right_x, top_line_y), color, 1.0);
        write_line(
            out,
            Point::new(left_x, top_line_y - half_tick),
            Point::new(left_x, top_line_y + half_tick),
            color,
            1.0,
        );
        write_line(
            out,
            Point::new(right_x, top_line_y - half_tick),
            Point::new(right_x, top_line_y + half_tick),
            color,
            1.0,
        );
        let _ = writeln!(
            out,
            r#"<text class="dimension" x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" font-size="{}"{}>{:.2} km</text>"#,
            fmt(cx),
            fmt(top_line_y - 12.5),
            fmt(theme.dimension_font_size),
            fill(theme.dimension_text),
            self.dimensions.width_km
        );

        let right_line_x = right_x + DIMENSION_OFFSET;
        let top_y = cy - stadium.height / 2.0;
        let bottom_y = cy + stadium.height / 2.0;
        write_line(out, Point::new(right_line_x, top_y), Point::new(right_line_x, bottom_y), color, 1.0);
        write_line(
            out,
            Point::new(right_line_x - half_tick, top_y),
            Point::new(right_line_x + half_tick, top_y),
            color,
            1.0,
        );
        write_line(
            out,
            Point::new(right_line_x - half_tick, bottom_y),
            Point::new(right_line_x + half_tick, bottom_y),
            color,
            1.0,
        );
        let _ = writeln!(
            out,
            r#"<text class="dimension" transform="translate({} {}) rotate(-90)" text-anchor="middle" dominant-baseline="middle" font-size="{}"{}>{:.2} km</text>"#,
            fmt(right_line_x + 25.0),
            fmt(cy),
            fmt(theme.dimension_font_size),
            fill(theme.dimension_text),
            self.dimensions.height_km
        );
    }
}

/// Closed SVG path of one stadium boundary, clockwise from the top-left tangent point.
fn stadium_path(stadium: &Stadium, boundary: Boundary) -> String {
    let r = stadium.radius(boundary);
    let half = stadium.straight_length() / 2.0;
    let Point { x: cx, y: cy } = stadium.center;
    format!(
        "M {} {} L {} {} A {r} {r} 0 0 1 {} {} L {} {} A {r} {r} 0 0 1 {} {} Z",
        fmt(cx - half),
        fmt(cy - r),
        fmt(cx + half),
        fmt(cy - r),
        fmt(cx + half),
        fmt(cy + r),
        fmt(cx - half),
        fmt(cy + r),
        fmt(cx - half),
        fmt(cy - r),
        r = fmt(r)
    )
}

/// A marker is a wide translucent line with a thin solid line on top.
fn write_marker(out: &mut String, marker: &Marker, color: Color, theme: &Theme) {
    write_line(
        out,
        marker.outer,
        marker.inner,
        color.with_alpha(theme.glow_alpha),
        theme.glow_width,
    );
    write_line(out, marker.outer, marker.inner, color, theme.marker_width);
}

fn write_line(out: &mut String, from: Point, to: Point, color: Color, width: f64) {
    let _ = writeln!(
        out,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}"{} stroke-width="{}"/>"#,
        fmt(from.x),
        fmt(from.y),
        fmt(to.x),
        fmt(to.y),
        color.hex_rgb(),
        opacity("stroke-opacity", color),
        fmt(width)
    );
}

fn fill(color: Color) -> String {
    format!(r#" fill="{}"{}"#, color.hex_rgb(), opacity("fill-opacity", color))
}

fn opacity(attr: &str, color: Color) -> String {
    if color.a == 255 {
        String::new()
    } else {
        format!(r#" {attr}="{:.3}""#, color.opacity())
    }
}

/// Formats a coordinate with at most two decimals and no trailing zeros.
pub(crate) fn fmt(value: f64) -> String {
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_owned() } else { s.to_owned() }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
