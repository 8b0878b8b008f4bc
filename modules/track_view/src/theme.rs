// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use algorithm::Stadium;
use module_core::Viewport;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// An RGBA color, written as `#rrggbb` or `#rrggbbaa` in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, SerializeDisplay, DeserializeFromStr)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Color { a, ..self }
    }

    /// The color without alpha, `#rrggbb`.
    pub fn hex_rgb(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as an SVG opacity between `0` and `1`.
    pub fn opacity(&self) -> f64 {
        self.a as f64 / 255.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "{}", self.hex_rgb())
        } else {
            write!(f, "{}{:02x}", self.hex_rgb(), self.a)
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid color \"{0}\", expected #rrggbb or #rrggbbaa")]
pub struct ColorParseError(String);

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ColorParseError(s.to_owned());
        let hex = s.trim().strip_prefix('#').ok_or_else(error)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(error());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| error());
        Ok(Color {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if hex.len() == 8 { channel(6)? } else { 255 },
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThemeError {
    #[error("Invalid track thickness {thickness}, expected more than 0 and less than {max}")]
    InvalidThickness { thickness: f64, max: f64 },
}

/// Colors, fonts and sizes of the track view.
///
/// Every field has a default, so a configuration only lists what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub background: Color,
    pub track: Color,
    /// Width of the track ring.
    pub thickness: f64,
    /// Current progress marker, center percentage and legend dot.
    pub progress: Color,
    /// Required pace marker and legend dot.
    pub pace: Color,
    /// Alpha of the wide line drawn under each marker.
    pub glow_alpha: u8,
    pub glow_width: f64,
    pub marker_width: f64,
    pub distance_text: Color,
    pub legend_text: Color,
    pub start_line: Color,
    pub start_line_width: f64,
    pub dimension_line: Color,
    pub dimension_text: Color,
    pub font_family: String,
    pub percent_font_size: f64,
    pub distance_font_size: f64,
    pub legend_font_size: f64,
    pub dimension_font_size: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::rgb(30, 30, 30),
            track: Color::rgb(60, 60, 60),
            thickness: 35.0,
            progress: Color::rgb(170, 170, 0),
            pace: Color::rgb(0, 255, 255),
            glow_alpha: 100,
            glow_width: 3.0,
            marker_width: 1.0,
            distance_text: Color::rgb(0, 255, 136),
            legend_text: Color::rgb(200, 200, 200),
            start_line: Color::rgba(255, 255, 255, 150),
            start_line_width: 5.0,
            dimension_line: Color::rgb(85, 85, 85),
            dimension_text: Color::rgb(120, 120, 120),
            font_family: "Monospace".to_owned(),
            percent_font_size: 24.0,
            distance_font_size: 12.0,
            legend_font_size: 10.0,
            dimension_font_size: 9.0,
        }
    }
}

impl Theme {
    /// Thickness at which the ring fills the whole infield of the smallest track.
    pub fn max_thickness() -> f64 {
        Stadium::fit(Viewport::MIN.width, Viewport::MIN.height, 0.0).height / 2.0
    }

    /// Checks that the ring leaves an infield at every viewport size.
    pub fn validate(&self) -> Result<(), ThemeError> {
        let max = Theme::max_thickness();
        if self.thickness > 0.0 && self.thickness < max {
            Ok(())
        } else {
            Err(ThemeError::InvalidThickness {
                thickness: self.thickness,
                max,
            })
        }
    }
}
