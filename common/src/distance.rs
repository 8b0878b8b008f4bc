// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use thiserror::Error;

/// Reasons a typed distance is rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntryError {
    #[error("No distance entered")]
    Empty,
    #[error("Invalid input \"{0}\"! Please enter a valid number.")]
    InvalidNumber(String),
    #[error("Please enter a positive number! Got {0}.")]
    NotPositive(f64),
}

/// Parses a user supplied distance in kilometers.
///
/// Surrounding whitespace is ignored and a single `,` is accepted as the
/// decimal separator, so `"5,5"` and `"5.5"` are the same distance.
///
/// # Errors
///
/// - [`EntryError::Empty`] for blank input.
/// - [`EntryError::InvalidNumber`] for text that is not a finite number.
/// - [`EntryError::NotPositive`] for zero or negative distances.
///
/// # Example
///
/// ```rust
/// use common::distance::parse_distance;
///
/// assert_eq!(parse_distance(" 5,5 "), Ok(5.5));
/// assert!(parse_distance("-1").is_err());
/// ```
pub fn parse_distance(input: &str) -> Result<f64, EntryError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(EntryError::Empty);
    }
    let normalized = if trimmed.contains('.') {
        trimmed.to_owned()
    } else {
        trimmed.replacen(',', ".", 1)
    };
    let kilometers = normalized
        .parse::<f64>()
        .ok()
        .filter(|km| km.is_finite())
        .ok_or_else(|| EntryError::InvalidNumber(trimmed.to_owned()))?;
    if kilometers <= 0.0 {
        return Err(EntryError::NotPositive(kilometers));
    }
    Ok(kilometers)
}
