// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::distance::{EntryError, parse_distance};
use crate::serde::iso_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single logged run.
///
/// # Fields
///
/// - `date` – The calendar day of the run, serialized as `YYYY-MM-DD`.
/// - `kilometers` – The distance of the run in kilometers. Always positive for
///   entries created through [`NewEntry::validate`].
///
/// # Example
///
/// ```rust
/// use common::entry::RunEntry;
/// use chrono::NaiveDate;
///
/// let entry = RunEntry::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 5.5);
/// assert_eq!(entry.kilometers, 5.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEntry {
    #[serde(with = "iso_date")]
    pub date: NaiveDate,
    pub kilometers: f64,
}

impl RunEntry {
    pub fn new(date: NaiveDate, kilometers: f64) -> Self {
        RunEntry { date, kilometers }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(entry: &RunEntry) -> serde_json::Result<String> {
        serde_json::to_string(entry)
    }
}

/// An unvalidated entry as typed by the user.
///
/// The distance is kept as text so the run log can reject it with a
/// descriptive [`EntryError`] instead of the front end guessing.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub date: NaiveDate,
    pub distance: String,
}

impl NewEntry {
    pub fn new(date: NaiveDate, distance: impl Into<String>) -> Self {
        NewEntry {
            date,
            distance: distance.into(),
        }
    }

    /// Parses the distance and turns the input into a [`RunEntry`].
    pub fn validate(&self) -> Result<RunEntry, EntryError> {
        let kilometers = parse_distance(&self.distance)?;
        Ok(RunEntry::new(self.date, kilometers))
    }
}
