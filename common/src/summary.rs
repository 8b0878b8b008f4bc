// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{DAYS_PER_GOAL_YEAR, entry::RunEntry};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Cumulative statistics of the run log for a given day.
///
/// A `Summary` is a snapshot: it is computed from the entries, the yearly goal
/// and "today" and never updated in place.
///
/// # Fields
///
/// - `total_km` – Sum of all logged distances.
/// - `entry_count` – Number of logged runs.
/// - `average_km` – Average distance per run.
/// - `daily_average_km` – Total distance divided by the days since the first run (inclusive).
/// - `required_daily_km` – Distance per day needed to reach the goal within a year.
/// - `required_to_date_km` – Distance that should be covered by today to stay on pace.
/// - `ahead_km` – `total_km - required_to_date_km`; negative when behind.
/// - `goal_km` – The yearly goal.
/// - `goal_percent` – Share of the goal covered so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_km: f64,
    pub entry_count: usize,
    pub average_km: f64,
    pub daily_average_km: f64,
    pub required_daily_km: f64,
    pub required_to_date_km: f64,
    pub ahead_km: f64,
    pub goal_km: f64,
    pub goal_percent: f64,
}

impl Summary {
    /// Computes the statistics of `entries` for the day `today`.
    ///
    /// Every division is guarded: an empty log or a non-positive goal yields
    /// `0.0` instead of `NaN`.
    pub fn compute(entries: &[RunEntry], goal_km: f64, today: NaiveDate) -> Self {
        let total_km: f64 = entries.iter().map(|e| e.kilometers).sum();
        let entry_count = entries.len();
        let average_km = if entry_count > 0 {
            total_km / entry_count as f64
        } else {
            0.0
        };
        let daily_average_km = match days_since_first_run(entries, today) {
            0 => 0.0,
            days => total_km / days as f64,
        };
        let required_daily_km = goal_km.max(0.0) / DAYS_PER_GOAL_YEAR;
        let required_to_date_km = today.ordinal() as f64 * required_daily_km;
        let goal_percent = if goal_km > 0.0 {
            total_km / goal_km * 100.0
        } else {
            0.0
        };

        Summary {
            total_km,
            entry_count,
            average_km,
            daily_average_km,
            required_daily_km,
            required_to_date_km,
            ahead_km: total_km - required_to_date_km,
            goal_km,
            goal_percent,
        }
    }

    /// Returns the formatted lines shown to the user, one statistic per line.
    pub fn lines(&self) -> Vec<String> {
        let pace = if self.ahead_km >= 0.0 {
            format!("Ahead by: {:.2} km", self.ahead_km)
        } else {
            format!("Behind by: {:.2} km", -self.ahead_km)
        };
        vec![
            format!("Total: {:.2} km", self.total_km),
            format!("Entries: {}", self.entry_count),
            format!("Average: {:.2} km", self.average_km),
            format!(
                "Daily average: {:.2} km (required {:.2} km)",
                self.daily_average_km, self.required_daily_km
            ),
            format!(
                "Goal: {:.1}% of {:.0} km",
                self.goal_percent, self.goal_km
            ),
            pace,
        ]
    }

    pub fn to_json(summary: &Summary) -> serde_json::Result<String> {
        serde_json::to_string_pretty(summary)
    }
}

/// Inclusive number of days between the earliest run and `today`.
///
/// Returns `0` for an empty log and at least `1` otherwise, also when the
/// earliest run lies after `today`.
fn days_since_first_run(entries: &[RunEntry], today: NaiveDate) -> i64 {
    match entries.iter().map(|e| e.date).min() {
        Some(first) => ((today - first).num_days() + 1).max(1),
        None => 0,
    }
}
