// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Common Modul for the run tracker
//!
//! Provides the common data types that are used across every modul.

pub mod day_clock;
pub mod distance;
pub mod entry;
pub mod history;
pub mod serde;
pub mod summary;
pub mod test_helper;

/// Number of days the yearly goal is spread over.
pub const DAYS_PER_GOAL_YEAR: f64 = 365.0;

#[cfg(test)]
mod tests;
