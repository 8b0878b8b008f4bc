// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use chrono::{Datelike, Local, NaiveDate};

/// A trait for reading the current calendar day.
///
/// The required pace and the daily averages depend on "today". Modules take
/// the day from an implementation of this trait instead of reading the wall
/// clock themselves, so tests can pin the date.
pub trait DayClock {
    /// Returns the current calendar date.
    fn today(&self) -> NaiveDate;

    /// Returns the ordinal day of the current year, starting with `1` for January 1st.
    fn day_of_year(&self) -> u32 {
        self.today().ordinal()
    }
}

/// A [`DayClock`] implementation that reads the local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDayClock;

impl LocalDayClock {
    pub fn new() -> Self {
        LocalDayClock
    }
}

impl DayClock for LocalDayClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
