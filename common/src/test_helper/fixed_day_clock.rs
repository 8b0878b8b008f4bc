// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::day_clock::DayClock;
use chrono::NaiveDate;
use std::sync::mpsc;

/// A test implementation of [`DayClock`] that allows deterministic control
/// of the current date in unit tests.
///
/// Internally, it uses an [`mpsc::channel`] to receive externally
/// provided dates, and a [`RefCell`](std::cell::RefCell) to hold the latest
/// received date.
pub struct FixedDayClock {
    sender: mpsc::Sender<NaiveDate>,
    receiver: mpsc::Receiver<NaiveDate>,
    date: std::cell::RefCell<NaiveDate>,
}

impl FixedDayClock {
    /// Creates a clock that reports `date` until a new date is sent.
    pub fn new(date: NaiveDate) -> Self {
        let (tx, rx) = mpsc::channel::<NaiveDate>();
        Self {
            sender: tx,
            receiver: rx,
            // Not synchronized, but sufficient for test usage.
            date: std::cell::RefCell::new(date),
        }
    }

    /// Creates a clock for the given calendar day.
    ///
    /// Panics if the date does not exist.
    pub fn ymd(year: i32, month: u32, day: u32) -> Self {
        Self::new(
            NaiveDate::from_ymd_opt(year, month, day)
                .unwrap_or_else(|| panic!("Invalid test date {year}-{month}-{day}")),
        )
    }

    /// Returns a clone of the internal sender used to move the clock from
    /// outside, e.g. after the clock was moved into a module.
    pub fn sender(&self) -> mpsc::Sender<NaiveDate> {
        self.sender.clone()
    }

    fn receive(&self) -> NaiveDate {
        if let Ok(date) = self.receiver.try_recv() {
            *self.date.borrow_mut() = date;
        }
        *self.date.borrow()
    }
}

impl DayClock for FixedDayClock {
    fn today(&self) -> NaiveDate {
        self.receive()
    }
}

/// Sends a new date to a [`FixedDayClock`] through its sender.
///
/// Panics if sending fails, for example if the clock has been dropped.
pub fn set_today(sender: &mpsc::Sender<NaiveDate>, date: &NaiveDate) {
    sender
        .send(*date)
        .unwrap_or_else(|_| panic!("Failed to send date to the fixed day clock"));
}
