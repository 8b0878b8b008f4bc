// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use chrono::NaiveDate;
use common::{
    day_clock::DayClock,
    test_helper::fixed_day_clock::{FixedDayClock, set_today},
};

#[test]
fn day_of_year_starts_at_one() {
    assert_eq!(FixedDayClock::ymd(2024, 1, 1).day_of_year(), 1);
    assert_eq!(FixedDayClock::ymd(2023, 12, 31).day_of_year(), 365);
    assert_eq!(FixedDayClock::ymd(2024, 12, 31).day_of_year(), 366);
}

#[test]
fn fixed_clock_can_be_moved() {
    let clock = FixedDayClock::ymd(2024, 1, 1);
    let sender = clock.sender();
    let next = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

    set_today(&sender, &next);

    assert_eq!(clock.today(), next);
    assert_eq!(clock.day_of_year(), 32);
}
