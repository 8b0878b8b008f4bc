// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::entry::RunEntry;
use chrono::NaiveDate;

pub fn get_entries_as_text<'a>() -> &'a str {
    include_str!("../../../assets/runs/runs.txt")
}

/// Returns the entries stored in `assets/runs/runs.txt`.
pub fn get_entries() -> Vec<RunEntry> {
    vec![
        entry(2024, 1, 1, 5.5),
        entry(2024, 1, 2, 3.25),
        entry(2024, 1, 4, 10.0),
    ]
}

pub fn entry(year: i32, month: u32, day: u32, kilometers: f64) -> RunEntry {
    RunEntry::new(
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap_or_else(|| panic!("Invalid test date {year}-{month}-{day}")),
        kilometers,
    )
}
