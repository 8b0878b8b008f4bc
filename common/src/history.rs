// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::entry::RunEntry;
use std::fmt::Write;

pub const EMPTY_HISTORY: &str = "No entries yet. Start tracking your runs!\n";

/// Renders the run history as a monospaced table.
///
/// ```text
/// Date            Kilometers
/// ---------------------------
/// 2024-01-01           5.50 km
/// ```
pub fn format_history(entries: &[RunEntry]) -> String {
    if entries.is_empty() {
        return EMPTY_HISTORY.to_owned();
    }
    let mut out = String::new();
    let _ = writeln!(out, "{:<15}{:>11}", "Date", "Kilometers");
    let _ = writeln!(out, "{}", "-".repeat(27));
    for entry in entries {
        let _ = writeln!(
            out,
            "{:<15}{:>10.2} km",
            entry.date.format("%Y-%m-%d").to_string(),
            entry.kilometers
        );
    }
    out
}
