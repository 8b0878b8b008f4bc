use crate::history::{EMPTY_HISTORY, format_history};
use crate::test_helper::entries::{entry, get_entries};

#[test]
fn empty_history_shows_hint() {
    assert_eq!(format_history(&[]), EMPTY_HISTORY);
}

#[test]
fn history_lists_entries_in_order() {
    let history = format_history(&get_entries());
    let lines: Vec<&str> = history.lines().collect();

    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "Date            Kilometers");
    assert_eq!(lines[0].len(), 26);
    assert_eq!(lines[1], "-".repeat(27));
    assert_eq!(lines[2], "2024-01-01           5.50 km");
    assert_eq!(lines[3], "2024-01-02           3.25 km");
    assert_eq!(lines[4], "2024-01-04          10.00 km");
}

#[test]
fn history_rounds_to_two_decimals() {
    let history = format_history(&[entry(2024, 3, 1, 7.126)]);
    assert!(history.ends_with("2024-03-01           7.13 km\n"));
}
