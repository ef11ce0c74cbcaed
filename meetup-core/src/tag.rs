//! `MM/DD` day tags embedded in posting flair.
//!
//! The pattern is a narrow text convention, not general date parsing: month
//! digits `0`-`19` and day digits `0`-`39` are accepted by shape alone, and the
//! window decides which of them are real.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::window::CalendarWindow;

static DAY_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[01][0-9]/[0-3][0-9]").expect("day tag pattern is valid"));

/// Outcome of resolving a tag against a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagMatch {
    NotFound,
    Found(NaiveDate),
    /// More than one window day shares the tag's month and day.
    Ambiguous(Vec<NaiveDate>),
}

/// Format a day as its tag, e.g. `03/10`.
pub fn format_tag(day: NaiveDate) -> String {
    day.format("%m/%d").to_string()
}

/// First `MM/DD`-shaped substring of `text`, as (month, day).
pub fn extract_month_day(text: &str) -> Option<(u32, u32)> {
    let found = DAY_TAG.find(text)?.as_str();
    let month = found[0..2].parse().ok()?;
    let day = found[3..5].parse().ok()?;
    Some((month, day))
}

/// Resolve `text` to the window day carrying the same month and day.
pub fn resolve(text: &str, window: &CalendarWindow) -> TagMatch {
    let Some((month, day)) = extract_month_day(text) else {
        return TagMatch::NotFound;
    };

    let matches: Vec<NaiveDate> = window
        .days()
        .iter()
        .copied()
        .filter(|d| d.month() == month && d.day() == day)
        .collect();

    match matches.as_slice() {
        [] => TagMatch::NotFound,
        [single] => TagMatch::Found(*single),
        _ => TagMatch::Ambiguous(matches),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> CalendarWindow {
        CalendarWindow::build(NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(), 0, 7)
    }

    #[test]
    fn no_tag_is_not_found() {
        assert_eq!(resolve("Happy hour", &window()), TagMatch::NotFound);
        assert_eq!(resolve("3/10", &window()), TagMatch::NotFound);
        assert_eq!(resolve("", &window()), TagMatch::NotFound);
    }

    #[test]
    fn date_outside_window_is_not_found() {
        assert_eq!(resolve("03/20", &window()), TagMatch::NotFound);
        assert_eq!(resolve("04/10", &window()), TagMatch::NotFound);
    }

    #[test]
    fn shape_only_tags_are_not_found() {
        // 19/39 matches the pattern but is no calendar day.
        assert_eq!(extract_month_day("19/39"), Some((19, 39)));
        assert_eq!(resolve("19/39", &window()), TagMatch::NotFound);
    }

    #[test]
    fn surrounding_text_is_ignored() {
        let expected = TagMatch::Found(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(resolve("03/10", &window()), expected);
        assert_eq!(resolve("Sun 03/10 @ 7pm", &window()), expected);
        assert_eq!(resolve("[03/10]", &window()), expected);
    }

    #[test]
    fn first_tag_wins() {
        let expected = TagMatch::Found(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(resolve("03/09 - 03/10", &window()), expected);
    }

    #[test]
    fn year_long_window_is_ambiguous() {
        let long = CalendarWindow::build(NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(), 0, 400);
        match resolve("03/10", &long) {
            TagMatch::Ambiguous(days) => assert_eq!(days.len(), 2),
            other => panic!("expected ambiguous match, got {other:?}"),
        }
    }
}
