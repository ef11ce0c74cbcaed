use std::fmt;

use chrono::NaiveDate;

use crate::registry::EventRegistry;

const TABLE_HEAD: &str = "Date|Event\n:-:|:-:\n";

/// One `DD Mon|[title](url)` line of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub date: NaiveDate,
    pub title: String,
    pub url: String,
}

impl fmt::Display for TableRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|[{}]({})", self.date.format("%d %b"), self.title, self.url)
    }
}

/// Rows in day order, then in each day's event order. Empty days add nothing.
pub fn rows(registry: &EventRegistry) -> Vec<TableRow> {
    registry
        .records()
        .map(|(date, record)| TableRow {
            date,
            title: record.title.clone(),
            url: record.url.clone(),
        })
        .collect()
}

/// Render the registry as a two-column markdown table.
pub fn render(registry: &EventRegistry) -> String {
    rows(registry).iter().fold(TABLE_HEAD.to_string(), |mut table, row| {
        table.push_str(&row.to_string());
        table.push('\n');
        table
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posting::CandidatePosting;
    use crate::window::CalendarWindow;

    fn window() -> CalendarWindow {
        CalendarWindow::build(NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(), 0, 7)
    }

    #[test]
    fn empty_registry_renders_only_header() {
        let registry = EventRegistry::empty(&window());
        assert_eq!(render(&registry), "Date|Event\n:-:|:-:\n");
    }

    #[test]
    fn example_row() {
        let registry = EventRegistry::bucket(
            vec![CandidatePosting::new("Happy Hour @ Bar", "http://x/1", Some("03/10"), "1710000000.5")],
            &window(),
        )
        .unwrap();

        assert_eq!(
            render(&registry),
            "Date|Event\n:-:|:-:\n10 Mar|[Happy Hour @ Bar](http://x/1)\n"
        );
    }

    #[test]
    fn rows_follow_day_then_timestamp_order() {
        let registry = EventRegistry::bucket(
            vec![
                CandidatePosting::new("Brunch", "u3", Some("03/14"), "5.0"),
                CandidatePosting::new("Karaoke", "u2", Some("03/09"), "9.0"),
                CandidatePosting::new("Board games", "u1", Some("03/09"), "1.0"),
            ],
            &window(),
        )
        .unwrap();

        let lines: Vec<String> = rows(&registry).iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            ["09 Mar|[Board games](u1)", "09 Mar|[Karaoke](u2)", "14 Mar|[Brunch](u3)"]
        );
    }
}
