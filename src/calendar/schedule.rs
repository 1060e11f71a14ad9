//! Daily schedule
//!
//! A demo schedule built from a fixed catalog. Statuses are placeholders
//! derived from the selected date, not from stored alarms.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::render::{format_time_12h, Element};

/// One catalog entry: name, dosage, "HH:MM"
pub const CATALOG: [(&str, &str, &str); 6] = [
    ("Metformin", "500mg", "08:00"),
    ("Lisinopril", "10mg", "09:00"),
    ("Vitamin D", "1000IU", "12:00"),
    ("Atorvastatin", "20mg", "14:00"),
    ("Omeprazole", "20mg", "18:00"),
    ("Aspirin", "81mg", "21:00"),
];

/// Entries before this position count as already due on the current day
const DUE_TODAY: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DoseStatus {
    Taken,
    Upcoming,
    Missed,
}

impl DoseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DoseStatus::Taken => "taken",
            DoseStatus::Upcoming => "upcoming",
            DoseStatus::Missed => "missed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DoseStatus::Taken => "Taken",
            DoseStatus::Upcoming => "Upcoming",
            DoseStatus::Missed => "Missed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    pub name: &'static str,
    pub dosage: &'static str,
    pub time: &'static str,
    pub status: DoseStatus,
}

/// Schedule for `date` as seen on `today`
pub fn daily_schedule(date: NaiveDate, today: NaiveDate) -> Vec<ScheduleEntry> {
    CATALOG
        .iter()
        .enumerate()
        .map(|(index, &(name, dosage, time))| ScheduleEntry {
            name,
            dosage,
            time,
            status: dose_status(date, today, index),
        })
        .collect()
}

fn dose_status(date: NaiveDate, today: NaiveDate, index: usize) -> DoseStatus {
    let past = || {
        if (date.day() as usize + index) % 4 == 0 {
            DoseStatus::Missed
        } else {
            DoseStatus::Taken
        }
    };

    if date < today {
        past()
    } else if date > today {
        DoseStatus::Upcoming
    } else if index < DUE_TODAY {
        past()
    } else {
        DoseStatus::Upcoming
    }
}

pub fn render_schedule_html(date: NaiveDate, entries: &[ScheduleEntry]) -> Element {
    let heading = date.format("%A, %B %-d").to_string();

    Element::new("div")
        .class("schedule")
        .child(Element::new("h3").class("schedule-date").text(heading))
        .children(entries.iter().map(|entry| {
            Element::new("div")
                .class("schedule-item")
                .class(entry.status.as_str())
                .child(
                    Element::new("span")
                        .class("schedule-time")
                        .text(format_time_12h(entry.time)),
                )
                .child(
                    Element::new("div")
                        .class("schedule-info")
                        .child(Element::new("span").class("schedule-name").text(entry.name))
                        .child(Element::new("span").class("schedule-dosage").text(entry.dosage)),
                )
                .child(
                    Element::new("span")
                        .class("schedule-status")
                        .class(format!("status-{}", entry.status.as_str()))
                        .text(entry.status.label()),
                )
        }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn statuses(entries: &[ScheduleEntry]) -> Vec<DoseStatus> {
        entries.iter().map(|e| e.status).collect()
    }

    #[test]
    fn test_catalog_order() {
        let entries = daily_schedule(date(2026, 10, 19), date(2026, 10, 19));
        let names: Vec<&str> = entries.iter().map(|e| e.name).collect();
        assert_eq!(
            names,
            vec!["Metformin", "Lisinopril", "Vitamin D", "Atorvastatin", "Omeprazole", "Aspirin"]
        );
    }

    #[test]
    fn test_future_day_is_all_upcoming() {
        let entries = daily_schedule(date(2026, 10, 25), date(2026, 10, 19));
        assert!(entries.iter().all(|e| e.status == DoseStatus::Upcoming));
    }

    #[test]
    fn test_past_day_uses_modulo_rule() {
        use DoseStatus::*;

        // day 12: index 0 and 4 give multiples of 4
        let entries = daily_schedule(date(2026, 10, 12), date(2026, 10, 19));
        assert_eq!(
            statuses(&entries),
            vec![Missed, Taken, Taken, Taken, Missed, Taken]
        );

        // day 13: index 3 gives 16
        let entries = daily_schedule(date(2026, 10, 13), date(2026, 10, 19));
        assert_eq!(
            statuses(&entries),
            vec![Taken, Taken, Taken, Missed, Taken, Taken]
        );
    }

    #[test]
    fn test_today_splits_due_and_upcoming() {
        use DoseStatus::*;

        // day 19: index 1 gives 20
        let today = date(2026, 10, 19);
        let entries = daily_schedule(today, today);
        assert_eq!(
            statuses(&entries),
            vec![Taken, Missed, Taken, Upcoming, Upcoming, Upcoming]
        );
    }

    #[test]
    fn test_render_schedule_html() {
        let today = date(2026, 10, 19);
        let entries = daily_schedule(today, today);
        let el = render_schedule_html(today, &entries);

        assert_eq!(
            el.find_by_class("schedule-date")[0].text_content(),
            "Monday, October 19"
        );
        assert_eq!(el.find_by_class("schedule-item").len(), 6);
        assert_eq!(el.find_by_class("schedule-time")[0].text_content(), "8:00 AM");
        assert_eq!(el.find_by_class("status-missed").len(), 1);
        assert_eq!(el.find_by_class("status-upcoming").len(), 3);
    }
}
