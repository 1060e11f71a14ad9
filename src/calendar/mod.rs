//! Calendar Widget
//!
//! In-memory month view: the displayed month, the selected day, a month grid
//! and a demo schedule for the selected day. Nothing here touches the API.

mod grid;
mod schedule;

pub use grid::{
    days_in_month, first_weekday, has_missed_dose, month_name, render_grid_html, CellKind,
    DayCell, MonthGrid, WEEKDAY_LABELS,
};
pub use schedule::{daily_schedule, render_schedule_html, DoseStatus, ScheduleEntry, CATALOG};

use chrono::{Datelike, NaiveDate};

use crate::render::Element;

/// Displayed month plus selected day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarState {
    year: i32,
    month: u32,
    selected: NaiveDate,
}

impl CalendarState {
    /// Start on `today`'s month with `today` selected
    pub fn new(today: NaiveDate) -> Self {
        Self {
            year: today.year(),
            month: today.month(),
            selected: today,
        }
    }

    /// Show `year`/`month`, keeping the selection. `None` for an invalid month.
    pub fn with_month(self, year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self {
            year,
            month,
            ..self
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn next_month(&mut self) {
        if self.month == 12 {
            self.year += 1;
            self.month = 1;
        } else {
            self.month += 1;
        }
    }

    pub fn prev_month(&mut self) {
        if self.month == 1 {
            self.year -= 1;
            self.month = 12;
        } else {
            self.month -= 1;
        }
    }

    /// Select `day` of the displayed month. Returns `false` if the day does not exist.
    pub fn select_day(&mut self, day: u32) -> bool {
        match NaiveDate::from_ymd_opt(self.year, self.month, day) {
            Some(date) => {
                self.selected = date;
                true
            }
            None => false,
        }
    }

    pub fn grid(&self, today: NaiveDate) -> Option<MonthGrid> {
        MonthGrid::build(self.year, self.month, self.selected, today)
    }

    pub fn schedule(&self, today: NaiveDate) -> Vec<ScheduleEntry> {
        daily_schedule(self.selected, today)
    }

    /// Grid followed by the selected day's schedule
    pub fn render(&self, today: NaiveDate) -> Element {
        let mut view = Element::new("div").class("calendar-view");
        if let Some(grid) = self.grid(today) {
            view = view.child(render_grid_html(&grid));
        }
        view.child(render_schedule_html(self.selected, &self.schedule(today)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_starts_on_today() {
        let today = date(2026, 10, 19);
        let state = CalendarState::new(today);
        assert_eq!((state.year(), state.month()), (2026, 10));
        assert_eq!(state.selected(), today);
    }

    #[test]
    fn test_month_navigation_wraps_years() {
        let mut state = CalendarState::new(date(2026, 12, 3));
        state.next_month();
        assert_eq!((state.year(), state.month()), (2027, 1));

        state.prev_month();
        state.prev_month();
        assert_eq!((state.year(), state.month()), (2026, 11));

        let mut state = CalendarState::new(date(2026, 1, 3));
        state.prev_month();
        assert_eq!((state.year(), state.month()), (2025, 12));
    }

    #[test]
    fn test_navigation_keeps_selection() {
        let today = date(2026, 10, 19);
        let mut state = CalendarState::new(today);
        state.next_month();

        assert_eq!(state.selected(), today);
        let grid = state.grid(today).unwrap();
        assert!(grid.current_days().all(|c| !c.is_selected && !c.is_today));
    }

    #[test]
    fn test_select_day() {
        let today = date(2026, 10, 19);
        let mut state = CalendarState::new(today).with_month(2026, 2).unwrap();

        assert!(state.select_day(28));
        assert_eq!(state.selected(), date(2026, 2, 28));
        assert!(!state.select_day(29));
        assert_eq!(state.selected(), date(2026, 2, 28));

        let selected: Vec<u32> = state
            .grid(today)
            .unwrap()
            .current_days()
            .filter(|c| c.is_selected)
            .map(|c| c.day)
            .collect();
        assert_eq!(selected, vec![28]);
    }

    #[test]
    fn test_invalid_month() {
        let state = CalendarState::new(date(2026, 10, 19));
        assert!(state.with_month(2026, 0).is_none());
        assert!(state.with_month(2026, 13).is_none());
    }

    #[test]
    fn test_schedule_follows_selection() {
        let today = date(2026, 10, 19);
        let mut state = CalendarState::new(today);

        state.select_day(30);
        assert!(state
            .schedule(today)
            .iter()
            .all(|e| e.status == DoseStatus::Upcoming));

        state.select_day(1);
        assert!(state
            .schedule(today)
            .iter()
            .all(|e| e.status != DoseStatus::Upcoming));
    }

    #[test]
    fn test_render_view() {
        let today = date(2026, 10, 19);
        let html = CalendarState::new(today).render(today).to_html();
        assert!(html.contains("October 2026"));
        assert!(html.contains("Monday, October 19"));
    }
}
