//! Month grid
//!
//! Seven columns, weeks starting on Sunday. The first row is padded with the
//! trailing days of the previous month so that day 1 lands under its weekday.

use chrono::{Datelike, NaiveDate};

use crate::render::Element;

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Trailing day of the previous month
    Padding,
    Current,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub day: u32,
    pub kind: CellKind,
    pub is_today: bool,
    pub is_selected: bool,
    pub has_missed_dose: bool,
}

impl DayCell {
    fn padding(day: u32) -> Self {
        Self {
            day,
            kind: CellKind::Padding,
            is_today: false,
            is_selected: false,
            has_missed_dose: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    /// Build the grid for `year`/`month`, highlighting `selected` and `today`
    pub fn build(year: i32, month: u32, selected: NaiveDate, today: NaiveDate) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let leading = first_weekday(year, month)?;
        let days = days_in_month(year, month)?;

        let mut cells = Vec::with_capacity((leading + days) as usize);

        if leading > 0 {
            let prev = first.pred_opt()?;
            let prev_days = prev.day();
            for day in (prev_days + 1 - leading)..=prev_days {
                cells.push(DayCell::padding(day));
            }
        }

        for day in 1..=days {
            let date = first.with_day(day)?;
            cells.push(DayCell {
                day,
                kind: CellKind::Current,
                is_today: date == today,
                is_selected: date == selected,
                has_missed_dose: has_missed_dose(date, today),
            });
        }

        Some(Self { year, month, cells })
    }

    pub fn label(&self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }

    pub fn padding_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.kind == CellKind::Padding)
            .count()
    }

    pub fn current_days(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter().filter(|c| c.kind == CellKind::Current)
    }

    /// Rows of seven; the last row may be short
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }
}

/// Placeholder rule until doses are tracked per day
pub fn has_missed_dose(date: NaiveDate, today: NaiveDate) -> bool {
    date.day() % 5 == 0 && date < today
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// Weekday of the 1st, counted from Sunday (0..=6)
pub fn first_weekday(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|d| d.weekday().num_days_from_sunday())
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

pub fn render_grid_html(grid: &MonthGrid) -> Element {
    let header = Element::new("div").class("calendar-weekdays").children(
        WEEKDAY_LABELS
            .iter()
            .map(|label| Element::new("div").class("calendar-weekday").text(*label)),
    );

    let days = Element::new("div")
        .class("calendar-days")
        .children(grid.cells.iter().map(render_cell));

    Element::new("div")
        .class("calendar")
        .child(
            Element::new("div")
                .class("calendar-header")
                .child(Element::new("h3").class("calendar-month").text(grid.label())),
        )
        .child(header)
        .child(days)
}

fn render_cell(cell: &DayCell) -> Element {
    match cell.kind {
        CellKind::Padding => Element::new("div")
            .class("calendar-day")
            .class("other-month")
            .text(cell.day.to_string()),
        CellKind::Current => Element::new("div")
            .class("calendar-day")
            .class_if(cell.is_today, "today")
            .class_if(cell.is_selected, "active")
            .class_if(cell.has_missed_dose, "missed")
            .attr("data-day", cell.day.to_string())
            .text(cell.day.to_string()),
    }
}
