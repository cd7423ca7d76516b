//! Grid models for the mini-month, week and month views.
//!
//! These are plain data: the HTML renderer and the terminal renderer both
//! draw from them, and tests can inspect them without any rendering surface.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::calendar::definition::CalendarList;
use crate::calendar::event::{CalendarEvent, Hour};
use crate::calendar::view::{CalendarViewState, days_in_month, first_of_month};
use crate::constants::GRID_SLOTS;

pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// An event as drawn inside a grid cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chip {
    pub id: String,
    pub title: String,
    pub color: String,
    pub link: Option<String>,
}

impl Chip {
    fn from_event(event: &CalendarEvent, calendars: &CalendarList) -> Self {
        Chip {
            id: event.id.clone(),
            title: event.display_title().to_string(),
            color: calendars.color_of(&event.calendar).to_string(),
            link: event.link.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MiniDay {
    pub day: u32,
    pub is_today: bool,
    pub is_selected: bool,
}

/// Sidebar month: 42 Monday-first slots, blanks before the 1st and after the last day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MiniMonth {
    pub year: i32,
    pub month: u32,
    pub slots: Vec<Option<MiniDay>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekDayColumn {
    pub date: NaiveDate,
    pub label: &'static str,
    pub is_today: bool,
    /// Unscheduled events of the day, drawn in the day header.
    pub all_day: Vec<Chip>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourRow {
    pub hour: Hour,
    /// One cell per day column, Monday first.
    pub cells: Vec<Vec<Chip>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekGrid {
    pub days: Vec<WeekDayColumn>,
    pub rows: Vec<HourRow>,
}

impl WeekGrid {
    pub fn cell(&self, date: NaiveDate, hour: Hour) -> Option<&[Chip]> {
        let column = self.days.iter().position(|d| d.date == date)?;
        let row = self.rows.iter().find(|r| r.hour == hour)?;
        Some(&row.cells[column])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthCell {
    pub date: NaiveDate,
    pub is_today: bool,
    pub chips: Vec<Chip>,
}

/// 6×7 month grid, Monday first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<Option<MonthCell>>,
}

impl MonthGrid {
    pub fn cell(&self, date: NaiveDate) -> Option<&MonthCell> {
        self.cells.iter().flatten().find(|c| c.date == date)
    }
}

/// Day numbers laid out over 42 slots so the 1st sits under its weekday.
fn month_slots(year: i32, month: u32) -> Vec<Option<u32>> {
    let offset = first_of_month(year, month).weekday().num_days_from_monday() as usize;
    let days = days_in_month(year, month) as usize;

    (0..GRID_SLOTS)
        .map(|i| (i >= offset && i < offset + days).then(|| (i - offset + 1) as u32))
        .collect()
}

pub fn mini_month(state: &CalendarViewState, today: NaiveDate) -> MiniMonth {
    let is_current_month = today.year() == state.year && today.month() == state.month;

    let slots = month_slots(state.year, state.month)
        .into_iter()
        .map(|slot| {
            slot.map(|day| MiniDay {
                day,
                is_today: is_current_month && today.day() == day,
                is_selected: state.selected_day == day,
            })
        })
        .collect();

    MiniMonth {
        year: state.year,
        month: state.month,
        slots,
    }
}

fn visible<'a>(
    events: &'a [CalendarEvent],
    calendars: &'a CalendarList,
) -> impl Iterator<Item = &'a CalendarEvent> {
    events.iter().filter(|e| calendars.is_visible(&e.calendar))
}

pub fn week_grid(
    state: &CalendarViewState,
    events: &[CalendarEvent],
    calendars: &CalendarList,
    today: NaiveDate,
) -> WeekGrid {
    let dates = state.week_days();

    let days = dates
        .iter()
        .zip(WEEKDAY_LABELS)
        .map(|(&date, label)| WeekDayColumn {
            date,
            label,
            is_today: date == today,
            all_day: visible(events, calendars)
                .filter(|e| e.date == date && e.hour.is_none())
                .map(|e| Chip::from_event(e, calendars))
                .collect(),
        })
        .collect();

    let rows = Hour::all()
        .map(|hour| HourRow {
            hour,
            cells: dates
                .iter()
                .map(|&date| {
                    visible(events, calendars)
                        .filter(|e| e.date == date && e.hour == Some(hour))
                        .map(|e| Chip::from_event(e, calendars))
                        .collect()
                })
                .collect(),
        })
        .collect();

    WeekGrid { days, rows }
}

pub fn month_grid(
    state: &CalendarViewState,
    events: &[CalendarEvent],
    calendars: &CalendarList,
    today: NaiveDate,
) -> MonthGrid {
    let cells = month_slots(state.year, state.month)
        .into_iter()
        .map(|slot| {
            let date = NaiveDate::from_ymd_opt(state.year, state.month, slot?)?;
            Some(MonthCell {
                date,
                is_today: date == today,
                chips: visible(events, calendars)
                    .filter(|e| e.date == date)
                    .map(|e| Chip::from_event(e, calendars))
                    .collect(),
            })
        })
        .collect();

    MonthGrid {
        year: state.year,
        month: state.month,
        cells,
    }
}
