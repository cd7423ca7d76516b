//! HTML for the three calendar regions: sidebar, header and main.
//!
//! Each function rebuilds its region from scratch, so rendering the same
//! state twice gives identical markup.

use std::fmt::Write;

use chrono::{Datelike, Duration};

use crate::calendar::definition::CalendarList;
use crate::calendar::grid::{Chip, MiniMonth, MonthGrid, WEEKDAY_LABELS, WeekGrid};
use crate::calendar::view::{CalendarViewState, ViewMode};

/// Escape text for use in element content and quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Header label: `YYYY. MM. DD - YYYY. MM. DD` for a week, `YYYY. MM` for a month.
pub fn header_label(state: &CalendarViewState) -> String {
    match state.view {
        ViewMode::Week => {
            let start = state.week_start;
            let end = start + Duration::days(6);
            format!(
                "{}. {:02}. {:02} - {}. {:02}. {:02}",
                start.year(),
                start.month(),
                start.day(),
                end.year(),
                end.month(),
                end.day()
            )
        }
        ViewMode::Month => format!("{}. {:02}", state.year, state.month),
    }
}

pub fn render_sidebar(mini: &MiniMonth, calendars: &CalendarList) -> String {
    let mut html = String::new();

    let _ = write!(
        html,
        r#"<div class="mini-month"><div class="mini-header"><button id="mini-prev" class="mini-nav">&#8592;</button><span>{}. {:02}</span><button id="mini-next" class="mini-nav">&#8594;</button></div><div class="mini-grid">"#,
        mini.year, mini.month
    );
    for label in WEEKDAY_LABELS {
        let _ = write!(html, "<div>{label}</div>");
    }
    for slot in &mini.slots {
        match slot {
            None => html.push_str("<div></div>"),
            Some(day) => {
                let _ = write!(
                    html,
                    r#"<div class="mini-day{}{}" data-day="{}">{}</div>"#,
                    if day.is_today { " mini-today" } else { "" },
                    if day.is_selected { " mini-selected" } else { "" },
                    day.day,
                    day.day
                );
            }
        }
    }
    html.push_str("</div></div>");

    html.push_str(r#"<div class="calendar-list">"#);
    for cal in calendars.iter() {
        let _ = write!(
            html,
            r#"<label class="calendar-checkbox"><input type="checkbox" data-cal="{}"{}><span class="cal-color" style="background:{}"></span>{}</label>"#,
            escape_html(&cal.id),
            if cal.checked { " checked" } else { "" },
            escape_html(&cal.color),
            escape_html(&cal.name)
        );
    }
    html.push_str("</div>");
    html.push_str(r#"<button id="sidebar-create-btn" class="sidebar-create">+ Create</button>"#);

    html
}

pub fn render_header(state: &CalendarViewState) -> String {
    let active = |mode: ViewMode| if state.view == mode { "active" } else { "" };

    format!(
        r#"<button id="cal-today" class="cal-nav">Today</button><button id="cal-prev" class="cal-nav">&#8592;</button><span class="cal-label">{}</span><button id="cal-next" class="cal-nav">&#8594;</button><div class="cal-view-switch"><button id="view-week" class="{}">Week</button><button id="view-month" class="{}">Month</button></div>"#,
        header_label(state),
        active(ViewMode::Week),
        active(ViewMode::Month)
    )
}

fn render_chip(html: &mut String, chip: &Chip) {
    let color = escape_html(&chip.color);
    let link = chip.link.as_deref().map(escape_html).unwrap_or_default();

    let _ = write!(
        html,
        r#"<div class="event-chip" style="background:{color}20" data-id="{}" title="{link}"><span class="chip-bar" style="background:{color}"></span><span class="chip-title">{}"#,
        escape_html(&chip.id),
        escape_html(&chip.title)
    );
    if !link.is_empty() {
        let _ = write!(
            html,
            r#"<a href="{link}" target="_blank" title="Open link">&#128279;</a>"#
        );
    }
    html.push_str("</span></div>");
}

pub fn render_week(grid: &WeekGrid) -> String {
    let mut html = String::from(r#"<div class="week-header"><div class="week-hour-header"></div>"#);

    for day in &grid.days {
        let _ = write!(
            html,
            r#"<div class="week-day{}" data-date="{}"><div class="week-day-label">{}</div><div class="week-day-num">{}</div>"#,
            if day.is_today { " week-today" } else { "" },
            day.date,
            day.label,
            day.date.day()
        );
        if !day.all_day.is_empty() {
            html.push_str(r#"<div class="week-all-day">"#);
            for chip in &day.all_day {
                render_chip(&mut html, chip);
            }
            html.push_str("</div>");
        }
        html.push_str("</div>");
    }
    html.push_str("</div>");

    html.push_str(r#"<div class="week-grid">"#);
    for row in &grid.rows {
        let _ = write!(
            html,
            r#"<div class="week-hour" data-hour="{}">{}</div>"#,
            row.hour,
            row.hour.label()
        );
        for (day, cell) in grid.days.iter().zip(&row.cells) {
            let _ = write!(
                html,
                r#"<div class="week-cell" data-date="{}" data-hour="{}">"#,
                day.date, row.hour
            );
            for chip in cell {
                render_chip(&mut html, chip);
            }
            html.push_str("</div>");
        }
    }
    html.push_str("</div>");

    html
}

pub fn render_month(grid: &MonthGrid) -> String {
    let mut html = String::from(r#"<div class="month-grid">"#);

    for cell in &grid.cells {
        match cell {
            None => html.push_str(r#"<div class="month-cell"></div>"#),
            Some(cell) => {
                let _ = write!(
                    html,
                    r#"<div class="month-cell{}" data-date="{}">{}<div class="month-events">"#,
                    if cell.is_today { " month-today" } else { "" },
                    cell.date,
                    cell.date.day()
                );
                for chip in &cell.chips {
                    render_chip(&mut html, chip);
                }
                html.push_str("</div></div>");
            }
        }
    }
    html.push_str("</div>");

    html
}
