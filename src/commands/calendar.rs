use anyhow::Result;
use owo_colors::OwoColorize;
use worldboard_core::calendar::{CalendarAction, NavAction, ViewMode, render::header_label};

use crate::commands::{open_dashboard, today};
use crate::render::Render;

/// Print the week (or month) around today, shifted by `shift` periods.
pub fn run(month: bool, shift: i32) -> Result<()> {
    let mut dashboard = open_dashboard()?;
    let today = today();

    if month {
        dashboard.calendar_action(nav(NavAction::ShowMonth), today)?;
    }
    let step = if shift < 0 { NavAction::Prev } else { NavAction::Next };
    for _ in 0..shift.unsigned_abs() {
        dashboard.calendar_action(nav(step), today)?;
    }

    let calendar = dashboard.calendar();
    println!("{}", header_label(calendar.state()).bold());
    println!();
    match calendar.state().view {
        ViewMode::Week => {
            let grid = calendar.week_grid(today);
            let busy = grid.days.iter().any(|d| !d.all_day.is_empty())
                || grid.rows.iter().any(|r| r.cells.iter().any(|c| !c.is_empty()));
            println!("{}", grid.render());
            if !busy {
                println!("{}", "No events this week".dimmed());
            }
        }
        ViewMode::Month => println!("{}", calendar.month_grid(today).render()),
    }
    println!();
    println!("{}", calendar.calendars().render());

    Ok(())
}

fn nav(nav: NavAction) -> CalendarAction {
    CalendarAction::Nav { nav }
}
