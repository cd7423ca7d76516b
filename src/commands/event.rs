use anyhow::Result;
use dialoguer::{Confirm, Input};
use owo_colors::OwoColorize;
use worldboard_core::Dashboard;
use worldboard_core::calendar::{CalendarAction, FormField, parse_date};

use crate::commands::{open_dashboard, today};
use crate::render::Render;

/// Event fields given on the command line. `None` leaves a field as it is.
pub struct EventFields {
    pub title: Option<String>,
    pub date: Option<String>,
    pub hour: Option<String>,
    pub link: Option<String>,
    pub desc: Option<String>,
    pub calendar: Option<String>,
}

impl EventFields {
    fn changes(self) -> Vec<(FormField, String)> {
        [
            (FormField::Title, self.title),
            (FormField::Date, self.date),
            (FormField::Hour, self.hour),
            (FormField::Link, self.link),
            (FormField::Desc, self.desc),
            (FormField::Calendar, self.calendar),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}

fn fill_form(dashboard: &mut Dashboard, fields: EventFields) -> Result<()> {
    for (field, value) in fields.changes() {
        dashboard.calendar_action(CalendarAction::SetField { field, value }, today())?;
    }
    Ok(())
}

pub fn list(date: Option<String>) -> Result<()> {
    let dashboard = open_dashboard()?;
    let date = date.as_deref().map(parse_date).transpose()?;

    let mut events: Vec<_> = dashboard
        .calendar()
        .events()
        .iter()
        .filter(|e| date.is_none_or(|d| e.date == d))
        .collect();
    events.sort_by_key(|e| (e.date, e.hour));

    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }
    for event in events {
        println!("  {}", event.render());
    }
    Ok(())
}

pub fn add(mut fields: EventFields) -> Result<()> {
    let interactive = fields.title.is_none();
    if interactive {
        fields.title = Some(Input::<String>::new().with_prompt("  Title").interact_text()?);
    }
    if fields.date.is_none() {
        fields.date = Some(today().to_string());
    }

    let mut dashboard = open_dashboard()?;
    dashboard.calendar_action(CalendarAction::OpenCreate, today())?;
    fill_form(&mut dashboard, fields)?;
    dashboard.calendar_action(CalendarAction::SubmitModal, today())?;

    if interactive {
        println!();
    }
    if let Some(event) = dashboard.calendar().events().last() {
        println!("{}", format!("  Created: {} ({})", event.display_title(), event.when()).green());
    }
    Ok(())
}

pub fn edit(id: String, fields: EventFields) -> Result<()> {
    let mut dashboard = open_dashboard()?;
    dashboard.calendar_action(CalendarAction::OpenEdit { event_id: id.clone() }, today())?;
    fill_form(&mut dashboard, fields)?;
    dashboard.calendar_action(CalendarAction::SubmitModal, today())?;

    if let Some(event) = dashboard.calendar().events().iter().find(|e| e.id == id) {
        println!("{}", format!("  Updated: {} ({})", event.display_title(), event.when()).yellow());
    }
    Ok(())
}

pub fn delete(id: String, yes: bool) -> Result<()> {
    let mut dashboard = open_dashboard()?;
    dashboard.calendar_action(CalendarAction::OpenEdit { event_id: id.clone() }, today())?;

    let title = dashboard
        .calendar()
        .events()
        .iter()
        .find(|e| e.id == id)
        .map(|e| e.display_title().to_string())
        .unwrap_or_default();

    if !yes
        && !Confirm::new()
            .with_prompt(format!("  Delete \"{title}\"?"))
            .default(false)
            .interact()?
    {
        println!("{}", "  Cancelled".dimmed());
        return Ok(());
    }

    dashboard.calendar_action(CalendarAction::DeleteEvent, today())?;
    println!("{}", format!("  Deleted: {title}").red());
    Ok(())
}
