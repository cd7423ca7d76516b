//! Event entry forms: the full event modal and the quick-adder popup.

use serde::{Deserialize, Serialize};

use crate::calendar::cell::CellRef;
use crate::calendar::event::{CalendarEvent, EventDraft, Hour, parse_date};
use crate::calendar::popup::{Point, quick_adder_position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Title,
    Calendar,
    Date,
    Hour,
    Link,
    Desc,
}

fn set_draft_field(draft: &mut EventDraft, field: FormField, value: &str) {
    let slot = match field {
        FormField::Title => &mut draft.title,
        FormField::Calendar => &mut draft.calendar,
        FormField::Date => &mut draft.date,
        FormField::Hour => &mut draft.hour,
        FormField::Link => &mut draft.link,
        FormField::Desc => &mut draft.desc,
    };
    *slot = value.to_string();
}

fn prefill(date: Option<chrono::NaiveDate>, hour: Option<Hour>) -> (String, String) {
    (
        date.map(|d| d.to_string()).unwrap_or_default(),
        hour.map(|h| h.to_string()).unwrap_or_default(),
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", content = "event_id", rename_all = "snake_case")]
pub enum ModalMode {
    Create,
    Edit(String),
}

/// The full create/edit form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventModal {
    pub mode: ModalMode,
    pub draft: EventDraft,
    /// Inline validation message from the last failed submit.
    pub error: Option<String>,
}

impl EventModal {
    /// Empty form, optionally pre-filled with a date and hour.
    pub fn create(date: Option<chrono::NaiveDate>, hour: Option<Hour>, calendar: &str) -> Self {
        let (date, hour) = prefill(date, hour);
        EventModal {
            mode: ModalMode::Create,
            draft: EventDraft {
                calendar: calendar.to_string(),
                date,
                hour,
                ..EventDraft::default()
            },
            error: None,
        }
    }

    /// Form pre-filled from an existing event.
    pub fn edit(event: &CalendarEvent) -> Self {
        EventModal {
            mode: ModalMode::Edit(event.id.clone()),
            draft: EventDraft {
                title: event.title.clone(),
                calendar: event.calendar.clone(),
                date: event.date.to_string(),
                hour: event.hour.map(|h| h.to_string()).unwrap_or_default(),
                link: event.link.clone().unwrap_or_default(),
                desc: event.desc.clone().unwrap_or_default(),
            },
            error: None,
        }
    }

    pub fn heading(&self) -> &'static str {
        match self.mode {
            ModalMode::Create => "New Event",
            ModalMode::Edit(_) => "Edit Event",
        }
    }

    /// Only existing events can be deleted from the modal.
    pub fn can_delete(&self) -> bool {
        matches!(self.mode, ModalMode::Edit(_))
    }

    pub fn set_field(&mut self, field: FormField, value: &str) {
        set_draft_field(&mut self.draft, field, value);
    }
}

/// Inline creation popup anchored where the grid was clicked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickAdder {
    pub position: Point,
    pub origin: CellRef,
    pub draft: EventDraft,
    /// Summary of the entered fields, `None` while everything is empty.
    pub preview: Option<String>,
    pub error: Option<String>,
}

impl QuickAdder {
    pub fn open(origin: CellRef, pointer: Point) -> Self {
        let (date, hour) = prefill(Some(origin.date), origin.hour);
        let mut adder = QuickAdder {
            position: quick_adder_position(pointer),
            origin,
            draft: EventDraft {
                date,
                hour,
                ..EventDraft::default()
            },
            preview: None,
            error: None,
        };
        adder.refresh_preview();
        adder
    }

    /// Update one field and recompute the live preview.
    pub fn set_field(&mut self, field: FormField, value: &str) {
        set_draft_field(&mut self.draft, field, value);
        self.refresh_preview();
    }

    /// Draft to save, assigned to `calendar`.
    pub fn draft_for(&self, calendar: &str) -> EventDraft {
        EventDraft {
            calendar: calendar.to_string(),
            ..self.draft.clone()
        }
    }

    /// Open the full modal with the date and hour entered so far.
    pub fn escalate(&self, calendar: &str) -> EventModal {
        let date = parse_date(self.draft.date.trim()).ok();
        let hour = Hour::parse_optional(&self.draft.hour).ok().flatten();
        let mut modal = EventModal::create(date, hour, calendar);
        modal.draft.title = self.draft.title.trim().to_string();
        modal.draft.link = self.draft.link.trim().to_string();
        modal.draft.desc = self.draft.desc.trim().to_string();
        modal
    }

    fn refresh_preview(&mut self) {
        self.preview = preview(&self.draft);
    }
}

fn preview(draft: &EventDraft) -> Option<String> {
    let title = draft.title.trim();
    let date = draft.date.trim();
    let hour = draft.hour.trim();
    let link = draft.link.trim();
    let desc = draft.desc.trim();

    if [title, date, hour, link, desc].iter().all(|s| s.is_empty()) {
        return None;
    }

    let mut lines = vec![if title.is_empty() { "(No title)" } else { title }.to_string()];

    let when = match (date.is_empty(), hour.parse::<u32>()) {
        (false, Ok(h)) => format!("{date} {h:02}:00"),
        (true, Ok(h)) => format!("{h:02}:00"),
        (false, Err(_)) => date.to_string(),
        (true, Err(_)) => String::new(),
    };
    if !when.is_empty() {
        lines.push(when);
    }
    if !link.is_empty() {
        lines.push(link.to_string());
    }
    if !desc.is_empty() {
        lines.push(desc.to_string());
    }

    Some(lines.join("\n"))
}
