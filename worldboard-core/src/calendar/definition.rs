//! Calendars that events belong to, and their visibility toggles.

use serde::{Deserialize, Serialize};

/// Chip colour used when an event points at an unknown calendar.
pub const FALLBACK_COLOR: &str = "#00e6ff";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDefinition {
    pub id: String,
    pub name: String,
    pub color: String,
    pub checked: bool,
}

/// The fixed set of calendars. There is no way to add or remove one at runtime.
/// Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarList {
    calendars: Vec<CalendarDefinition>,
}

impl Default for CalendarList {
    fn default() -> Self {
        CalendarList {
            calendars: vec![CalendarDefinition {
                id: "default".into(),
                name: "Default".into(),
                color: FALLBACK_COLOR.into(),
                checked: true,
            }],
        }
    }
}

impl CalendarList {
    /// Build a list from explicit definitions. Falls back to the default list when empty.
    pub fn new(calendars: Vec<CalendarDefinition>) -> Self {
        if calendars.is_empty() {
            return Self::default();
        }
        CalendarList { calendars }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CalendarDefinition> {
        self.calendars.iter()
    }

    pub fn get(&self, id: &str) -> Option<&CalendarDefinition> {
        self.calendars.iter().find(|c| c.id == id)
    }

    /// Set visibility of a calendar. Returns false if the id is unknown.
    pub fn set_checked(&mut self, id: &str, checked: bool) -> bool {
        match self.calendars.iter_mut().find(|c| c.id == id) {
            Some(cal) => {
                cal.checked = checked;
                true
            }
            None => false,
        }
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.get(id).is_some_and(|c| c.checked)
    }

    pub fn color_of(&self, id: &str) -> &str {
        self.get(id).map(|c| c.color.as_str()).unwrap_or(FALLBACK_COLOR)
    }

    /// Calendar used by the quick-adder: first visible one, else the first one.
    pub fn first_checked_or_default(&self) -> &CalendarDefinition {
        self.calendars
            .iter()
            .find(|c| c.checked)
            .unwrap_or(&self.calendars[0])
    }
}
