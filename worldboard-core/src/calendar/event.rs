//! Calendar events and the drafts they are created from.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{FIRST_HOUR, LAST_HOUR};
use crate::error::{WorldboardError, WorldboardResult};

/// An hour row of the week grid (07..=22).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Hour(u32);

impl TryFrom<u32> for Hour {
    type Error = String;

    fn try_from(hour: u32) -> Result<Self, Self::Error> {
        Hour::new(hour).ok_or_else(|| format!("hour out of range: {hour}"))
    }
}

impl From<Hour> for u32 {
    fn from(hour: Hour) -> u32 {
        hour.0
    }
}

impl Hour {
    pub fn new(hour: u32) -> Option<Self> {
        (FIRST_HOUR..=LAST_HOUR).contains(&hour).then_some(Hour(hour))
    }

    /// Parse the optional hour of a form field or stored event.
    /// Empty input means "unscheduled"; "9" and "09" are the same hour.
    pub fn parse_optional(s: &str) -> WorldboardResult<Option<Self>> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(None);
        }

        s.parse::<u32>()
            .ok()
            .and_then(Hour::new)
            .map(Some)
            .ok_or_else(|| {
                WorldboardError::Validation(format!(
                    "Hour must be between {FIRST_HOUR} and {LAST_HOUR}, got '{s}'"
                ))
            })
    }

    /// All hour rows of the week grid, in order.
    pub fn all() -> impl Iterator<Item = Hour> {
        (FIRST_HOUR..=LAST_HOUR).map(Hour)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// `HH:00` label used by the grid and the hour pickers.
    pub fn label(self) -> String {
        format!("{:02}:00", self.0)
    }
}

impl fmt::Display for Hour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored hours are strings: `""` for unscheduled, `"7"`..`"22"` otherwise.
mod hour_field {
    use super::Hour;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u32),
        Null(()),
    }

    pub fn serialize<S: Serializer>(hour: &Option<Hour>, s: S) -> Result<S::Ok, S::Error> {
        match hour {
            Some(h) => s.serialize_str(&h.to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Hour>, D::Error> {
        match Raw::deserialize(d)? {
            Raw::Text(text) => Hour::parse_optional(&text).map_err(D::Error::custom),
            Raw::Number(n) => Hour::new(n)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("hour out of range: {n}"))),
            Raw::Null(()) => Ok(None),
        }
    }
}

/// A calendar event as persisted under `calendarEvents`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    /// Id of the owning calendar.
    pub calendar: String,
    pub date: NaiveDate,
    #[serde(with = "hour_field", default)]
    pub hour: Option<Hour>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

impl CalendarEvent {
    pub fn from_draft(id: String, draft: ValidDraft) -> Self {
        CalendarEvent {
            id,
            title: draft.title,
            calendar: draft.calendar,
            date: draft.date,
            hour: draft.hour,
            link: draft.link,
            desc: draft.desc,
        }
    }

    /// Overwrite every user-editable field with the draft's values.
    pub fn apply(&mut self, draft: ValidDraft) {
        self.title = draft.title;
        self.calendar = draft.calendar;
        self.date = draft.date;
        self.hour = draft.hour;
        self.link = draft.link;
        self.desc = draft.desc;
    }

    /// `YYYY-MM-DD` or `YYYY-MM-DD HH:00`
    pub fn when(&self) -> String {
        match self.hour {
            Some(hour) => format!("{} {}", self.date, hour.label()),
            None => self.date.to_string(),
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() { "(No title)" } else { &self.title }
    }
}

impl fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_title())
    }
}

/// Raw form input for creating or editing an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub calendar: String,
    pub date: String,
    #[serde(default)]
    pub hour: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub desc: String,
}

/// A draft that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDraft {
    pub title: String,
    pub calendar: String,
    pub date: NaiveDate,
    pub hour: Option<Hour>,
    pub link: Option<String>,
    pub desc: Option<String>,
}

impl EventDraft {
    /// Check required fields and normalize the rest.
    /// A missing title is rejected, never defaulted.
    pub fn validate(&self) -> WorldboardResult<ValidDraft> {
        let title = self.title.trim();
        let date = self.date.trim();

        if title.is_empty() || date.is_empty() {
            return Err(WorldboardError::Validation(
                "Title and date are required.".into(),
            ));
        }

        let date = parse_date(date)?;
        let hour = Hour::parse_optional(&self.hour)?;

        Ok(ValidDraft {
            title: title.to_string(),
            calendar: self.calendar.trim().to_string(),
            date,
            hour,
            link: non_empty(&self.link),
            desc: non_empty(&self.desc),
        })
    }
}

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> WorldboardResult<NaiveDate> {
    let well_formed = s.len() == 10
        && s.char_indices().all(|(i, c)| match i {
            4 | 7 => c == '-',
            _ => c.is_ascii_digit(),
        });

    if !well_formed {
        return Err(WorldboardError::Validation(format!(
            "Invalid date '{s}'. Expected YYYY-MM-DD"
        )));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| WorldboardError::Validation(format!("Invalid date '{s}'")))
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}
