//! Resolve a click inside the calendar grid to a concrete date and hour.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::event::{Hour, parse_date};
use crate::calendar::view::CalendarViewState;
use crate::error::{WorldboardError, WorldboardResult};

/// One element on the path from the click target up to the grid root,
/// described by the cell semantics it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellElement {
    /// Intersection of a day column and an hour row in the week view.
    WeekCell { date: String, hour: String },
    /// A day in the month view. Blank padding cells have no date.
    MonthCell { date: Option<String> },
    /// Day header of a week-view column.
    WeekDay { date: String },
    /// Hour label at the start of a week-view row.
    WeekHour {
        hour: Option<String>,
        #[serde(default)]
        text: String,
    },
    /// Anything else (chip text, padding, wrappers).
    Other,
}

/// The click target followed by its ancestors, innermost first.
pub type ClickPath = Vec<CellElement>;

/// A grid position the quick-adder can be opened at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    pub date: NaiveDate,
    pub hour: Option<Hour>,
}

/// Walk up from the target to the nearest element with cell semantics.
///
/// Returns `Ok(None)` when the click did not land in any cell. Hour labels
/// span a whole row, so their date comes from the selected day. A cell with
/// an unparseable date or hour is an error and nothing should be opened.
pub fn resolve_cell(path: &[CellElement], state: &CalendarViewState) -> WorldboardResult<Option<CellRef>> {
    for element in path {
        let resolved = match element {
            CellElement::Other => continue,
            CellElement::WeekCell { date, hour } => CellRef {
                date: cell_date(date)?,
                hour: cell_hour(hour)?,
            },
            CellElement::MonthCell { date } => CellRef {
                date: cell_date(date.as_deref().unwrap_or(""))?,
                hour: None,
            },
            CellElement::WeekDay { date } => CellRef {
                date: cell_date(date)?,
                hour: None,
            },
            CellElement::WeekHour { hour, text } => {
                let hour = match hour {
                    Some(h) => h.clone(),
                    None => leading_digits(text),
                };
                CellRef {
                    date: state.selected_date(),
                    hour: cell_hour(&hour)?,
                }
            }
        };
        return Ok(Some(resolved));
    }

    Ok(None)
}

fn cell_date(raw: &str) -> WorldboardResult<NaiveDate> {
    parse_date(raw).map_err(|_| {
        tracing::error!(date = raw, "invalid date extracted from calendar cell");
        WorldboardError::InvalidCell(format!("unparseable date '{raw}'"))
    })
}

fn cell_hour(raw: &str) -> WorldboardResult<Option<Hour>> {
    Hour::parse_optional(raw).map_err(|_| {
        tracing::error!(hour = raw, "invalid hour extracted from calendar cell");
        WorldboardError::InvalidCell(format!("unparseable hour '{raw}'"))
    })
}

/// "07:00" → "07"
fn leading_digits(text: &str) -> String {
    text.trim().chars().take_while(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> CalendarViewState {
        CalendarViewState::new(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap())
    }

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn chip_click_resolves_to_enclosing_week_cell() {
        let path = vec![
            CellElement::Other,
            CellElement::Other,
            CellElement::WeekCell {
                date: "2024-03-05".into(),
                hour: "14".into(),
            },
        ];
        let cell = resolve_cell(&path, &state()).unwrap().unwrap();
        assert_eq!(cell.date, date("2024-03-05"));
        assert_eq!(cell.hour, Hour::new(14));
    }

    #[test]
    fn day_header_has_no_hour() {
        let path = vec![CellElement::WeekDay {
            date: "2024-03-06".into(),
        }];
        let cell = resolve_cell(&path, &state()).unwrap().unwrap();
        assert_eq!(cell, CellRef { date: date("2024-03-06"), hour: None });
    }

    #[test]
    fn hour_label_uses_selected_day() {
        let path = vec![CellElement::WeekHour {
            hour: None,
            text: "09:00".into(),
        }];
        let cell = resolve_cell(&path, &state()).unwrap().unwrap();
        assert_eq!(cell.date, date("2024-03-07"));
        assert_eq!(cell.hour, Hour::new(9));
    }

    #[test]
    fn click_outside_cells_is_ignored() {
        assert_eq!(resolve_cell(&[CellElement::Other], &state()).unwrap(), None);
        assert_eq!(resolve_cell(&[], &state()).unwrap(), None);
    }

    #[test]
    fn blank_month_cell_is_an_error() {
        let path = vec![CellElement::MonthCell { date: None }];
        assert!(matches!(
            resolve_cell(&path, &state()),
            Err(WorldboardError::InvalidCell(_))
        ));
    }

    #[test]
    fn malformed_date_is_an_error() {
        let path = vec![CellElement::WeekCell {
            date: "2024-13-45".into(),
            hour: "9".into(),
        }];
        assert!(resolve_cell(&path, &state()).is_err());
    }
}
