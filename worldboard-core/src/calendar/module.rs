//! The calendar controller: view state, popups and the event book behind
//! one dispatch entry point.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::book::EventBook;
use crate::calendar::cell::{ClickPath, resolve_cell};
use crate::calendar::definition::CalendarList;
use crate::calendar::event::CalendarEvent;
use crate::calendar::forms::{EventModal, FormField, ModalMode, QuickAdder};
use crate::calendar::grid::{MiniMonth, MonthGrid, WeekGrid, mini_month, month_grid, week_grid};
use crate::calendar::popup::{EventOverlay, Point, Rect, Viewport};
use crate::calendar::render;
use crate::calendar::view::{CalendarViewState, NavAction, ViewMode};
use crate::error::{WorldboardError, WorldboardResult};
use crate::store::KeyValueStore;

/// At most one calendar popup is open at a time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalendarPopup {
    QuickAdder(QuickAdder),
    Modal(EventModal),
    Overlay(EventOverlay),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalendarAction {
    Nav {
        nav: NavAction,
    },
    ToggleCalendar {
        id: String,
        checked: bool,
    },
    /// Click inside the main grid.
    CellClick {
        path: ClickPath,
        pointer: Point,
    },
    /// Click on an event chip.
    ChipClick {
        event_id: String,
        anchor: Rect,
        #[serde(default)]
        viewport: Viewport,
    },
    /// Sidebar "+ Create".
    OpenCreate,
    OpenEdit {
        event_id: String,
    },
    /// Change a field of the open quick-adder or modal.
    SetField {
        field: FormField,
        value: String,
    },
    SaveQuick,
    Escalate,
    SubmitModal,
    DeleteEvent,
    ClosePopup,
}

/// Rendered markup of the three calendar regions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarHtml {
    pub sidebar: String,
    pub header: String,
    pub main: String,
}

/// Calendar controller. Every change goes through [`CalendarModule::dispatch`].
pub struct CalendarModule {
    state: CalendarViewState,
    calendars: CalendarList,
    book: EventBook,
    popup: Option<CalendarPopup>,
}

impl CalendarModule {
    pub fn new(store: Arc<dyn KeyValueStore>, calendars: CalendarList, today: NaiveDate) -> Self {
        CalendarModule {
            state: CalendarViewState::new(today),
            calendars,
            book: EventBook::load(store),
            popup: None,
        }
    }

    pub fn state(&self) -> &CalendarViewState {
        &self.state
    }

    pub fn calendars(&self) -> &CalendarList {
        &self.calendars
    }

    pub fn events(&self) -> &[CalendarEvent] {
        self.book.events()
    }

    /// Pick up events written by other sessions.
    pub fn reload(&mut self) {
        self.book.reload();
    }

    pub fn popup(&self) -> Option<&CalendarPopup> {
        self.popup.as_ref()
    }

    /// Close whatever popup is open. Returns false if none was.
    pub fn close_popup(&mut self) -> bool {
        self.popup.take().is_some()
    }

    pub fn mini_month(&self, today: NaiveDate) -> MiniMonth {
        mini_month(&self.state, today)
    }

    pub fn week_grid(&self, today: NaiveDate) -> WeekGrid {
        week_grid(&self.state, self.book.events(), &self.calendars, today)
    }

    pub fn month_grid(&self, today: NaiveDate) -> MonthGrid {
        month_grid(&self.state, self.book.events(), &self.calendars, today)
    }

    pub fn render(&self, today: NaiveDate) -> CalendarHtml {
        let main = match self.state.view {
            ViewMode::Week => render::render_week(&self.week_grid(today)),
            ViewMode::Month => render::render_month(&self.month_grid(today)),
        };
        CalendarHtml {
            sidebar: render::render_sidebar(&self.mini_month(today), &self.calendars),
            header: render::render_header(&self.state),
            main,
        }
    }

    /// Apply one user action.
    ///
    /// Validation failures are recorded on the open form and returned; the
    /// event collection is left untouched.
    pub fn dispatch(&mut self, action: CalendarAction, today: NaiveDate) -> WorldboardResult<()> {
        match action {
            CalendarAction::Nav { nav } => {
                self.state = self.state.apply(nav, today);
            }
            CalendarAction::ToggleCalendar { id, checked } => {
                if !self.calendars.set_checked(&id, checked) {
                    return Err(WorldboardError::NotFound(format!("calendar '{id}'")));
                }
            }
            CalendarAction::CellClick { path, pointer } => {
                if let Some(cell) = resolve_cell(&path, &self.state)? {
                    self.popup = Some(CalendarPopup::QuickAdder(QuickAdder::open(cell, pointer)));
                }
            }
            CalendarAction::ChipClick {
                event_id,
                anchor,
                viewport,
            } => {
                let event = self.find(&event_id)?;
                self.popup = Some(CalendarPopup::Overlay(EventOverlay::new(event, anchor, viewport)));
            }
            CalendarAction::OpenCreate => {
                let calendar = self.default_calendar();
                self.popup = Some(CalendarPopup::Modal(EventModal::create(None, None, &calendar)));
            }
            CalendarAction::OpenEdit { event_id } => {
                let modal = EventModal::edit(self.find(&event_id)?);
                self.popup = Some(CalendarPopup::Modal(modal));
            }
            CalendarAction::SetField { field, value } => match &mut self.popup {
                Some(CalendarPopup::QuickAdder(adder)) => adder.set_field(field, &value),
                Some(CalendarPopup::Modal(modal)) => modal.set_field(field, &value),
                _ => tracing::debug!(?field, "field change with no open form"),
            },
            CalendarAction::SaveQuick => self.save_quick()?,
            CalendarAction::Escalate => {
                if let Some(CalendarPopup::QuickAdder(adder)) = &self.popup {
                    let modal = adder.escalate(&self.first_checked());
                    self.popup = Some(CalendarPopup::Modal(modal));
                }
            }
            CalendarAction::SubmitModal => self.submit_modal()?,
            CalendarAction::DeleteEvent => {
                if let Some(CalendarPopup::Modal(EventModal {
                    mode: ModalMode::Edit(id),
                    ..
                })) = &self.popup
                {
                    let id = id.clone();
                    self.book.delete(&id)?;
                    self.popup = None;
                }
            }
            CalendarAction::ClosePopup => {
                self.popup = None;
            }
        }
        Ok(())
    }

    fn find(&self, id: &str) -> WorldboardResult<&CalendarEvent> {
        self.book
            .get(id)
            .ok_or_else(|| WorldboardError::NotFound(format!("event '{id}'")))
    }

    fn first_checked(&self) -> String {
        self.calendars.first_checked_or_default().id.clone()
    }

    fn default_calendar(&self) -> String {
        self.calendars
            .iter()
            .next()
            .map(|c| c.id.clone())
            .unwrap_or_else(|| self.first_checked())
    }

    fn save_quick(&mut self) -> WorldboardResult<()> {
        let Some(CalendarPopup::QuickAdder(adder)) = &mut self.popup else {
            return Ok(());
        };
        let draft = adder.draft_for(&self.calendars.first_checked_or_default().id);

        match self.book.create(&draft) {
            Ok(_) => {
                self.popup = None;
                Ok(())
            }
            Err(e) => {
                adder.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn submit_modal(&mut self) -> WorldboardResult<()> {
        let Some(CalendarPopup::Modal(modal)) = &mut self.popup else {
            return Ok(());
        };
        if modal.draft.calendar.trim().is_empty() {
            modal.draft.calendar = self.calendars.first_checked_or_default().id.clone();
        }

        let calendar = modal.draft.calendar.trim();
        let result = if self.calendars.get(calendar).is_none() {
            Err(WorldboardError::Validation(format!("Unknown calendar '{calendar}'.")))
        } else {
            match &modal.mode {
                ModalMode::Create => self.book.create(&modal.draft),
                ModalMode::Edit(id) => self.book.update(id, &modal.draft),
            }
        };

        match result {
            Ok(_) => {
                self.popup = None;
                Ok(())
            }
            Err(e) => {
                modal.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::cell::CellElement;
    use crate::calendar::event::Hour;
    use crate::store::MemoryStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    fn module() -> (CalendarModule, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let module = CalendarModule::new(store.clone(), CalendarList::default(), today());
        (module, store)
    }

    fn click_cell(module: &mut CalendarModule, date: &str, hour: &str) {
        module
            .dispatch(
                CalendarAction::CellClick {
                    path: vec![
                        CellElement::Other,
                        CellElement::WeekCell {
                            date: date.into(),
                            hour: hour.into(),
                        },
                    ],
                    pointer: Point { x: 300.0, y: 200.0 },
                },
                today(),
            )
            .unwrap();
    }

    fn set(module: &mut CalendarModule, field: FormField, value: &str) {
        module
            .dispatch(
                CalendarAction::SetField {
                    field,
                    value: value.into(),
                },
                today(),
            )
            .unwrap();
    }

    #[test]
    fn quick_add_creates_and_persists_event() {
        let (mut module, store) = module();
        click_cell(&mut module, "2024-03-05", "9");
        assert!(matches!(module.popup(), Some(CalendarPopup::QuickAdder(_))));

        set(&mut module, FormField::Title, "Standup");
        module.dispatch(CalendarAction::SaveQuick, today()).unwrap();

        assert!(module.popup().is_none());
        assert_eq!(module.events().len(), 1);
        assert_eq!(module.events()[0].calendar, "default");
        assert_eq!(module.events()[0].hour, Hour::new(9));

        let grid = module.week_grid(today());
        let cell = grid
            .cell(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(), Hour::new(9).unwrap())
            .unwrap();
        assert_eq!(cell[0].title, "Standup");

        let stored = store.get(crate::constants::CALENDAR_EVENTS_KEY).unwrap().unwrap();
        assert!(stored.contains("Standup"));
    }

    #[test]
    fn quick_add_without_title_keeps_popup_open() {
        let (mut module, _) = module();
        click_cell(&mut module, "2024-03-05", "9");

        let err = module.dispatch(CalendarAction::SaveQuick, today()).unwrap_err();
        assert_eq!(err.to_string(), "Title and date are required.");
        assert!(module.events().is_empty());
        match module.popup() {
            Some(CalendarPopup::QuickAdder(adder)) => {
                assert_eq!(adder.error.as_deref(), Some("Title and date are required."))
            }
            other => panic!("unexpected popup {other:?}"),
        }
    }

    #[test]
    fn modal_rejects_unknown_calendar() {
        let (mut module, _) = module();
        module.dispatch(CalendarAction::OpenCreate, today()).unwrap();
        set(&mut module, FormField::Title, "Standup");
        set(&mut module, FormField::Date, "2024-03-04");
        set(&mut module, FormField::Hour, "9");
        set(&mut module, FormField::Calendar, "bogus");

        let err = module.dispatch(CalendarAction::SubmitModal, today()).unwrap_err();
        assert!(matches!(err, WorldboardError::Validation(_)));
        assert_eq!(err.to_string(), "Unknown calendar 'bogus'.");
        assert!(module.events().is_empty());
        match module.popup() {
            Some(CalendarPopup::Modal(modal)) => {
                assert_eq!(modal.error.as_deref(), Some("Unknown calendar 'bogus'."))
            }
            other => panic!("unexpected popup {other:?}"),
        }

        set(&mut module, FormField::Calendar, "default");
        module.dispatch(CalendarAction::SubmitModal, today()).unwrap();
        assert_eq!(module.events().len(), 1);
    }

    #[test]
    fn invalid_cell_opens_nothing() {
        let (mut module, _) = module();
        let result = module.dispatch(
            CalendarAction::CellClick {
                path: vec![CellElement::MonthCell { date: None }],
                pointer: Point::default(),
            },
            today(),
        );
        assert!(matches!(result, Err(WorldboardError::InvalidCell(_))));
        assert!(module.popup().is_none());
    }

    #[test]
    fn escalate_then_edit_then_delete() {
        let (mut module, _) = module();
        click_cell(&mut module, "2024-03-05", "10");
        set(&mut module, FormField::Title, "Review");
        module.dispatch(CalendarAction::Escalate, today()).unwrap();
        module.dispatch(CalendarAction::SubmitModal, today()).unwrap();

        let id = module.events()[0].id.clone();
        assert_eq!(module.events()[0].hour, Hour::new(10));

        module
            .dispatch(CalendarAction::OpenEdit { event_id: id.clone() }, today())
            .unwrap();
        set(&mut module, FormField::Hour, "");
        module.dispatch(CalendarAction::SubmitModal, today()).unwrap();
        assert_eq!(module.events()[0].id, id);
        assert_eq!(module.events()[0].hour, None);

        module
            .dispatch(CalendarAction::OpenEdit { event_id: id }, today())
            .unwrap();
        module.dispatch(CalendarAction::DeleteEvent, today()).unwrap();
        assert!(module.events().is_empty());
        assert!(module.popup().is_none());
    }

    #[test]
    fn chip_click_opens_overlay_for_known_event_only() {
        let (mut module, _) = module();
        click_cell(&mut module, "2024-03-05", "9");
        set(&mut module, FormField::Title, "Standup");
        module.dispatch(CalendarAction::SaveQuick, today()).unwrap();
        let id = module.events()[0].id.clone();

        module
            .dispatch(
                CalendarAction::ChipClick {
                    event_id: id,
                    anchor: Rect::default(),
                    viewport: Viewport::default(),
                },
                today(),
            )
            .unwrap();
        assert!(matches!(module.popup(), Some(CalendarPopup::Overlay(_))));

        let missing = module.dispatch(
            CalendarAction::ChipClick {
                event_id: "nope".into(),
                anchor: Rect::default(),
                viewport: Viewport::default(),
            },
            today(),
        );
        assert!(matches!(missing, Err(WorldboardError::NotFound(_))));
    }

    #[test]
    fn hidden_calendar_hides_chips() {
        let (mut module, _) = module();
        click_cell(&mut module, "2024-03-05", "9");
        set(&mut module, FormField::Title, "Standup");
        module.dispatch(CalendarAction::SaveQuick, today()).unwrap();
        let before = module.render(today());

        module
            .dispatch(
                CalendarAction::ToggleCalendar {
                    id: "default".into(),
                    checked: false,
                },
                today(),
            )
            .unwrap();
        assert!(!module.render(today()).main.contains("event-chip"));

        module
            .dispatch(
                CalendarAction::ToggleCalendar {
                    id: "default".into(),
                    checked: true,
                },
                today(),
            )
            .unwrap();
        assert_eq!(module.render(today()), before);
    }

    #[test]
    fn actions_deserialize_from_json() {
        let action: CalendarAction =
            serde_json::from_str(r#"{"type":"set_field","field":"title","value":"X"}"#).unwrap();
        assert_eq!(
            action,
            CalendarAction::SetField {
                field: FormField::Title,
                value: "X".into()
            }
        );
        let nav: CalendarAction =
            serde_json::from_str(r#"{"type":"nav","nav":{"action":"select_day","day":3}}"#).unwrap();
        assert_eq!(
            nav,
            CalendarAction::Nav {
                nav: NavAction::SelectDay(3)
            }
        );
    }
}
