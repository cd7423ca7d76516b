//! The calendar overlay: navigation, grids, event storage and the forms
//! that create and edit events.

mod book;
mod cell;
mod definition;
mod event;
mod forms;
mod grid;
mod module;
mod popup;
pub mod render;
mod view;

pub use book::EventBook;
pub use cell::{CellElement, CellRef, ClickPath, resolve_cell};
pub use definition::{CalendarDefinition, CalendarList, FALLBACK_COLOR};
pub use event::{CalendarEvent, EventDraft, Hour, ValidDraft, parse_date};
pub use forms::{EventModal, FormField, ModalMode, QuickAdder};
pub use grid::{
    Chip, HourRow, MiniDay, MiniMonth, MonthCell, MonthGrid, WEEKDAY_LABELS, WeekDayColumn, WeekGrid,
    mini_month, month_grid, week_grid,
};
pub use module::{CalendarAction, CalendarHtml, CalendarModule, CalendarPopup};
pub use popup::{EventOverlay, Point, Rect, Viewport, overlay_position, quick_adder_position};
pub use view::{CalendarViewState, NavAction, ViewMode, days_in_month, first_of_month, monday_of};
