//! Popup placement: the event details overlay and the quick-adder anchor.

use serde::{Deserialize, Serialize};

use crate::calendar::event::CalendarEvent;

/// Details overlay box size, used for viewport clamping.
const OVERLAY_WIDTH: f64 = 260.0;
const OVERLAY_HEIGHT: f64 = 180.0;
const OVERLAY_MARGIN: f64 = 10.0;
const OVERLAY_GAP: f64 = 6.0;

/// Offset of the quick-adder from the pointer.
const QUICK_ADDER_OFFSET: (f64, f64) = (10.0, -10.0);

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Bounding box in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: 1280.0,
            height: 800.0,
        }
    }
}

/// Place the details overlay just below the chip, kept inside the viewport.
pub fn overlay_position(anchor: Rect, viewport: Viewport) -> Point {
    let mut left = anchor.left;
    let mut top = anchor.bottom + OVERLAY_GAP;

    if left + OVERLAY_WIDTH > viewport.width {
        left = viewport.width - OVERLAY_WIDTH - OVERLAY_MARGIN;
    }
    if top + OVERLAY_HEIGHT > viewport.height {
        top = viewport.height - OVERLAY_HEIGHT - OVERLAY_MARGIN;
    }

    Point {
        x: left.max(0.0),
        y: top.max(0.0),
    }
}

/// Place the quick-adder next to the pointer.
pub fn quick_adder_position(pointer: Point) -> Point {
    Point {
        x: (pointer.x + QUICK_ADDER_OFFSET.0).max(0.0),
        y: (pointer.y + QUICK_ADDER_OFFSET.1).max(0.0),
    }
}

/// Read-only details of one event, shown next to its chip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventOverlay {
    pub event_id: String,
    pub title: String,
    pub when: String,
    pub link: Option<String>,
    pub desc: Option<String>,
    pub position: Point,
}

impl EventOverlay {
    pub fn new(event: &CalendarEvent, anchor: Rect, viewport: Viewport) -> Self {
        EventOverlay {
            event_id: event.id.clone(),
            title: event.display_title().to_string(),
            when: event.when(),
            link: event.link.clone(),
            desc: event.desc.clone(),
            position: overlay_position(anchor, viewport),
        }
    }
}
