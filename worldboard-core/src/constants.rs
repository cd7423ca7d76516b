//! Shared constants.

/// First hour row of the week grid.
pub const FIRST_HOUR: u32 = 7;

/// Last hour row of the week grid (inclusive).
pub const LAST_HOUR: u32 = 22;

/// Slots in the mini-month and month grids (6 weeks of 7 days).
pub const GRID_SLOTS: usize = 42;

pub const PROJECTS_KEY: &str = "projects";
pub const CALENDAR_EVENTS_KEY: &str = "calendarEvents";
pub const LABELS_KEY: &str = "mapLabelsOn";

pub const DEFAULT_DARK_STYLE: &str = "mapbox://styles/mapbox/dark-v11";
pub const DEFAULT_SATELLITE_STYLE: &str = "mapbox://styles/mapbox/satellite-v9";

/// Minimum zoom applied when switching to the flat projection.
pub const FLAT_MIN_ZOOM: f64 = 1.1;

/// `[[west, south], [east, north]]` bounds applied with the flat projection.
pub const WORLD_BOUNDS: [[f64; 2]; 2] = [[-180.0, -85.0], [180.0, 85.0]];

pub const COUNTRY_HIGHLIGHT_LAYER: &str = "country-highlight-border";
pub const PLACEHOLDER_IMG: &str = "img/placeholder.png";
