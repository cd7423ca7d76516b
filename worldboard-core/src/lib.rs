//! Application core for the worldboard dashboard.
//!
//! Shared by the worldboard server and CLI:
//! - `calendar` for the event calendar overlay
//! - `overlay`, `country` and `leadership` for what is drawn on the map
//! - `app::Dashboard` owning all of it behind explicit operations

pub mod app;
pub mod calendar;
pub mod command;
pub mod config;
pub mod constants;
pub mod country;
pub mod data;
pub mod error;
pub mod leadership;
pub mod map;
pub mod overlay;
pub mod project;
pub mod settings;
pub mod store;
pub mod ui;

pub use app::{Dashboard, DashboardSnapshot, PreparedCommand};
pub use config::WorldboardConfig;
pub use data::DataSource;
pub use error::{WorldboardError, WorldboardResult};
