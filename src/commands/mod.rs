pub mod calendar;
pub mod config;
pub mod country;
pub mod event;
pub mod overlay;
pub mod palette;
pub mod project;

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use worldboard_core::store::FileStore;
use worldboard_core::{Dashboard, DataSource, WorldboardConfig};

/// The calendar follows the local date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Open the dashboard over the configured store and data source.
pub fn open_dashboard() -> Result<Dashboard> {
    let config = WorldboardConfig::load()?;
    let store = Arc::new(FileStore::new(config.store_path()));
    let source = DataSource::from_config(&config)?;
    tracing::debug!(store = %config.store_path().display(), "opening dashboard");
    Ok(Dashboard::new(&config, store, source, today()))
}
