use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use tokio::sync::Mutex;
use worldboard_core::country::CountryCatalog;
use worldboard_core::store::FileStore;
use worldboard_core::{Dashboard, DataSource, WorldboardConfig};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Mutex<Dashboard>>,
    /// Handlers fetch through this without holding the dashboard lock.
    pub source: DataSource,
}

impl AppState {
    pub fn new(config: &WorldboardConfig) -> anyhow::Result<Self> {
        let store = Arc::new(FileStore::new(config.store_path()));
        let source = DataSource::from_config(config)?;
        tracing::info!(store = %config.store_path().display(), ?source, "opening dashboard");
        Ok(Self::with_dashboard(Dashboard::new(config, store, source, today())))
    }

    pub fn with_dashboard(dashboard: Dashboard) -> Self {
        AppState {
            source: dashboard.source().clone(),
            dashboard: Arc::new(Mutex::new(dashboard)),
        }
    }

    /// Run a change that reads or writes the store on the blocking pool.
    pub async fn with_store<F, R>(&self, f: F) -> anyhow::Result<R>
    where
        F: FnOnce(&mut Dashboard) -> R + Send + 'static,
        R: Send + 'static,
    {
        tokio::task::spawn_blocking({
            let dashboard = self.dashboard.clone();
            move || f(&mut dashboard.blocking_lock())
        })
        .await
        .context("Task join error")
    }

    /// Fetch the country tables, then lock only to install them.
    pub async fn init(&self) {
        let catalog = CountryCatalog::load(&self.source).await;
        self.dashboard.lock().await.install_catalog(catalog);
    }
}

/// The calendar follows the server's local date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
