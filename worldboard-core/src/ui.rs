//! Open overlays, keyboard shortcuts and the loading screen.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::WorldboardError;

/// Something drawn on top of the map that Escape can dismiss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Calendar,
    CountryPanel,
    ContextMenu,
    Leadership,
    PointInfo,
    ProjectsSidebar,
    ProjectModal,
    Settings,
}

/// Open layers, most recently opened last.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayerStack {
    open: Vec<Layer>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `layer`, moving it to the top if it is already open.
    pub fn open(&mut self, layer: Layer) {
        self.open.retain(|l| *l != layer);
        self.open.push(layer);
    }

    pub fn close(&mut self, layer: Layer) -> bool {
        let before = self.open.len();
        self.open.retain(|l| *l != layer);
        self.open.len() != before
    }

    pub fn pop(&mut self) -> Option<Layer> {
        self.open.pop()
    }

    pub fn top(&self) -> Option<Layer> {
        self.open.last().copied()
    }

    pub fn is_open(&self, layer: Layer) -> bool {
        self.open.contains(&layer)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.open
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    F2,
    Escape,
}

impl FromStr for Key {
    type Err = WorldboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "F2" | "f2" => Ok(Key::F2),
            "Escape" | "escape" | "Esc" | "esc" => Ok(Key::Escape),
            other => Err(WorldboardError::Validation(format!("Unsupported key: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dismissal {
    Ready,
    TimedOut,
}

/// The loading overlay. It goes away when the map reports ready or when the
/// fallback timer fires, whichever happens first.
#[derive(Debug, Clone)]
pub struct LoadingGate {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for LoadingGate {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingGate {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        LoadingGate { tx: Arc::new(tx) }
    }

    pub fn dismiss(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_dismissed(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until the overlay is gone. Dismisses it on timeout.
    pub async fn wait(&self, fallback: Duration) -> Dismissal {
        let mut rx = self.tx.subscribe();
        let ready = tokio::time::timeout(fallback, rx.wait_for(|dismissed| *dismissed))
            .await
            .is_ok();
        if ready {
            return Dismissal::Ready;
        }
        tracing::warn!(?fallback, "map did not report ready, hiding loading overlay");
        self.dismiss();
        Dismissal::TimedOut
    }
}
