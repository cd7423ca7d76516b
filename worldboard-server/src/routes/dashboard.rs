//! Whole-dashboard state, keyboard, layers, loading and settings

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use worldboard_core::ui::{Key, Layer};

use crate::routes::AppError;
use crate::state::{AppState, today};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/state", get(snapshot))
        .route("/keys", post(press_key))
        .route("/layers/{layer}", delete(close_layer))
        .route("/loading/ready", post(loading_ready))
        .route("/settings", get(get_settings).put(put_settings))
}

/// GET /state - Everything the front-end draws
async fn snapshot(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let dashboard = state.dashboard.lock().await;
    Ok(Json(serde_json::to_value(dashboard.snapshot(today()))?))
}

#[derive(Deserialize)]
pub struct KeyRequest {
    pub key: String,
}

#[derive(Serialize)]
pub struct Changed {
    pub changed: bool,
}

/// POST /keys - F2 or Escape
async fn press_key(State(state): State<AppState>, Json(req): Json<KeyRequest>) -> Result<Json<Changed>, AppError> {
    let key: Key = req.key.parse()?;
    let changed = state.with_store(move |dashboard| dashboard.key(key)).await?;
    Ok(Json(Changed { changed }))
}

/// DELETE /layers/:layer - Close button of an overlay or modal
async fn close_layer(State(state): State<AppState>, Path(layer): Path<Layer>) -> Json<Changed> {
    let changed = state.dashboard.lock().await.close(layer);
    Json(Changed { changed })
}

/// POST /loading/ready - The map finished loading
async fn loading_ready(State(state): State<AppState>) -> Json<Changed> {
    let dashboard = state.dashboard.lock().await;
    let changed = !dashboard.loading().is_dismissed();
    dashboard.loading().dismiss();
    Json(Changed { changed })
}

#[derive(Serialize, Deserialize)]
pub struct SettingsBody {
    pub labels_visible: bool,
}

/// GET /settings
async fn get_settings(State(state): State<AppState>) -> Json<SettingsBody> {
    let dashboard = state.dashboard.lock().await;
    Json(SettingsBody {
        labels_visible: dashboard.settings().labels_visible(),
    })
}

/// PUT /settings - Toggle map labels
async fn put_settings(
    State(state): State<AppState>,
    Json(req): Json<SettingsBody>,
) -> Result<Json<SettingsBody>, AppError> {
    let visible = req.labels_visible;
    state
        .with_store(move |dashboard| dashboard.set_labels_visible(visible))
        .await?;
    Ok(Json(req))
}
