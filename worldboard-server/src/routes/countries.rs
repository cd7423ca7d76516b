//! Country selection, panel, context menu and leadership chart

use axum::{
    Json, Router,
    extract::State,
    routing::{delete, post},
};
use serde::{Deserialize, Serialize};
use worldboard_core::calendar::Point;
use worldboard_core::country::{CountryFeature, CountrySelection};
use worldboard_core::leadership::{LeadershipCatalog, LeadershipView};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/countries/select", post(select_country))
        .route("/countries/selection", delete(clear_selection))
        .route("/countries/panel", post(open_panel))
        .route("/countries/context-menu", post(open_context_menu))
        .route("/countries/context-menu/info", post(choose_info))
        .route("/countries/leadership", post(open_leadership))
}

/// POST /countries/select - Left click on a country
async fn select_country(
    State(state): State<AppState>,
    Json(feature): Json<CountryFeature>,
) -> Json<CountrySelection> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.select_country(&feature);
    Json(dashboard.selection().clone())
}

/// DELETE /countries/selection - Click on empty map
async fn clear_selection(State(state): State<AppState>) -> Json<CountrySelection> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.clear_country();
    Json(dashboard.selection().clone())
}

#[derive(Serialize)]
pub struct Opened {
    pub opened: bool,
    pub selection: CountrySelection,
}

/// POST /countries/panel - The info button
async fn open_panel(State(state): State<AppState>) -> Json<Opened> {
    let mut dashboard = state.dashboard.lock().await;
    let opened = dashboard.open_country_panel();
    Json(Opened {
        opened,
        selection: dashboard.selection().clone(),
    })
}

#[derive(Deserialize)]
pub struct ContextMenuRequest {
    pub feature: CountryFeature,
    pub position: Point,
}

/// POST /countries/context-menu - Right click on a country
async fn open_context_menu(
    State(state): State<AppState>,
    Json(req): Json<ContextMenuRequest>,
) -> Json<CountrySelection> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.country_context_menu(req.feature, req.position);
    Json(dashboard.selection().clone())
}

/// POST /countries/context-menu/info - "Info" in the context menu
async fn choose_info(State(state): State<AppState>) -> Json<Opened> {
    let mut dashboard = state.dashboard.lock().await;
    let opened = dashboard.choose_country_info();
    Json(Opened {
        opened,
        selection: dashboard.selection().clone(),
    })
}

/// POST /countries/leadership - Leadership chart of the selected country
async fn open_leadership(State(state): State<AppState>) -> Json<LeadershipView> {
    let loaded = state.dashboard.lock().await.leadership_loaded();
    let fetched = if loaded {
        None
    } else {
        Some(LeadershipCatalog::fetch(&state.source).await)
    };
    let mut dashboard = state.dashboard.lock().await;
    Json(dashboard.show_leadership(fetched).clone())
}
