//! Command palette, data overlays and point details

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use worldboard_core::command::{self, Command};
use worldboard_core::PreparedCommand;
use worldboard_core::overlay::{self, ActiveOverlay, Dataset, PointInfo};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/commands", post(run_command))
        .route("/commands/suggest", get(suggest))
        .route("/overlays", delete(clear_overlay))
        .route("/overlays/{dataset}", post(activate_overlay))
        .route("/points", post(show_point))
}

#[derive(Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /commands/suggest?q= - Palette suggestions for the typed text
async fn suggest(Query(query): Query<SuggestQuery>) -> Json<Vec<&'static str>> {
    Json(command::suggest(&query.q))
}

#[derive(Deserialize)]
pub struct CommandRequest {
    pub input: String,
}

#[derive(Serialize)]
pub struct CommandResponse {
    /// `None` when the input was not a known command.
    pub command: Option<Command>,
    pub overlay: Option<ActiveOverlay>,
}

/// POST /commands - Run an entered palette line
async fn run_command(
    State(state): State<AppState>,
    Json(req): Json<CommandRequest>,
) -> Result<Json<CommandResponse>, AppError> {
    let Some(command) = command::parse(&req.input) else {
        tracing::debug!(input = %req.input, "ignoring unknown command");
        return Ok(Json(CommandResponse {
            command: None,
            overlay: state.dashboard.lock().await.overlays().active().cloned(),
        }));
    };

    let prepared = PreparedCommand::fetch(command, &state.source).await;
    let mut dashboard = state.dashboard.lock().await;
    dashboard.apply_command(prepared)?;
    Ok(Json(CommandResponse {
        command: Some(command),
        overlay: dashboard.overlays().active().cloned(),
    }))
}

/// POST /overlays/:dataset - Show one dataset as the overlay
async fn activate_overlay(
    State(state): State<AppState>,
    Path(dataset): Path<String>,
) -> Result<Json<ActiveOverlay>, AppError> {
    let dataset: Dataset = dataset.parse()?;
    let fetched = overlay::load_dataset(&state.source, dataset).await;
    let mut dashboard = state.dashboard.lock().await;
    let active = dashboard.install_overlay(dataset, fetched)?.clone();
    Ok(Json(active))
}

/// DELETE /overlays - Remove the active overlay
async fn clear_overlay(State(state): State<AppState>) -> Json<Option<ActiveOverlay>> {
    let mut dashboard = state.dashboard.lock().await;
    let previous = dashboard.overlays().active().cloned();
    dashboard.clear_overlay();
    Json(previous)
}

#[derive(Deserialize)]
pub struct PointRequest {
    pub properties: Option<Map<String, Value>>,
}

/// POST /points - Click on an overlay point, or off one to close the card
async fn show_point(State(state): State<AppState>, Json(req): Json<PointRequest>) -> Json<Option<PointInfo>> {
    let mut dashboard = state.dashboard.lock().await;
    Json(dashboard.show_point(req.properties.as_ref()).cloned())
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use std::time::Duration;

    use crate::routes::test_support::{app, send, silent_source, state_with};

    #[tokio::test]
    async fn suggestions() {
        let app = app().await;
        let (_, body) = send(&app, Method::GET, "/commands/suggest?q=/gl", None).await;
        assert_eq!(body, json!(["/globe"]));

        let (_, body) = send(&app, Method::GET, "/commands/suggest", None).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn command_installs_overlay() {
        let app = app().await;
        let (status, body) = send(&app, Method::POST, "/commands", Some(json!({"input": " /ports "}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["command"], json!({"command": "overlay", "dataset": "ports"}));
        assert_eq!(body["overlay"]["feature_count"], json!(1));

        let (_, state) = send(&app, Method::GET, "/state", None).await;
        assert_eq!(
            state["map"]["sources"]["ports-points"]["features"][0]["properties"]["name"],
            json!("Rotterdam")
        );
    }

    #[tokio::test]
    async fn unknown_command_is_ignored() {
        let app = app().await;
        let (status, body) = send(&app, Method::POST, "/commands", Some(json!({"input": "/launch"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["command"], json!(null));
    }

    #[tokio::test]
    async fn missing_dataset_fails_and_keeps_map() {
        let app = app().await;
        send(&app, Method::POST, "/overlays/ports", None).await;
        let (status, _) = send(&app, Method::POST, "/overlays/refineries", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = send(&app, Method::POST, "/overlays/volcanoes", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, previous) = send(&app, Method::DELETE, "/overlays", None).await;
        assert_eq!(previous["dataset"], json!("ports"));
    }

    #[tokio::test]
    async fn point_card() {
        let app = app().await;
        let (_, body) = send(
            &app,
            Method::POST,
            "/points",
            Some(json!({"properties": {"name": "Rotterdam", "type": "ports", "description": "Rotterdam (ports)"}})),
        )
        .await;
        assert_eq!(body["title"], json!("Rotterdam"));
        assert_eq!(body["rows"][0], json!(["DESCRIPTION", "Rotterdam (ports)"]));

        let (_, body) = send(&app, Method::POST, "/points", Some(json!({"properties": null}))).await;
        assert_eq!(body, json!(null));
    }

    #[tokio::test]
    async fn pending_overlay_fetch_does_not_block_other_requests() {
        let app = crate::routes::router().with_state(state_with(silent_source().await));
        let pending = tokio::spawn({
            let app = app.clone();
            async move { send(&app, Method::POST, "/commands", Some(json!({"input": "/ports"}))).await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let (status, _) = tokio::time::timeout(
            Duration::from_secs(2),
            send(&app, Method::POST, "/commands", Some(json!({"input": "/flat"}))),
        )
        .await
        .expect("/flat waited on the /ports fetch");
        assert_eq!(status, StatusCode::OK);

        let (_, state) = send(&app, Method::GET, "/state", None).await;
        assert_eq!(state["map"]["projection"], json!("mercator"));

        pending.abort();
    }
}
