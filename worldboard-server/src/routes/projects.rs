//! Project endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use worldboard_core::project::Project;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/modal", post(open_modal))
        .route("/projects/close", post(close_project))
        .route("/projects/{id}", put(rename_project).delete(delete_project))
        .route("/projects/{id}/open", post(open_project))
}

/// Sidebar listing returned by API
#[derive(Serialize)]
pub struct ProjectList {
    pub projects: Vec<Project>,
    pub active: Option<String>,
    pub toolbox_visible: bool,
}

/// GET /projects - All projects and the open one
async fn list_projects(State(state): State<AppState>) -> Json<ProjectList> {
    let dashboard = state.dashboard.lock().await;
    let book = dashboard.projects();
    Json(ProjectList {
        projects: book.projects().to_vec(),
        active: book.active().map(|p| p.id.clone()),
        toolbox_visible: book.toolbox_visible(),
    })
}

/// POST /projects/modal - Show the new-project form
async fn open_modal(State(state): State<AppState>) {
    state.dashboard.lock().await.open_project_modal();
}

/// Request body for creating or renaming a project
#[derive(Deserialize)]
pub struct NameRequest {
    pub name: String,
}

/// POST /projects - Create a project and open it
async fn create_project(
    State(state): State<AppState>,
    Json(req): Json<NameRequest>,
) -> Result<Json<Project>, AppError> {
    let project = state
        .with_store(move |dashboard| dashboard.create_project(&req.name))
        .await??;
    Ok(Json(project))
}

/// POST /projects/:id/open
async fn open_project(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Project>, AppError> {
    let project = state.dashboard.lock().await.open_project(&id)?;
    Ok(Json(project))
}

/// POST /projects/close - Leave project mode
async fn close_project(State(state): State<AppState>) -> Json<bool> {
    Json(state.dashboard.lock().await.close_project())
}

/// PUT /projects/:id - Rename
async fn rename_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<NameRequest>,
) -> Result<Json<Project>, AppError> {
    let project = state
        .with_store(move |dashboard| dashboard.rename_project(&id, &req.name))
        .await??;
    Ok(Json(project))
}

/// DELETE /projects/:id
async fn delete_project(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Project>, AppError> {
    let project = state
        .with_store(move |dashboard| dashboard.delete_project(&id))
        .await??;
    Ok(Json(project))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use worldboard_core::store::FileStore;
    use worldboard_core::{Dashboard, WorldboardConfig};

    use crate::routes::test_support::{app, send, source};
    use crate::state::{AppState, today};

    #[tokio::test]
    async fn project_lifecycle() {
        let app = app().await;
        let (status, project) = send(&app, Method::POST, "/projects", Some(json!({"name": " Sahel "}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(project["name"], json!("Sahel"));
        let id = project["id"].as_str().unwrap().to_string();

        let (_, list) = send(&app, Method::GET, "/projects", None).await;
        assert_eq!(list["active"], json!(id));
        assert_eq!(list["toolbox_visible"], json!(true));

        let (_, renamed) = send(&app, Method::PUT, &format!("/projects/{id}"), Some(json!({"name": "Sahel 2"}))).await;
        assert_eq!(renamed["name"], json!("Sahel 2"));

        let (_, closed) = send(&app, Method::POST, "/projects/close", None).await;
        assert_eq!(closed, json!(true));

        let (status, _) = send(&app, Method::DELETE, &format!("/projects/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, list) = send(&app, Method::GET, "/projects", None).await;
        assert_eq!(list["projects"], json!([]));
    }

    #[tokio::test]
    async fn blank_name_is_bad_request() {
        let app = app().await;
        let (status, body) = send(&app, Method::POST, "/projects", Some(json!({"name": "  "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("Project name is required."));
    }

    #[tokio::test]
    async fn unknown_project_is_not_found() {
        let app = app().await;
        let (status, _) = send(&app, Method::POST, "/projects/missing/open", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn projects_are_written_to_the_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let dashboard = Dashboard::new(
            &WorldboardConfig::default(),
            Arc::new(FileStore::new(dir.path())),
            source(),
            today(),
        );
        let app = crate::routes::router().with_state(AppState::with_dashboard(dashboard));

        let (status, project) = send(&app, Method::POST, "/projects", Some(json!({"name": "Arctic"}))).await;
        assert_eq!(status, StatusCode::OK);

        let stored = std::fs::read_to_string(dir.path().join("projects.json")).unwrap();
        assert!(stored.contains(project["id"].as_str().unwrap()));
    }
}
