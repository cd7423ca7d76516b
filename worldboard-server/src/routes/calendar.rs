//! Calendar overlay endpoints

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Serialize;
use worldboard_core::calendar::{
    CalendarAction, CalendarDefinition, CalendarEvent, CalendarHtml, CalendarModule, CalendarPopup, CalendarViewState,
};

use worldboard_core::WorldboardResult;

use crate::routes::AppError;
use crate::state::{AppState, today};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/calendar", get(show_calendar))
        .route("/calendar/actions", post(dispatch))
        .route("/calendar/events", get(list_events))
}

/// Calendar view returned by API
#[derive(Serialize)]
pub struct CalendarResponse {
    pub state: CalendarViewState,
    pub calendars: Vec<CalendarDefinition>,
    pub html: CalendarHtml,
    pub popup: Option<CalendarPopup>,
}

impl CalendarResponse {
    fn from_module(module: &CalendarModule) -> Self {
        CalendarResponse {
            state: *module.state(),
            calendars: module.calendars().iter().cloned().collect(),
            html: module.render(today()),
            popup: module.popup().cloned(),
        }
    }
}

/// GET /calendar - Current view, rendered
async fn show_calendar(State(state): State<AppState>) -> Json<CalendarResponse> {
    let dashboard = state.dashboard.lock().await;
    Json(CalendarResponse::from_module(dashboard.calendar()))
}

/// POST /calendar/actions - Apply one calendar action
async fn dispatch(
    State(state): State<AppState>,
    Json(action): Json<CalendarAction>,
) -> Result<Json<CalendarResponse>, AppError> {
    let response = state
        .with_store(move |dashboard| -> WorldboardResult<CalendarResponse> {
            dashboard.calendar_action(action, today())?;
            Ok(CalendarResponse::from_module(dashboard.calendar()))
        })
        .await??;
    Ok(Json(response))
}

/// GET /calendar/events - All stored events
async fn list_events(State(state): State<AppState>) -> Json<Vec<CalendarEvent>> {
    let dashboard = state.dashboard.lock().await;
    Json(dashboard.calendar().events().to_vec())
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::{app, send};
    use crate::state::today;

    #[tokio::test]
    async fn quick_add_through_actions() {
        let app = app().await;
        let date = today().to_string();

        let (status, body) = send(
            &app,
            Method::POST,
            "/calendar/actions",
            Some(json!({
                "type": "cell_click",
                "path": [{"kind": "other"}, {"kind": "week_cell", "date": date, "hour": "10"}],
                "pointer": {"x": 100.0, "y": 200.0}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["popup"]["kind"], json!("quick_adder"));

        send(
            &app,
            Method::POST,
            "/calendar/actions",
            Some(json!({"type": "set_field", "field": "title", "value": "Standup"})),
        )
        .await;
        let (status, body) = send(&app, Method::POST, "/calendar/actions", Some(json!({"type": "save_quick"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["popup"], json!(null));

        let (_, events) = send(&app, Method::GET, "/calendar/events", None).await;
        assert_eq!(events[0]["title"], json!("Standup"));
        assert_eq!(events[0]["hour"], json!("10"));
        assert_eq!(events[0]["date"], json!(date));
    }

    #[tokio::test]
    async fn validation_error_is_bad_request() {
        let app = app().await;
        send(&app, Method::POST, "/calendar/actions", Some(json!({"type": "open_create"}))).await;
        let (status, body) = send(&app, Method::POST, "/calendar/actions", Some(json!({"type": "submit_modal"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("Title and date are required."));
    }

    #[tokio::test]
    async fn unknown_event_is_not_found() {
        let app = app().await;
        let (status, _) = send(
            &app,
            Method::POST,
            "/calendar/actions",
            Some(json!({"type": "open_edit", "event_id": "nope"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn navigation() {
        let app = app().await;
        let (_, body) = send(
            &app,
            Method::POST,
            "/calendar/actions",
            Some(json!({"type": "nav", "nav": {"action": "show_month"}})),
        )
        .await;
        assert_eq!(body["state"]["view"], json!("month"));
        assert!(body["html"]["main"].as_str().unwrap().contains("month-cell"));
    }
}
