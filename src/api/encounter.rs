//! Encounter lookup endpoints
//!
//! GET /encounter/{index}     - Turn order page
//! GET /api/encounter/{index} - Same lookup as JSON
//!
//! A non-integer index is "not found". An integer index with no encounter
//! behind it (including negative ones) yields an empty encounter with 200.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::error;

use super::AppState;

/// Build the encounter router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/encounter/{index}", get(encounter_page))
        .route("/api/encounter/{index}", get(encounter_json))
}

fn parse_index(raw: &str) -> Option<i64> {
    raw.parse().ok()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Encounter not found").into_response()
}

/// Roll and render encounter `index`
async fn encounter_page(Path(index): Path<String>, State(state): State<AppState>) -> Response {
    let Some(index) = parse_index(&index) else {
        return not_found();
    };

    let encounter = state.encounters.at(index);
    match state.renderer.encounter(&encounter) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to render encounter {}: {}", index, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Render error").into_response()
        }
    }
}

/// Roll encounter `index` and return it as JSON
async fn encounter_json(Path(index): Path<String>, State(state): State<AppState>) -> Response {
    match parse_index(&index) {
        Some(index) => Json(state.encounters.at(index)).into_response(),
        None => not_found(),
    }
}
