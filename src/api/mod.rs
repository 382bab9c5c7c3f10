//! HTTP API module - encounter pages and status endpoints

mod encounter;

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::encounter::EncounterRegistry;
use crate::render::PageRenderer;
use crate::roster::RosterStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub roster: Arc<RosterStore>,
    pub encounters: Arc<EncounterRegistry>,
    pub renderer: Arc<PageRenderer>,
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(root))
        .merge(encounter::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint, listing encounter indices
async fn root(State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.encounters.snapshot();
    let encounters = registry
        .iter()
        .enumerate()
        .map(|(index, e)| EncounterSummary {
            index,
            name: e.name.clone(),
            monsters: e.monsters.len(),
        })
        .collect();

    Json(RootResponse {
        name: "initd",
        version: env!("CARGO_PKG_VERSION"),
        encounters,
    })
}

#[derive(Serialize)]
struct RootResponse {
    name: &'static str,
    version: &'static str,
    encounters: Vec<EncounterSummary>,
}

#[derive(Serialize)]
struct EncounterSummary {
    index: usize,
    name: String,
    monsters: usize,
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        players: state.roster.snapshot().len(),
        encounters: state.encounters.len(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    players: usize,
    encounters: usize,
}
