use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::classify::indicator_version;
use crate::engine::{ClassifiedPortions, ServingEngine};
use crate::item::MatchedItem;
use crate::portions::presets::presets;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ServingEngine>,
}

impl AppState {
    pub fn new(engine: ServingEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/classify", post(classify))
        .route("/classify/batch", post(classify_batch))
        .route("/indicators/version", get(versions))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Alias kept for callers that build the router by its short name.
pub fn router(state: AppState) -> Router {
    create_router(state)
}

#[derive(Debug, Deserialize)]
pub struct ClassifyReq {
    #[serde(default)]
    pub query: String,
    pub item: MatchedItem,
}

async fn classify(
    State(state): State<AppState>,
    Json(body): Json<ClassifyReq>,
) -> Json<ClassifiedPortions> {
    Json(state.engine.classify_and_get_portions(&body.query, &body.item))
}

async fn classify_batch(
    State(state): State<AppState>,
    Json(items): Json<Vec<ClassifyReq>>,
) -> Json<Vec<ClassifiedPortions>> {
    let out = items
        .iter()
        .map(|r| state.engine.classify_and_get_portions(&r.query, &r.item))
        .collect::<Vec<_>>();
    Json(out)
}

#[derive(Serialize)]
struct VersionsOut {
    version: &'static str,
    presets_version: &'static str,
    high_confidence_threshold: f32,
}

async fn versions(State(state): State<AppState>) -> Json<VersionsOut> {
    Json(VersionsOut {
        version: indicator_version(),
        presets_version: presets().version.as_str(),
        high_confidence_threshold: state.engine.threshold(),
    })
}
