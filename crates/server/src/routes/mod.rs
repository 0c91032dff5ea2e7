mod navigation;
mod site;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::state::AppState;

/// Build the full admin router.
pub fn router(state: AppState) -> Router {
    let api = Router::new().merge(navigation::routes()).merge(site::routes());
    Router::new()
        .route("/healthz", get(health))
        .nest("/api", api)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
