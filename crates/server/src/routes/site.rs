//! `/api/site` handlers.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use navsphere_types::SiteConfig;

use crate::auth::AccessToken;
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/site", get(get_site_config).put(update_site_config))
}

async fn get_site_config(State(state): State<AppState>) -> Result<Json<SiteConfig>, ApiError> {
    let config = state
        .site
        .get()
        .await
        .map_err(|error| ApiError::from_content(error, "Failed to fetch site config"))?;
    Ok(Json(config))
}

async fn update_site_config(
    State(state): State<AppState>,
    token: AccessToken,
    JsonBody(config): JsonBody<SiteConfig>,
) -> Result<Json<SiteConfig>, ApiError> {
    let saved = state
        .site
        .update(config, token.as_str())
        .await
        .map_err(|error| ApiError::from_content(error, "Failed to update site config"))?;
    Ok(Json(saved))
}
