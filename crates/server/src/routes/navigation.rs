//! `/api/navigation` handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use navsphere_engine::IndexedItem;
use navsphere_types::{ItemFilter, NavigationCategory, NavigationItem, NavigationItemPatch, NavigationSubItem};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::auth::AccessToken;
use crate::error::ApiError;
use crate::extract::{JsonBody, PathParams, QueryParams};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/navigation", get(list_navigation).post(create_navigation))
        .route(
            "/navigation/{id}",
            get(get_navigation).put(update_navigation).delete(delete_navigation),
        )
        .route("/navigation/{id}/categories/{category_id}", get(get_category))
        .route(
            "/navigation/{id}/categories/{category_id}/items",
            get(list_category_items).post(add_category_item),
        )
        .route(
            "/navigation/{id}/categories/{category_id}/items/reorder",
            post(reorder_category_items),
        )
        .route(
            "/navigation/{id}/categories/{category_id}/items/{index}",
            put(update_category_item).delete(delete_category_item),
        )
}

#[derive(Debug, Deserialize)]
struct ItemsQuery {
    q: Option<String>,
    filter: Option<String>,
}

impl ItemsQuery {
    fn filter(&self) -> Result<ItemFilter, ApiError> {
        self.filter
            .as_deref()
            .unwrap_or_default()
            .parse::<ItemFilter>()
            .map_err(|error| ApiError::new(StatusCode::BAD_REQUEST, error.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct ReorderRequest {
    from: usize,
    to: usize,
}

async fn list_navigation(State(state): State<AppState>) -> Result<Json<Vec<NavigationItem>>, ApiError> {
    let items = state
        .navigation
        .list()
        .await
        .map_err(|error| ApiError::from_content(error, "Failed to fetch navigation"))?;
    Ok(Json(items))
}

async fn create_navigation(
    State(state): State<AppState>,
    token: AccessToken,
    JsonBody(item): JsonBody<NavigationItem>,
) -> Result<Json<NavigationItem>, ApiError> {
    let created = state
        .navigation
        .create(item, token.as_str())
        .await
        .map_err(|error| ApiError::from_content(error, "Failed to create navigation"))?;
    Ok(Json(created))
}

async fn get_navigation(
    State(state): State<AppState>,
    PathParams(id): PathParams<String>,
) -> Result<Json<NavigationItem>, ApiError> {
    let item = state
        .navigation
        .get(&id)
        .await
        .map_err(|error| ApiError::from_content(error, "Failed to fetch navigation item"))?;
    Ok(Json(item))
}

async fn update_navigation(
    State(state): State<AppState>,
    PathParams(id): PathParams<String>,
    token: AccessToken,
    JsonBody(patch): JsonBody<NavigationItemPatch>,
) -> Result<Json<NavigationItem>, ApiError> {
    let merged = state
        .navigation
        .update(&id, patch, token.as_str())
        .await
        .map_err(|error| ApiError::from_content(error, "Failed to update navigation"))?;
    Ok(Json(merged))
}

async fn delete_navigation(
    State(state): State<AppState>,
    PathParams(id): PathParams<String>,
    token: AccessToken,
) -> Result<Json<Value>, ApiError> {
    state
        .navigation
        .delete(&id, token.as_str())
        .await
        .map_err(|error| ApiError::from_content(error, "Failed to delete navigation"))?;
    Ok(Json(json!({ "success": true })))
}

async fn get_category(
    State(state): State<AppState>,
    PathParams((id, category_id)): PathParams<(String, String)>,
) -> Result<Json<NavigationCategory>, ApiError> {
    let category = state
        .navigation
        .category(&id, &category_id)
        .await
        .map_err(|error| ApiError::from_content(error, "Failed to fetch category"))?;
    Ok(Json(category))
}

async fn list_category_items(
    State(state): State<AppState>,
    PathParams((id, category_id)): PathParams<(String, String)>,
    QueryParams(query): QueryParams<ItemsQuery>,
) -> Result<Json<Vec<IndexedItem>>, ApiError> {
    let filter = query.filter()?;
    let items = state
        .navigation
        .list_category_items(&id, &category_id, query.q.as_deref(), filter)
        .await
        .map_err(|error| ApiError::from_content(error, "Failed to fetch category items"))?;
    Ok(Json(items))
}

async fn add_category_item(
    State(state): State<AppState>,
    PathParams((id, category_id)): PathParams<(String, String)>,
    token: AccessToken,
    JsonBody(item): JsonBody<NavigationSubItem>,
) -> Result<Json<NavigationCategory>, ApiError> {
    let category = state
        .navigation
        .add_category_item(&id, &category_id, item, token.as_str())
        .await
        .map_err(|error| ApiError::from_content(error, "Failed to add item"))?;
    Ok(Json(category))
}

async fn update_category_item(
    State(state): State<AppState>,
    PathParams((id, category_id, index)): PathParams<(String, String, usize)>,
    token: AccessToken,
    JsonBody(item): JsonBody<NavigationSubItem>,
) -> Result<Json<NavigationCategory>, ApiError> {
    let category = state
        .navigation
        .update_category_item(&id, &category_id, index, item, token.as_str())
        .await
        .map_err(|error| ApiError::from_content(error, "Failed to update item"))?;
    Ok(Json(category))
}

async fn delete_category_item(
    State(state): State<AppState>,
    PathParams((id, category_id, index)): PathParams<(String, String, usize)>,
    token: AccessToken,
) -> Result<Json<NavigationCategory>, ApiError> {
    let category = state
        .navigation
        .delete_category_item(&id, &category_id, index, token.as_str())
        .await
        .map_err(|error| ApiError::from_content(error, "Failed to delete item"))?;
    Ok(Json(category))
}

async fn reorder_category_items(
    State(state): State<AppState>,
    PathParams((id, category_id)): PathParams<(String, String)>,
    token: AccessToken,
    JsonBody(request): JsonBody<ReorderRequest>,
) -> Result<Json<NavigationCategory>, ApiError> {
    let category = state
        .navigation
        .reorder_category_items(&id, &category_id, request.from, request.to, token.as_str())
        .await
        .map_err(|error| ApiError::from_content(error, "Failed to update order"))?;
    Ok(Json(category))
}
